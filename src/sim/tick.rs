//! Fixed timestep simulation tick
//!
//! One tick integrates gravity, resolves wall and fruit contacts, then drains
//! the contact queue to fuse equal-rank pairs, and finally runs the overflow
//! check. Fusion and scoring never happen inside the contact solver itself.

use super::collision::{circle_circle, resolve_pair, resolve_walls};
use super::state::{Fruit, MergeEvent, MergeState, fuse, value_of};
use crate::consts::*;

/// Advance the board by one fixed timestep, returning what happened
pub fn tick(state: &mut MergeState, dt: f32) -> Vec<MergeEvent> {
    let mut events = Vec::new();
    if state.overflowed {
        return events;
    }

    state.time_ticks += 1;
    state.cooldown = (state.cooldown - dt).max(0.0);

    integrate(state, dt);
    solve_contacts(state);
    drain_contacts(state, &mut events);
    check_overflow(state, dt, &mut events);

    state.normalize_order();
    events
}

fn integrate(state: &mut MergeState, dt: f32) {
    let damping = (1.0 - LINEAR_DAMPING * dt).max(0.0);
    for fruit in &mut state.fruits {
        fruit.vel.y += GRAVITY * dt;
        fruit.vel *= damping;
        fruit.pos += fruit.vel * dt;
    }
}

/// Sequential impulse passes over walls and fruit pairs. Equal-rank pairs
/// that overlap or touch within `CONTACT_SLOP` in any pass are queued for
/// fusion.
fn solve_contacts(state: &mut MergeState) {
    state.contacts.clear();
    let n = state.fruits.len();

    for _ in 0..SOLVER_ITERATIONS {
        for fruit in &mut state.fruits {
            resolve_walls(fruit);
        }

        for i in 0..n {
            let (head, tail) = state.fruits.split_at_mut(i + 1);
            let a = &mut head[i];
            for b in tail.iter_mut() {
                if a.rank == b.rank && touching(a, b) && !state.contacts.contains(&(a.id, b.id)) {
                    state.contacts.push((a.id, b.id));
                }
                let hit = circle_circle(a.pos, a.radius(), b.pos, b.radius());
                if hit.hit {
                    resolve_pair(a, b, &hit);
                }
            }
        }
    }

    // Final wall pass so nothing is left outside the box
    for fruit in &mut state.fruits {
        resolve_walls(fruit);
    }
}

/// Overlapping, or resting against each other
fn touching(a: &Fruit, b: &Fruit) -> bool {
    a.pos.distance(b.pos) <= a.radius() + b.radius() + CONTACT_SLOP
}

/// Fuse queued pairs. A fruit consumed by one fusion is skipped by later
/// pairs in the same tick.
fn drain_contacts(state: &mut MergeState, events: &mut Vec<MergeEvent>) {
    let contacts = std::mem::take(&mut state.contacts);
    let mut consumed: Vec<u32> = Vec::new();

    for (a_id, b_id) in contacts {
        if consumed.contains(&a_id) || consumed.contains(&b_id) {
            continue;
        }
        let (Some(a), Some(b)) = (state.fruit(a_id), state.fruit(b_id)) else {
            continue;
        };
        let Some((rank, pos)) = fuse(a, b) else {
            continue;
        };

        consumed.push(a_id);
        consumed.push(b_id);
        state.fruits.retain(|f| f.id != a_id && f.id != b_id);
        let id = state.spawn(rank, pos);

        let points = value_of(rank);
        log::debug!("Fused two rank {} into rank {} (+{})", rank - 1, rank, points);
        events.push(MergeEvent::Merged {
            id,
            rank,
            pos,
            points,
        });
    }
}

fn check_overflow(state: &mut MergeState, dt: f32, events: &mut Vec<MergeEvent>) {
    let grace = OVERFLOW_GRACE_MS as f32 / 1000.0;
    for fruit in &mut state.fruits {
        if fruit.top() < DROP_LINE_Y && fruit.is_settled() {
            fruit.above_line += dt;
        } else {
            fruit.above_line = 0.0;
        }
    }

    if let Some(fruit) = state.fruits.iter().find(|f| f.above_line >= grace) {
        log::info!("Fruit {} overflowed the drop line", fruit.id);
        events.push(MergeEvent::Overflow { id: fruit.id });
        state.overflowed = true;
    }
}

/// Total points carried by a batch of events
pub fn points_in(events: &[MergeEvent]) -> u32 {
    events
        .iter()
        .map(|e| match e {
            MergeEvent::Merged { points, .. } => *points,
            MergeEvent::Overflow { .. } => 0,
        })
        .sum()
}
