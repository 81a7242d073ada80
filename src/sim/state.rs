//! Merge-game state and entity types
//!
//! Everything the physics step reads or writes lives here. Randomness is
//! supplied by the caller so the state stays reproducible from a seed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Number of fruit ranks
pub const RANK_COUNT: usize = 10;
/// Highest rank; two of these never fuse
pub const MAX_RANK: usize = RANK_COUNT - 1;

/// Static description of one rank
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankInfo {
    pub name: &'static str,
    pub radius: f32,
    /// Points awarded when a fruit of this rank is created by fusion
    pub value: u32,
}

/// Ranks from smallest to largest
pub const RANKS: [RankInfo; RANK_COUNT] = [
    RankInfo { name: "cherry", radius: 15.0, value: 1 },
    RankInfo { name: "strawberry", radius: 20.0, value: 2 },
    RankInfo { name: "grape", radius: 25.0, value: 3 },
    RankInfo { name: "tangerine", radius: 30.0, value: 5 },
    RankInfo { name: "apple", radius: 35.0, value: 8 },
    RankInfo { name: "pear", radius: 40.0, value: 13 },
    RankInfo { name: "peach", radius: 45.0, value: 21 },
    RankInfo { name: "pineapple", radius: 50.0, value: 34 },
    RankInfo { name: "melon", radius: 55.0, value: 55 },
    RankInfo { name: "watermelon", radius: 60.0, value: 89 },
];

#[inline]
pub fn radius_of(rank: usize) -> f32 {
    RANKS[rank.min(MAX_RANK)].radius
}

#[inline]
pub fn value_of(rank: usize) -> u32 {
    RANKS[rank.min(MAX_RANK)].value
}

/// A fruit body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fruit {
    pub id: u32,
    pub rank: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds spent settled above the drop line
    #[serde(default)]
    pub above_line: f32,
}

impl Fruit {
    pub fn new(id: u32, rank: usize, pos: Vec2) -> Self {
        Self {
            id,
            rank: rank.min(MAX_RANK),
            pos,
            vel: Vec2::ZERO,
            above_line: 0.0,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        radius_of(self.rank)
    }

    /// Mass proportional to area
    #[inline]
    pub fn mass(&self) -> f32 {
        self.radius() * self.radius()
    }

    /// Y of the top edge (y grows downward)
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius()
    }

    /// Not moving vertically to speak of
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.vel.y.abs() < SETTLE_SPEED
    }
}

/// Rank and position of the fruit that replaces two touching equal-rank
/// fruits, or `None` if they cannot fuse
pub fn fuse(a: &Fruit, b: &Fruit) -> Option<(usize, Vec2)> {
    if a.id == b.id || a.rank != b.rank || a.rank >= MAX_RANK {
        return None;
    }
    Some((a.rank + 1, (a.pos + b.pos) * 0.5))
}

/// Things that happened during a tick, for scoring and cues
#[derive(Debug, Clone, PartialEq)]
pub enum MergeEvent {
    /// Two fruits became one of `rank`
    Merged { id: u32, rank: usize, pos: Vec2, points: u32 },
    /// A fruit stayed above the drop line for the whole grace period
    Overflow { id: u32 },
}

/// The board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeState {
    /// Live fruits (sorted by id for determinism)
    pub fruits: Vec<Fruit>,
    /// Rank of the fruit that the next drop releases
    pub next_rank: usize,
    /// Horizontal drop position
    pub aim_x: f32,
    /// Seconds until another drop is allowed
    pub cooldown: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Overflow detected; the board no longer advances
    pub overflowed: bool,
    /// Same-rank contacts found by the physics step, drained after it
    #[serde(skip)]
    pub(crate) contacts: Vec<(u32, u32)>,
    next_id: u32,
}

impl MergeState {
    /// Empty board with the first fruit drawn from `[0, max_rank)`
    pub fn new<R: Rng + ?Sized>(rng: &mut R, max_rank: usize) -> Self {
        let mut state = Self {
            fruits: Vec::new(),
            next_rank: 0,
            aim_x: FIELD_WIDTH / 2.0,
            cooldown: 0.0,
            time_ticks: 0,
            overflowed: false,
            contacts: Vec::new(),
            next_id: 1,
        };
        state.next_rank = draw_rank(rng, max_rank);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place a resting fruit (fusion results, tests)
    pub fn spawn(&mut self, rank: usize, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.fruits.push(Fruit::new(id, rank, pos));
        id
    }

    pub fn fruit(&self, id: u32) -> Option<&Fruit> {
        self.fruits.iter().find(|f| f.id == id)
    }

    /// Drop position for `x`, kept far enough from the side walls that a
    /// fruit of the next rank fits
    pub fn clamp_aim(&self, x: f32) -> f32 {
        let r = radius_of(self.next_rank);
        x.clamp(r, FIELD_WIDTH - r)
    }

    /// Move the drop position
    pub fn aim(&mut self, x: f32) {
        self.aim_x = self.clamp_aim(x);
    }

    pub fn can_drop(&self) -> bool {
        !self.overflowed && self.cooldown <= 0.0
    }

    /// Release the next fruit just below the drop line and draw the one
    /// after it. Returns `None` while cooling down.
    pub fn drop_fruit<R: Rng + ?Sized>(&mut self, rng: &mut R, max_rank: usize) -> Option<u32> {
        if !self.can_drop() {
            return None;
        }

        let rank = self.next_rank;
        let x = self.clamp_aim(self.aim_x);
        let id = self.spawn(rank, Vec2::new(x, DROP_LINE_Y + radius_of(rank)));

        self.next_rank = draw_rank(rng, max_rank);
        self.aim_x = self.clamp_aim(self.aim_x);
        self.cooldown = DROP_COOLDOWN_MS as f32 / 1000.0;
        Some(id)
    }

    /// Ensure fruits are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.fruits.sort_by_key(|f| f.id);
    }
}

fn draw_rank<R: Rng + ?Sized>(rng: &mut R, max_rank: usize) -> usize {
    rng.random_range(0..max_rank.clamp(1, RANK_COUNT))
}
