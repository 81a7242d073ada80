//! Circle collision detection and response
//!
//! Fruits are circles inside an open-topped box: side walls at x = 0 and
//! x = FIELD_WIDTH, floor at y = FIELD_HEIGHT.

use glam::Vec2;

use super::state::Fruit;
use crate::consts::*;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit normal pointing from the first body toward the second
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Overlap test between two circles
pub fn circle_circle(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> CollisionResult {
    let delta = b_pos - a_pos;
    let dist = delta.length();
    let reach = a_radius + b_radius;
    if dist >= reach {
        return CollisionResult::miss();
    }

    // Coincident centres: push apart vertically
    let normal = if dist > f32::EPSILON { delta / dist } else { Vec2::Y };
    CollisionResult {
        hit: true,
        normal,
        penetration: reach - dist,
    }
}

/// Restitution for an impact at `approach_speed`; slow contacts are
/// treated as resting so stacks come to rest instead of jittering
#[inline]
fn restitution_for(approach_speed: f32) -> f32 {
    if approach_speed < RESTING_SPEED { 0.0 } else { RESTITUTION }
}

/// Keep a fruit inside the box. Returns true if any wall was touched.
pub fn resolve_walls(fruit: &mut Fruit) -> bool {
    let r = fruit.radius();
    let mut touched = false;

    if fruit.pos.x - r < 0.0 {
        fruit.pos.x = r;
        if fruit.vel.x < 0.0 {
            fruit.vel.x = -fruit.vel.x * restitution_for(-fruit.vel.x);
        }
        touched = true;
    } else if fruit.pos.x + r > FIELD_WIDTH {
        fruit.pos.x = FIELD_WIDTH - r;
        if fruit.vel.x > 0.0 {
            fruit.vel.x = -fruit.vel.x * restitution_for(fruit.vel.x);
        }
        touched = true;
    }

    if fruit.pos.y + r > FIELD_HEIGHT {
        fruit.pos.y = FIELD_HEIGHT - r;
        if fruit.vel.y > 0.0 {
            fruit.vel.y = -fruit.vel.y * restitution_for(fruit.vel.y);
        }
        fruit.vel.x *= 1.0 - FLOOR_FRICTION;
        touched = true;
    }

    touched
}

/// Separate two overlapping fruits and exchange momentum along the normal
pub fn resolve_pair(a: &mut Fruit, b: &mut Fruit, hit: &CollisionResult) {
    if !hit.hit {
        return;
    }

    let inv_a = 1.0 / a.mass();
    let inv_b = 1.0 / b.mass();
    let inv_sum = inv_a + inv_b;

    // Positional correction split by inverse mass
    let correction = hit.normal * (hit.penetration / inv_sum);
    a.pos -= correction * inv_a;
    b.pos += correction * inv_b;

    // Impulse only if approaching
    let approach = (a.vel - b.vel).dot(hit.normal);
    if approach <= 0.0 {
        return;
    }
    let e = restitution_for(approach);
    let j = (1.0 + e) * approach / inv_sum;
    a.vel -= hit.normal * (j * inv_a);
    b.vel += hit.normal * (j * inv_b);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_overlap() {
        let hit = circle_circle(Vec2::new(0.0, 0.0), 10.0, Vec2::new(15.0, 0.0), 10.0);
        assert!(hit.hit);
        assert!((hit.penetration - 5.0).abs() < 1e-4);
        assert!((hit.normal - Vec2::X).length() < 1e-4);

        let miss = circle_circle(Vec2::new(0.0, 0.0), 10.0, Vec2::new(25.0, 0.0), 10.0);
        assert!(!miss.hit);
    }

    #[test]
    fn test_coincident_circles_still_separate() {
        let hit = circle_circle(Vec2::splat(50.0), 10.0, Vec2::splat(50.0), 10.0);
        assert!(hit.hit);
        assert_eq!(hit.normal, Vec2::Y);
    }

    #[test]
    fn test_floor_stops_slow_fruit() {
        let mut fruit = Fruit::new(1, 0, Vec2::new(100.0, FIELD_HEIGHT - 10.0));
        fruit.vel = Vec2::new(0.0, RESTING_SPEED * 0.5);
        assert!(resolve_walls(&mut fruit));
        assert_eq!(fruit.pos.y, FIELD_HEIGHT - fruit.radius());
        assert_eq!(fruit.vel.y, 0.0);
    }

    #[test]
    fn test_floor_bounces_fast_fruit() {
        let mut fruit = Fruit::new(1, 0, Vec2::new(100.0, FIELD_HEIGHT));
        fruit.vel = Vec2::new(0.0, 400.0);
        resolve_walls(&mut fruit);
        assert!((fruit.vel.y + 400.0 * RESTITUTION).abs() < 1e-3);
    }

    #[test]
    fn test_side_walls() {
        let mut fruit = Fruit::new(1, 2, Vec2::new(-5.0, 200.0));
        resolve_walls(&mut fruit);
        assert_eq!(fruit.pos.x, fruit.radius());

        let mut fruit = Fruit::new(2, 2, Vec2::new(FIELD_WIDTH + 5.0, 200.0));
        resolve_walls(&mut fruit);
        assert_eq!(fruit.pos.x, FIELD_WIDTH - fruit.radius());
    }

    #[test]
    fn test_pair_separates_and_conserves_momentum() {
        let mut a = Fruit::new(1, 1, Vec2::new(100.0, 300.0));
        let mut b = Fruit::new(2, 3, Vec2::new(130.0, 300.0));
        a.vel = Vec2::new(200.0, 0.0);
        let before = a.vel * a.mass() + b.vel * b.mass();

        let hit = circle_circle(a.pos, a.radius(), b.pos, b.radius());
        resolve_pair(&mut a, &mut b, &hit);

        assert!(a.pos.distance(b.pos) >= a.radius() + b.radius() - 1e-3);
        let after = a.vel * a.mass() + b.vel * b.mass();
        assert!((before - after).length() < before.length() * 1e-4);
    }
}
