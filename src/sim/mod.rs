//! Deterministic merge-game simulation
//!
//! All physics and fusion logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Randomness only through the caller's seeded RNG
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, circle_circle};
pub use state::{
    Fruit, MAX_RANK, MergeEvent, MergeState, RANK_COUNT, RANKS, RankInfo, fuse, radius_of, value_of,
};
pub use tick::{points_in, tick};
