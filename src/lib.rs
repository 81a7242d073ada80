//! Aiden Arcade - educational arcade mini-games
//!
//! Core modules:
//! - `generate`: Seedable content generators (problems, combo boards, mazes)
//! - `sim`: Deterministic merge-game physics
//! - `session`: Round/feedback/finish state machine shared by every game
//! - `persistence`: Settings and high scores that survive a restart
//! - `platform`: Host clock and optional shell capabilities

pub mod audio;
pub mod generate;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod timer;

pub use highscores::{GameId, GameResult, HighScoreTable};
pub use persistence::ProgressStore;
pub use session::{GameRules, SessionController, SessionEvent, SessionPhase};
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Pause between answering and the next round (ms)
    pub const FEEDBACK_DELAY_MS: u64 = 800;

    /// Rounds per session
    pub const MATH_ROUNDS: u32 = 10;
    pub const MISSING_ROUNDS: u32 = 10;
    pub const COMBO_ROUNDS: u32 = 8;
    pub const MAZE_LEVELS: u32 = 5;

    /// Base points for a right answer
    pub const BASE_POINTS: u32 = 10;
    /// Streak at which math answers score double
    pub const STREAK_BONUS_THRESHOLD: u32 = 3;

    /// Fixed simulation timestep (60 Hz, one step per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Merge play field (y grows downward)
    pub const FIELD_WIDTH: f32 = 350.0;
    pub const FIELD_HEIGHT: f32 = 500.0;
    /// Fruits resting above this line end the game
    pub const DROP_LINE_Y: f32 = 80.0;

    /// Downward acceleration (px/s²)
    pub const GRAVITY: f32 = 1000.0;
    /// Bounciness of fast impacts
    pub const RESTITUTION: f32 = 0.3;
    /// Impacts slower than this (px/s) do not bounce
    pub const RESTING_SPEED: f32 = 40.0;
    /// Vertical speed (px/s) under which a fruit counts as settled
    pub const SETTLE_SPEED: f32 = 25.0;
    /// Fraction of horizontal speed lost per floor contact
    pub const FLOOR_FRICTION: f32 = 0.05;
    /// Velocity decay per second
    pub const LINEAR_DAMPING: f32 = 0.5;
    /// Contact solver passes per step
    pub const SOLVER_ITERATIONS: usize = 10;
    /// Gap (px) under which two equal fruits count as touching
    pub const CONTACT_SLOP: f32 = 0.5;

    /// Minimum time between drops (ms)
    pub const DROP_COOLDOWN_MS: u64 = 500;
    /// How long a settled fruit may sit above the drop line (ms)
    pub const OVERFLOW_GRACE_MS: u64 = 1000;
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Browser entry point: wires up panic reporting and console logging
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Aiden Arcade core loaded");
}
