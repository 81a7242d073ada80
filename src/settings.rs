//! Player settings and difficulty tiers
//!
//! Persisted as part of the progress snapshot (see `persistence`).

use serde::{Deserialize, Serialize};

use crate::generate::Operator;

/// Difficulty tier, shared by every game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Upper bound for sampled operands (arithmetic and missing-operand games)
    pub fn operand_max(&self) -> u32 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Normal => 20,
            Difficulty::Hard => 50,
        }
    }

    /// Operators allowed in the arithmetic drill
    pub fn operators(&self) -> &'static [Operator] {
        match self {
            Difficulty::Easy => &[Operator::Add, Operator::Sub],
            Difficulty::Normal => &[Operator::Add, Operator::Sub, Operator::Mul],
            Difficulty::Hard => &[Operator::Add, Operator::Sub, Operator::Mul, Operator::Div],
        }
    }

    /// Largest left factor for multiplication (times-table size)
    pub fn times_table(&self) -> u32 {
        match self {
            Difficulty::Hard => 12,
            _ => 9,
        }
    }

    /// Combo round shape: (number count, largest number)
    pub fn combo_shape(&self) -> (usize, u32) {
        match self {
            Difficulty::Easy => (4, 10),
            Difficulty::Normal => (5, 15),
            Difficulty::Hard => (6, 20),
        }
    }

    /// Target sum for the combo grid
    pub fn grid_target(&self) -> u32 {
        match self {
            Difficulty::Easy | Difficulty::Normal => 10,
            Difficulty::Hard => 20,
        }
    }

    /// Maze side length at level 1
    pub fn maze_base_size(&self) -> usize {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Normal => 7,
            Difficulty::Hard => 10,
        }
    }

    /// Exclusive upper bound on the rank of a newly dropped fruit
    pub fn merge_max_rank(&self) -> usize {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Normal => 3,
            Difficulty::Hard => 4,
        }
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Whether audio cues are played
    pub sound_enabled: bool,
    /// Difficulty tier used by every generator
    pub difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            difficulty: Difficulty::Normal,
        }
    }
}

/// Partial update, fields left as `None` are kept
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsPatch {
    pub sound_enabled: Option<bool>,
    pub difficulty: Option<Difficulty>,
}

impl Settings {
    /// Merge a partial update into these settings
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(sound) = patch.sound_enabled {
            self.sound_enabled = sound;
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
    }
}
