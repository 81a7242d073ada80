//! Per-game best scores and the recent results log
//!
//! Both live inside the persisted progress snapshot.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Maximum number of recent results to keep
pub const MAX_RECENT_GAMES: usize = 10;

/// Identifies one of the five games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameId {
    Math,
    Missing,
    Combo,
    Maze,
    Fruit,
}

impl GameId {
    pub const ALL: [GameId; 5] = [
        GameId::Math,
        GameId::Missing,
        GameId::Combo,
        GameId::Maze,
        GameId::Fruit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Math => "math",
            GameId::Missing => "missing",
            GameId::Combo => "combo",
            GameId::Maze => "maze",
            GameId::Fruit => "fruit",
        }
    }

    /// Display title
    pub fn title(&self) -> &'static str {
        match self {
            GameId::Math => "Math Test",
            GameId::Missing => "Missing",
            GameId::Combo => "Combo",
            GameId::Maze => "Maze",
            GameId::Fruit => "Merge Fruit",
        }
    }
}

/// Best score per game. Every game starts at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighScoreTable {
    math: u32,
    missing: u32,
    combo: u32,
    maze: u32,
    fruit: u32,
}

impl HighScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, game: GameId) -> u32 {
        match game {
            GameId::Math => self.math,
            GameId::Missing => self.missing,
            GameId::Combo => self.combo,
            GameId::Maze => self.maze,
            GameId::Fruit => self.fruit,
        }
    }

    fn slot_mut(&mut self, game: GameId) -> &mut u32 {
        match game {
            GameId::Math => &mut self.math,
            GameId::Missing => &mut self.missing,
            GameId::Combo => &mut self.combo,
            GameId::Maze => &mut self.maze,
            GameId::Fruit => &mut self.fruit,
        }
    }

    /// Raise the best score for `game` if `score` beats it.
    /// Returns true when the stored value changed.
    pub fn update(&mut self, game: GameId, score: u32) -> bool {
        let slot = self.slot_mut(game);
        if score > *slot {
            *slot = score;
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (GameId, u32)> + '_ {
        GameId::ALL.into_iter().map(|g| (g, self.get(g)))
    }
}

/// One finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub game_id: GameId,
    pub score: u32,
    /// Unix timestamp (ms) when the session finished
    pub played_at: u64,
}

/// Most recent results, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentGames {
    entries: VecDeque<GameResult>,
}

impl RecentGames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result, evicting the oldest entry past the cap
    pub fn push(&mut self, result: GameResult) {
        self.entries.push_front(result);
        self.entries.truncate(MAX_RECENT_GAMES);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Newest result, if any
    pub fn latest(&self) -> Option<&GameResult> {
        self.entries.front()
    }

    /// Iterate newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &GameResult> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn result(score: u32, played_at: u64) -> GameResult {
        GameResult {
            game_id: GameId::Math,
            score,
            played_at,
        }
    }

    #[test]
    fn test_table_starts_at_zero() {
        let table = HighScoreTable::new();
        for (_, score) in table.iter() {
            assert_eq!(score, 0);
        }
    }

    #[test]
    fn test_update_only_raises() {
        let mut table = HighScoreTable::new();
        assert!(table.update(GameId::Maze, 120));
        assert!(!table.update(GameId::Maze, 80));
        assert!(!table.update(GameId::Maze, 120));
        assert_eq!(table.get(GameId::Maze), 120);
        assert_eq!(table.get(GameId::Fruit), 0);
    }

    #[test]
    fn test_recent_games_capped() {
        let mut recent = RecentGames::new();
        for i in 0..15 {
            recent.push(result(i, i as u64));
        }
        assert_eq!(recent.len(), MAX_RECENT_GAMES);
        // Newest first, five oldest evicted
        assert_eq!(recent.latest().map(|r| r.score), Some(14));
        assert_eq!(recent.iter().last().map(|r| r.score), Some(5));
    }

    #[test]
    fn test_table_json_shape() {
        let mut table = HighScoreTable::new();
        table.update(GameId::Combo, 42);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"math":0,"missing":0,"combo":42,"maze":0,"fruit":0}"#);
    }

    proptest! {
        #[test]
        fn high_score_never_decreases(scores in proptest::collection::vec(0u32..10_000, 0..64)) {
            let mut table = HighScoreTable::new();
            let mut previous = 0;
            for score in scores {
                table.update(GameId::Missing, score);
                let current = table.get(GameId::Missing);
                prop_assert!(current >= previous);
                prop_assert!(current >= score);
                previous = current;
            }
        }
    }
}
