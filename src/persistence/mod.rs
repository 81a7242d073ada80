//! Progress persistence
//!
//! One JSON record holds settings, high scores and recent results. It is
//! read once at startup and rewritten after every mutation.

mod storage;

pub use storage::{MemoryStorage, StorageBackend};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::{GameId, GameResult, HighScoreTable, RecentGames};
use crate::settings::{Difficulty, Settings, SettingsPatch};

/// Storage key for the progress record
pub const STORAGE_KEY: &str = "aiden-game-storage";

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("progress record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage is not available on this host")]
    Unavailable,

    #[error("host storage error: {0}")]
    Host(String),
}

/// Everything that survives a restart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressSnapshot {
    pub settings: Settings,
    pub high_scores: HighScoreTable,
    pub recent_games: RecentGames,
}

/// The shared settings/high-score store read and written by every game
pub struct ProgressStore {
    snapshot: ProgressSnapshot,
    backend: Box<dyn StorageBackend>,
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore")
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}

impl ProgressStore {
    /// Load the snapshot from `backend`, falling back to defaults when the
    /// record is missing or unreadable
    pub fn load(backend: impl StorageBackend + 'static) -> Self {
        let snapshot = match Self::read_snapshot(&backend) {
            Ok(Some(snapshot)) => {
                log::info!(
                    "Loaded progress ({} recent games)",
                    snapshot.recent_games.len()
                );
                snapshot
            }
            Ok(None) => {
                log::info!("No saved progress found, starting fresh");
                ProgressSnapshot::default()
            }
            Err(e) => {
                log::warn!("Discarding saved progress: {e}");
                ProgressSnapshot::default()
            }
        };

        Self {
            snapshot,
            backend: Box::new(backend),
        }
    }

    /// In-memory store with default progress
    pub fn in_memory() -> Self {
        Self::load(MemoryStorage::new())
    }

    fn read_snapshot(backend: &dyn StorageBackend) -> StoreResult<Option<ProgressSnapshot>> {
        match backend.read(STORAGE_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Write the current snapshot to the backend
    pub fn save(&mut self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.snapshot)?;
        self.backend.write(STORAGE_KEY, &json)?;
        log::debug!("Progress saved");
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            log::warn!("Failed to save progress: {e}");
        }
    }

    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    pub fn settings(&self) -> &Settings {
        &self.snapshot.settings
    }

    pub fn difficulty(&self) -> Difficulty {
        self.snapshot.settings.difficulty
    }

    pub fn sound_enabled(&self) -> bool {
        self.snapshot.settings.sound_enabled
    }

    /// Apply a partial settings update
    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.snapshot.settings.apply(patch);
        self.persist();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.update_settings(SettingsPatch {
            difficulty: Some(difficulty),
            ..Default::default()
        });
    }

    /// Flip the sound flag, returning the new value
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = !self.snapshot.settings.sound_enabled;
        self.update_settings(SettingsPatch {
            sound_enabled: Some(enabled),
            ..Default::default()
        });
        enabled
    }

    pub fn high_score(&self, game: GameId) -> u32 {
        self.snapshot.high_scores.get(game)
    }

    pub fn high_scores(&self) -> &HighScoreTable {
        &self.snapshot.high_scores
    }

    /// Raise the high score for `game` if beaten. Returns true if it was.
    pub fn update_high_score(&mut self, game: GameId, score: u32) -> bool {
        let beaten = self.snapshot.high_scores.update(game, score);
        if beaten {
            log::info!("New high score for {}: {}", game.as_str(), score);
            self.persist();
        }
        beaten
    }

    /// Append a finished session to the recent results log
    pub fn add_game_result(&mut self, result: GameResult) {
        self.snapshot.recent_games.push(result);
        self.persist();
    }

    pub fn recent_games(&self) -> &RecentGames {
        &self.snapshot.recent_games
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Memory backend whose contents outlive the store (simulates a restart)
    #[derive(Clone, Default)]
    struct SharedStorage(Rc<RefCell<MemoryStorage>>);

    impl StorageBackend for SharedStorage {
        fn read(&self, key: &str) -> StoreResult<Option<String>> {
            self.0.borrow().read(key)
        }

        fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
            self.0.borrow_mut().write(key, value)
        }
    }

    struct FailingStorage;

    impl StorageBackend for FailingStorage {
        fn read(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Unavailable)
        }

        fn write(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable)
        }
    }

    #[test]
    fn test_defaults_when_empty() {
        let store = ProgressStore::in_memory();
        assert_eq!(store.difficulty(), Difficulty::Normal);
        assert!(store.sound_enabled());
        assert!(store.recent_games().is_empty());
        for game in GameId::ALL {
            assert_eq!(store.high_score(game), 0);
        }
    }

    #[test]
    fn test_survives_restart() {
        let shared = SharedStorage::default();
        {
            let mut store = ProgressStore::load(shared.clone());
            store.set_difficulty(Difficulty::Hard);
            store.toggle_sound();
            store.update_high_score(GameId::Maze, 310);
            store.add_game_result(GameResult {
                game_id: GameId::Maze,
                score: 310,
                played_at: 1_700_000_000_000,
            });
        }

        let store = ProgressStore::load(shared);
        assert_eq!(store.difficulty(), Difficulty::Hard);
        assert!(!store.sound_enabled());
        assert_eq!(store.high_score(GameId::Maze), 310);
        assert_eq!(store.recent_games().latest().map(|r| r.score), Some(310));
    }

    #[test]
    fn test_corrupt_record_falls_back() {
        let mut storage = MemoryStorage::new();
        storage.write(STORAGE_KEY, "{not json").unwrap();
        let store = ProgressStore::load(storage);
        assert_eq!(store.snapshot(), &ProgressSnapshot::default());
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .write(STORAGE_KEY, r#"{"settings":{"soundEnabled":false,"difficulty":"easy"}}"#)
            .unwrap();
        let store = ProgressStore::load(storage);
        assert_eq!(store.difficulty(), Difficulty::Easy);
        assert!(!store.sound_enabled());
        assert_eq!(store.high_score(GameId::Fruit), 0);
    }

    #[test]
    fn test_failing_backend_is_not_fatal() {
        let mut store = ProgressStore::load(FailingStorage);
        assert!(store.update_high_score(GameId::Math, 50));
        assert_eq!(store.high_score(GameId::Math), 50);
        assert!(store.save().is_err());
    }

    #[test]
    fn test_lower_score_does_not_persist() {
        let shared = SharedStorage::default();
        let mut store = ProgressStore::load(shared.clone());
        store.update_high_score(GameId::Combo, 90);
        assert!(!store.update_high_score(GameId::Combo, 30));
        let reloaded = ProgressStore::load(shared);
        assert_eq!(reloaded.high_score(GameId::Combo), 90);
    }
}
