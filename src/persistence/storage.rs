//! Key/value storage backends for the progress snapshot

use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use super::{StoreError, StoreResult};

/// A string key/value store that survives process restarts
pub trait StorageBackend {
    /// Read the value stored under `key`, `None` if absent
    fn read(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replace the value stored under `key`
    fn write(&mut self, key: &str, value: &str) -> StoreResult<()>;
}

/// In-process storage (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw access for inspecting what was persisted
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        // Write-then-rename so a crash never leaves a half-written record
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, self.path_for(key))?;
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Open the window's LocalStorage
    pub fn open() -> StoreResult<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl StorageBackend for LocalStorage {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StoreError::Host(format!("{e:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Host(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.read("k").unwrap(), None);
        storage.write("k", "v1").unwrap();
        storage.write("k", "v2").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_file_storage_missing_key() {
        let dir = std::env::temp_dir().join(format!("aiden-arcade-missing-{}", std::process::id()));
        let storage = FileStorage::new(&dir);
        assert_eq!(storage.read("nothing-here").unwrap(), None);
    }

    #[test]
    fn test_file_storage_persists() {
        let dir = std::env::temp_dir().join(format!("aiden-arcade-file-{}", std::process::id()));
        let mut storage = FileStorage::new(&dir);
        storage.write("progress", "{\"a\":1}").unwrap();

        let reopened = FileStorage::new(&dir);
        assert_eq!(reopened.read("progress").unwrap().as_deref(), Some("{\"a\":1}"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
