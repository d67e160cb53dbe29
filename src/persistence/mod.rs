//! Key-value persistence for integers that outlive a session
//!
//! Stores:
//! - `MemoryStore`: in-process map (tests, fallback)
//! - `JsonFileStore`: JSON object on disk, written via temp file + rename (native)
//! - `LocalStorageStore`: browser LocalStorage, values as decimal strings (WASM)
//!
//! Reads never fail: missing or corrupt values come back as `None`. Write
//! failures are logged and otherwise ignored.

use std::collections::HashMap;

/// Minimal integer key-value contract
pub trait KeyValueStore {
    /// Stored value, or `None` if missing or unreadable
    fn get(&self, key: &str) -> Option<u64>;
    /// Store `value` under `key`
    fn set(&mut self, key: &str, value: u64);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<u64> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: u64) {
        (**self).set(key, value)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one value
    pub fn with_value(key: &str, value: u64) -> Self {
        let mut store = Self::new();
        store.set(key, value);
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<u64> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: u64) {
        self.values.insert(key.to_string(), value);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    use super::KeyValueStore;

    /// JSON object file (`{"key": 123}`) on disk
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_all(&self) -> BTreeMap<String, u64> {
            let Ok(json) = fs::read_to_string(&self.path) else {
                return BTreeMap::new();
            };
            match serde_json::from_str(&json) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("Ignoring corrupt store {}: {}", self.path.display(), e);
                    BTreeMap::new()
                }
            }
        }

        fn write_all(&self, values: &BTreeMap<String, u64>) -> std::io::Result<()> {
            let json = serde_json::to_string_pretty(values)?;
            let tmp = self.path.with_extension("tmp");
            fs::write(&tmp, json)?;
            fs::rename(&tmp, &self.path)
        }
    }

    impl KeyValueStore for JsonFileStore {
        fn get(&self, key: &str) -> Option<u64> {
            self.read_all().get(key).copied()
        }

        fn set(&mut self, key: &str, value: u64) {
            let mut values = self.read_all();
            values.insert(key.to_string(), value);
            if let Err(e) = self.write_all(&values) {
                log::warn!("Failed to write {}: {}", self.path.display(), e);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod local {
    use super::KeyValueStore;

    /// Browser LocalStorage
    #[derive(Debug, Clone, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        fn storage() -> Option<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
        }
    }

    impl KeyValueStore for LocalStorageStore {
        fn get(&self, key: &str) -> Option<u64> {
            let raw = Self::storage()?.get_item(key).ok()??;
            raw.trim().parse().ok()
        }

        fn set(&mut self, key: &str, value: u64) {
            match Self::storage() {
                Some(storage) => {
                    if storage.set_item(key, &value.to_string()).is_err() {
                        log::warn!("LocalStorage rejected write to {}", key);
                    }
                }
                None => log::warn!("LocalStorage unavailable, {} not saved", key),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("best"), None);
        store.set("best", 42);
        assert_eq!(store.get("best"), Some(42));
        store.set("best", 7);
        assert_eq!(store.get("best"), Some(7));
    }

    #[test]
    fn test_store_through_mut_ref() {
        fn record<S: KeyValueStore>(mut store: S) {
            store.set("k", 3);
        }

        let mut store = MemoryStore::new();
        record(&mut store);
        assert_eq!(store.get("k"), Some(3));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_json_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.get("best"), None);
        store.set("best", 750);
        store.set("other", 1);

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("best"), Some(750));
        assert_eq!(reopened.get("other"), Some(1));
        assert!(!path.with_extension("tmp").exists());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_json_file_store_corrupt_reads_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "not json {").unwrap();

        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.get("best"), None);

        // Writing replaces the corrupt file
        store.set("best", 10);
        assert_eq!(store.get("best"), Some(10));
    }
}
