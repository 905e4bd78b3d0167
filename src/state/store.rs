use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("store encoding error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("expiry of {0} days is out of range")]
    InvalidExpiry(i64),
}

/// Small client-local key/value store with per-entry expiry
pub trait KeyValueStore {
    /// Store `value` under `key`, expiring after `expires_in_days`
    fn set(&mut self, key: &str, value: &str, expires_in_days: i64) -> Result<(), StoreError>;

    /// Read a value; expired entries read as absent
    fn get(&self, key: &str) -> Option<String>;

    /// Drop `key` if present
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Entry {
    value: String,
    /// Unix timestamp (seconds) after which the entry is ignored
    expires_at: i64,
}

/// JSON-file backed store
///
/// The whole map is rewritten on every `set`. An unreadable file is
/// treated as empty so a corrupt store never blocks startup.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, Entry>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!("⚠️  Ignoring unreadable store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn set_at(
        &mut self,
        key: &str,
        value: &str,
        expires_in_days: i64,
        now: i64,
    ) -> Result<(), StoreError> {
        let expires_at = Duration::try_days(expires_in_days)
            .and_then(|lifetime| now.checked_add(lifetime.num_seconds()))
            .ok_or(StoreError::InvalidExpiry(expires_in_days))?;

        self.entries.retain(|_, entry| entry.expires_at > now);
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        self.flush()
    }

    fn get_at(&self, key: &str, now: i64) -> Option<String> {
        self.entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone())
    }

    fn flush(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn set(&mut self, key: &str, value: &str, expires_in_days: i64) -> Result<(), StoreError> {
        self.set_at(key, value, expires_in_days, Utc::now().timestamp())
    }

    fn get(&self, key: &str) -> Option<String> {
        self.get_at(key, Utc::now().timestamp())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 24 * 60 * 60;

    #[test]
    fn test_set_then_get_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = FileStore::open(&path);
        assert_eq!(store.get("lastGeneratedImage"), None);
        store.set("lastGeneratedImage", "/tmp/a.png", 7).unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(
            reopened.get("lastGeneratedImage"),
            Some("/tmp/a.png".to_string())
        );
    }

    #[test]
    fn test_entries_expire() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("store.json"));

        let now = 1_700_000_000;
        store.set_at("k", "v", 7, now).unwrap();

        assert_eq!(store.get_at("k", now + 7 * DAY - 1), Some("v".to_string()));
        assert_eq!(store.get_at("k", now + 7 * DAY), None);
    }

    #[test]
    fn test_expired_entries_pruned_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("store.json"));

        let now = 1_700_000_000;
        store.set_at("old", "v", 1, now).unwrap();
        store.set_at("new", "w", 7, now + 2 * DAY).unwrap();

        assert!(!store.entries.contains_key("old"));
        assert!(store.entries.contains_key("new"));
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("store.json"));
        store.set("k", "first", 7).unwrap();
        store.set("k", "second", 7).unwrap();
        assert_eq!(store.get("k"), Some("second".to_string()));
    }

    #[test]
    fn test_out_of_range_expiry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("store.json"));
        store.set("k", "v", 7).unwrap();

        assert!(matches!(
            store.set("k", "w", i64::MAX),
            Err(StoreError::InvalidExpiry(i64::MAX))
        ));
        // A lifetime that fits chrono but overflows the timestamp
        assert!(matches!(
            store.set_at("k", "w", 100_000_000, i64::MAX - DAY),
            Err(StoreError::InvalidExpiry(_))
        ));
        assert_eq!(store.get("k"), Some("v".to_string()));
    }

    #[test]
    fn test_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = FileStore::open(&path);
        store.set("k", "v", 7).unwrap();

        store.remove("k").unwrap();
        store.remove("missing").unwrap();

        assert_eq!(store.get("k"), None);
        assert_eq!(FileStore::open(&path).get("k"), None);
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let mut store = FileStore::open(&path);
        assert_eq!(store.get("k"), None);
        store.set("k", "v", 7).unwrap();
        assert_eq!(FileStore::open(&path).get("k"), Some("v".to_string()));
    }
}
