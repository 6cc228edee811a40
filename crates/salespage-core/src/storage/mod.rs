//! Local persistence: key-value storage backends and application config.

mod config;
pub mod database;
pub mod migrations;

pub use config::{AppConfig, LockerSettings, StorageSettings};
pub use database::Database;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StorageError;

/// Storage key of the serialized content document.
pub const CONTENT_KEY: &str = "site_content";
/// Storage key of the locker reference timestamp (epoch ms).
pub const FIRST_SEEN_KEY: &str = "locker:firstSeenAt";
/// Storage key of the computed unlock deadline (epoch ms).
pub const UNLOCKED_UNTIL_KEY: &str = "locker:unlockedUntil";

/// Synchronous string key-value storage.
///
/// Writes may fail (quota, locked database); callers that face the public
/// page log the failure and carry on with their in-memory state.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, used by tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    /// Largest value accepted by `set`, if any.
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects values larger than `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(bytes),
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota_bytes {
            if value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    bytes: value.len(),
                });
            }
        }
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Returns `~/.config/salespage[-dev]/` based on SALESPAGE_ENV.
///
/// Set SALESPAGE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SALESPAGE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("salespage-dev")
    } else {
        base_dir.join("salespage")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get(CONTENT_KEY).unwrap().is_none());
        store.set(CONTENT_KEY, "{}").unwrap();
        assert_eq!(store.get(CONTENT_KEY).unwrap().as_deref(), Some("{}"));
        store.remove(CONTENT_KEY).unwrap();
        assert!(store.get(CONTENT_KEY).unwrap().is_none());
    }

    #[test]
    fn memory_store_enforces_quota() {
        let store = MemoryStore::with_quota(4);
        store.set("k", "1234").unwrap();
        let err = store.set("k", "12345").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { bytes: 5, .. }));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("1234"));
    }
}
