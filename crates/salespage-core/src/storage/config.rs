//! TOML-based application configuration.
//!
//! Stores operator preferences including:
//! - Locker behaviour (progress persistence, auto-start delay, tick period)
//! - Storage file name
//! - Log level
//!
//! Configuration is stored at `~/.config/salespage/config.toml`.
//! Page content does NOT live here; it lives in the key-value store.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Locker runtime settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockerSettings {
    /// Keep countdown progress across runs (`locker:firstSeenAt`).
    #[serde(default)]
    pub persist_progress: bool,
    /// Delay before an `immediate` countdown starts after page-ready.
    #[serde(default = "default_auto_start_delay_secs")]
    pub auto_start_delay_secs: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/salespage/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub locker: LockerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

fn default_auto_start_delay_secs() -> u64 {
    2
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_database_file() -> String {
    "salespage.db".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for LockerSettings {
    fn default() -> Self {
        Self {
            persist_progress: false,
            auto_start_delay_secs: default_auto_start_delay_secs(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            locker: LockerSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl AppConfig {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default config file location.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/salespage"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, in memory only. Call `save` to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not parse as
    /// the key's existing type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("falling back to default config: {e}");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = AppConfig::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: AppConfig = toml::from_str("log_level = \"debug\"\n").unwrap();
        assert_eq!(parsed.log_level, "debug");
        assert_eq!(parsed.locker.auto_start_delay_secs, 2);
        assert_eq!(parsed.locker.tick_interval_ms, 1000);
        assert!(!parsed.locker.persist_progress);
        assert_eq!(parsed.storage.database_file, "salespage.db");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("locker.persist_progress").as_deref(), Some("false"));
        assert_eq!(cfg.get("locker.tick_interval_ms").as_deref(), Some("1000"));
        assert_eq!(cfg.get("log_level").as_deref(), Some("info"));
        assert!(cfg.get("locker.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = AppConfig::default();
        cfg.set("locker.persist_progress", "true").unwrap();
        cfg.set("locker.auto_start_delay_secs", "0").unwrap();
        cfg.set("storage.database_file", "other.db").unwrap();
        assert!(cfg.locker.persist_progress);
        assert_eq!(cfg.locker.auto_start_delay_secs, 0);
        assert_eq!(cfg.storage.database_file, "other.db");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = AppConfig::default();
        assert!(matches!(
            cfg.set("locker.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("locker", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = AppConfig::default();
        let result = cfg.set("locker.persist_progress", "not_a_bool");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        let result = cfg.set("locker.tick_interval_ms", "-5");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = AppConfig::load_from(&path).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = [").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }
}
