//! TOML-based core configuration.
//!
//! Holds the tunables for the streak subsystem, most importantly the
//! debounce window of the update coordinator. Stored at
//! `~/.config/rehabit/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Returns `~/.config/rehabit[-dev]/` based on REHABIT_ENV.
///
/// Set REHABIT_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("REHABIT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("rehabit-dev")
    } else {
        base_dir.join("rehabit")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Streak subsystem configuration.
///
/// Serialized to/from TOML at `~/.config/rehabit/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Debounce window for the update coordinator, in milliseconds.
    /// Completion events for one user arriving within this window
    /// collapse into a single recalculation pass.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Timeout applied to store reads and writes, in seconds.
    #[serde(default = "default_store_timeout_secs")]
    pub store_timeout_secs: u64,
}

fn default_debounce_ms() -> u64 {
    500
}
fn default_store_timeout_secs() -> u64 {
    30
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            store_timeout_secs: default_store_timeout_secs(),
        }
    }
}

impl StreakConfig {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    /// Load from a specific path or return default (written back).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)
    }

    /// Persist to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Debounce window as a [`std::time::Duration`].
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = StreakConfig::default();
        assert_eq!(cfg.debounce_ms, 500);
        assert_eq!(cfg.store_timeout_secs, 30);
    }

    #[test]
    fn test_load_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = StreakConfig::load_from(&path).unwrap();
        assert_eq!(cfg, StreakConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = StreakConfig {
            debounce_ms: 1200,
            store_timeout_secs: 10,
        };
        cfg.save_to(&path).unwrap();
        let loaded = StreakConfig::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "debounce_ms = 250\n").unwrap();
        let cfg = StreakConfig::load_from(&path).unwrap();
        assert_eq!(cfg.debounce_ms, 250);
        assert_eq!(cfg.store_timeout_secs, 30);
    }
}
