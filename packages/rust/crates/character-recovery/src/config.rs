//! Recovery and auto-save configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RecoveryError;

/// Default number of backups retained in the store.
pub const DEFAULT_MAX_BACKUPS: usize = 10;

/// Default auto-save interval in milliseconds.
pub const DEFAULT_AUTO_SAVE_INTERVAL_MS: u64 = 30_000;

/// Auto-save scheduler options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoSaveConfig {
    /// Whether the scheduler registers a timer at all.
    pub enable_auto_save: bool,
    /// Interval between ticks in milliseconds.
    #[serde(rename = "autoSaveInterval")]
    pub auto_save_interval_ms: u64,
}

impl AutoSaveConfig {
    /// Tick interval, never shorter than one millisecond.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.auto_save_interval_ms.max(1))
    }

    /// Config with auto-save turned off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enable_auto_save: false,
            ..Self::default()
        }
    }

    /// Enabled config ticking every `interval_ms`.
    #[must_use]
    pub fn every_ms(interval_ms: u64) -> Self {
        Self {
            enable_auto_save: true,
            auto_save_interval_ms: interval_ms,
        }
    }
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enable_auto_save: true,
            auto_save_interval_ms: DEFAULT_AUTO_SAVE_INTERVAL_MS,
        }
    }
}

/// Top-level recovery configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecoveryConfig {
    /// Retention bound for the backup list.
    pub max_backups: usize,
    /// Auto-save options.
    #[serde(flatten)]
    pub auto_save: AutoSaveConfig,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_backups: DEFAULT_MAX_BACKUPS,
            auto_save: AutoSaveConfig::default(),
        }
    }
}

impl RecoveryConfig {
    /// Parse a JSON config such as `{"maxBackups": 5, "autoSaveInterval": 5000}`.
    ///
    /// Absent fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::Config`] for empty input or malformed JSON.
    pub fn from_json(raw: &str) -> Result<Self, RecoveryError> {
        if raw.trim().is_empty() {
            return Err(RecoveryError::Config("empty config string".to_string()));
        }
        serde_json::from_str(raw).map_err(|err| RecoveryError::Config(err.to_string()))
    }
}

/// Directory used by [`crate::FileKeyValueStore::at_default_location`].
///
/// Resolves `$PRJ_DATA_HOME/character-recovery`, else `$PRJ_ROOT/.data/character-recovery`,
/// else `./.data/character-recovery`.
#[must_use]
pub fn default_store_path() -> PathBuf {
    let root = env_path("PRJ_ROOT")
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let data_home = env_path("PRJ_DATA_HOME").unwrap_or_else(|| root.join(".data"));

    data_home.join("character-recovery")
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
