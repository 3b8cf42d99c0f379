//! Best-effort persistence of the backup list and the auto-save slot.
//!
//! Every method here is infallible from the caller's side: storage errors,
//! quota failures and corrupted payloads are logged as warnings and turned
//! into "empty"/"absent" results. Callers must not assume durability.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::backup::{AutoSaveSlot, Backup};
use crate::kv_store::KeyValueStore;

/// Storage key of the backup list (JSON array of backups).
pub const BACKUPS_KEY: &str = "dnd_character_backups";

/// Storage key of the auto-save slot (single JSON object).
pub const AUTOSAVE_KEY: &str = "dnd_character_autosave";

/// Typed view over the two recovery keys of a shared key-value store.
#[derive(Clone)]
pub struct SnapshotStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("backend", &self.backend.backend_name())
            .finish()
    }
}

impl SnapshotStore {
    /// Wrap a shared key-value backend.
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Backend identifier for logs.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Load the backup list. Never fails.
    ///
    /// An unreadable payload yields an empty list. Individual records that
    /// do not decode are skipped, so the readable ones survive the next write.
    #[must_use]
    pub fn read_backup_list(&self) -> Vec<Backup> {
        let entries = match self.load_json::<Vec<Value>>(BACKUPS_KEY) {
            Ok(Some(entries)) => entries,
            Ok(None) => return Vec::new(),
            Err(err) => {
                log::warn!(
                    "failed to load character backups from {} store: {err:#}",
                    self.backend_name()
                );
                return Vec::new();
            }
        };
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<Backup>(entry) {
                Ok(backup) => Some(backup),
                Err(err) => {
                    log::warn!("skipping unreadable character backup at index {index}: {err}");
                    None
                }
            })
            .collect()
    }

    /// Replace the stored backup list. Failures are logged and swallowed.
    pub fn write_backup_list(&self, backups: &[Backup]) {
        if let Err(err) = self.store_json(BACKUPS_KEY, backups) {
            log::warn!(
                "failed to save {} character backups to {} store: {err:#}",
                backups.len(),
                self.backend_name()
            );
        }
    }

    /// Drop the whole backup list. Failures are logged and swallowed.
    pub fn clear_backup_list(&self) {
        self.remove_key(BACKUPS_KEY);
    }

    /// Load the auto-save slot, `None` when absent or unreadable.
    #[must_use]
    pub fn read_auto_save(&self) -> Option<AutoSaveSlot> {
        match self.load_json::<AutoSaveSlot>(AUTOSAVE_KEY) {
            Ok(slot) => slot,
            Err(err) => {
                log::warn!(
                    "failed to load character auto-save from {} store: {err:#}",
                    self.backend_name()
                );
                None
            }
        }
    }

    /// Overwrite the auto-save slot.
    ///
    /// Returns whether the write landed; callers are free to ignore it.
    pub fn write_auto_save(&self, slot: &AutoSaveSlot) -> bool {
        match self.store_json(AUTOSAVE_KEY, slot) {
            Ok(()) => true,
            Err(err) => {
                log::warn!(
                    "failed to save character auto-save to {} store: {err:#}",
                    self.backend_name()
                );
                false
            }
        }
    }

    /// Discard the auto-save slot. Failures are logged and swallowed.
    pub fn clear_auto_save(&self) {
        self.remove_key(AUTOSAVE_KEY);
    }

    fn load_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.backend.get(key)? else {
            log::debug!("no stored value under {key}");
            return Ok(None);
        };
        let value = serde_json::from_str(&raw)
            .with_context(|| format!("stored value under {key} is not valid"))?;
        Ok(Some(value))
    }

    fn store_json<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let payload = serde_json::to_string(value)
            .with_context(|| format!("failed to encode value for {key}"))?;
        self.backend.set(key, &payload)
    }

    fn remove_key(&self, key: &str) {
        if let Err(err) = self.backend.remove(key) {
            log::warn!(
                "failed to remove {key} from {} store: {err:#}",
                self.backend_name()
            );
        }
    }
}
