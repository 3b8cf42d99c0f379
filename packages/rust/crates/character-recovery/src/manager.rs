//! Backup lifecycle and retention.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::backup::{AutoSaveSlot, Backup, BackupSource};
use crate::config::{DEFAULT_MAX_BACKUPS, RecoveryConfig};
use crate::draft::structural_clone;
use crate::error::RecoveryError;
use crate::kv_store::KeyValueStore;
use crate::snapshot::SnapshotStore;

/// Creates, lists, restores and evicts character backups.
///
/// Holds no in-memory state besides the retention bound: every call reads
/// the current list from the snapshot store, so several managers over the
/// same backend see each other's writes (last write wins).
#[derive(Debug, Clone)]
pub struct BackupManager {
    snapshots: SnapshotStore,
    max_backups: usize,
}

impl BackupManager {
    /// Manager with the default retention bound.
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_snapshots(SnapshotStore::new(backend), DEFAULT_MAX_BACKUPS)
    }

    /// Manager using `config.max_backups`.
    #[must_use]
    pub fn with_config(backend: Arc<dyn KeyValueStore>, config: &RecoveryConfig) -> Self {
        Self::with_snapshots(SnapshotStore::new(backend), config.max_backups)
    }

    /// Manager over an existing snapshot store. A zero bound is raised to one.
    #[must_use]
    pub fn with_snapshots(snapshots: SnapshotStore, max_backups: usize) -> Self {
        Self {
            snapshots,
            max_backups: max_backups.max(1),
        }
    }

    /// Underlying snapshot store.
    #[must_use]
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Retention bound.
    #[must_use]
    pub fn max_backups(&self) -> usize {
        self.max_backups
    }

    /// Back up `draft` now.
    ///
    /// Never fails: if persisting is impossible the returned backup is still
    /// usable, it just will not be found by later reads.
    pub fn create_backup(
        &self,
        draft: &Value,
        source: BackupSource,
        character_id: Option<&str>,
    ) -> Backup {
        self.create_backup_at(draft, source, character_id, Utc::now())
    }

    /// Back up `draft` with an explicit creation instant.
    pub fn create_backup_at(
        &self,
        draft: &Value,
        source: BackupSource,
        character_id: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Backup {
        let backup = Backup::capture(draft, source, character_id, timestamp);

        let mut backups = self.snapshots.read_backup_list();
        backups.push(backup.clone());
        self.snapshots.write_backup_list(&backups);

        if backups.len() > self.max_backups {
            // Stable sort: equal timestamps keep their stored order.
            backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            let evicted = backups.len() - self.max_backups;
            backups.truncate(self.max_backups);
            self.snapshots.write_backup_list(&backups);
            log::info!(
                "evicted {evicted} character backups, keeping {}",
                backups.len()
            );
        }

        log::debug!(
            "created {} backup {} (restorable: {})",
            backup.source.as_str(),
            backup.id,
            backup.is_valid
        );
        backup
    }

    /// All stored backups in stored order.
    #[must_use]
    pub fn all_backups(&self) -> Vec<Backup> {
        self.snapshots.read_backup_list()
    }

    /// Backups of one character, in stored order.
    #[must_use]
    pub fn character_backups(&self, character_id: &str) -> Vec<Backup> {
        self.all_backups()
            .into_iter()
            .filter(|backup| backup.belongs_to(character_id))
            .collect()
    }

    /// Independent copy of the draft stored in backup `backup_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::BackupNotFound`] when no backup has that id.
    pub fn restore_from_backup(&self, backup_id: &str) -> Result<Value, RecoveryError> {
        self.all_backups()
            .iter()
            .find(|backup| backup.id == backup_id)
            .map(|backup| structural_clone(&backup.data))
            .ok_or_else(|| RecoveryError::BackupNotFound(backup_id.to_string()))
    }

    /// Remove backup `backup_id`. Unknown ids are ignored.
    pub fn delete_backup(&self, backup_id: &str) {
        let mut backups = self.all_backups();
        backups.retain(|backup| backup.id != backup_id);
        self.snapshots.write_backup_list(&backups);
    }

    /// Remove every stored backup.
    pub fn clear_all_backups(&self) {
        self.snapshots.clear_backup_list();
    }

    /// Latest auto-saved draft, if any.
    #[must_use]
    pub fn latest_auto_save(&self) -> Option<AutoSaveSlot> {
        self.snapshots.read_auto_save()
    }

    /// Discard the auto-save slot.
    pub fn clear_auto_save(&self) {
        self.snapshots.clear_auto_save();
    }

    /// Record a pre-operation backup of `draft`, then run `operation`.
    ///
    /// The backup is returned alongside the operation's result so a failed
    /// operation can be rolled back with [`restore_from_backup`](Self::restore_from_backup).
    pub fn with_pre_operation_backup<T, F>(
        &self,
        draft: &Value,
        character_id: Option<&str>,
        operation: F,
    ) -> (Backup, T)
    where
        F: FnOnce() -> T,
    {
        let backup = self.create_backup(draft, BackupSource::PreOperation, character_id);
        let outcome = operation();
        (backup, outcome)
    }
}
