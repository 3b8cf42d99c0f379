//! One-stop facade over backups, validation recovery and auto-save.

use std::sync::Arc;

use serde_json::Value;

use crate::advisor::generate_recovery_suggestions;
use crate::autosave::{AutoSaveHandle, AutoSaveScheduler};
use crate::backup::{AutoSaveSlot, Backup, BackupSource};
use crate::config::RecoveryConfig;
use crate::error::RecoveryError;
use crate::kv_store::KeyValueStore;
use crate::manager::BackupManager;
use crate::schema::{CharacterSchemaValidator, DraftValidator};
use crate::snapshot::SnapshotStore;
use crate::validation::{RecoveryEngine, RecoveryReport};

/// Character data recovery bound to one key-value backend.
#[derive(Debug)]
pub struct CharacterDataRecovery<V = CharacterSchemaValidator> {
    config: RecoveryConfig,
    backups: BackupManager,
    engine: RecoveryEngine<V>,
    scheduler: AutoSaveScheduler,
}

impl CharacterDataRecovery<CharacterSchemaValidator> {
    /// Recovery over `backend` using the built-in character schema.
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::Schema`] if the schema does not compile.
    pub fn open(
        backend: Arc<dyn KeyValueStore>,
        config: RecoveryConfig,
    ) -> Result<Self, RecoveryError> {
        Ok(Self::with_validator(
            backend,
            config,
            CharacterSchemaValidator::new()?,
        ))
    }
}

impl<V: DraftValidator> CharacterDataRecovery<V> {
    /// Recovery over `backend` with a custom validator.
    #[must_use]
    pub fn with_validator(
        backend: Arc<dyn KeyValueStore>,
        config: RecoveryConfig,
        validator: V,
    ) -> Self {
        let snapshots = SnapshotStore::new(backend);
        Self {
            config,
            backups: BackupManager::with_snapshots(snapshots.clone(), config.max_backups),
            engine: RecoveryEngine::new(validator),
            scheduler: AutoSaveScheduler::new(snapshots),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    /// Backup manager.
    #[must_use]
    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Validation-recovery engine.
    #[must_use]
    pub fn engine(&self) -> &RecoveryEngine<V> {
        &self.engine
    }

    /// See [`BackupManager::create_backup`].
    pub fn create_backup(
        &self,
        draft: &Value,
        source: BackupSource,
        character_id: Option<&str>,
    ) -> Backup {
        self.backups.create_backup(draft, source, character_id)
    }

    /// See [`BackupManager::all_backups`].
    #[must_use]
    pub fn all_backups(&self) -> Vec<Backup> {
        self.backups.all_backups()
    }

    /// See [`BackupManager::character_backups`].
    #[must_use]
    pub fn character_backups(&self, character_id: &str) -> Vec<Backup> {
        self.backups.character_backups(character_id)
    }

    /// See [`BackupManager::restore_from_backup`].
    ///
    /// # Errors
    ///
    /// Returns [`RecoveryError::BackupNotFound`] for unknown ids.
    pub fn restore_from_backup(&self, backup_id: &str) -> Result<Value, RecoveryError> {
        self.backups.restore_from_backup(backup_id)
    }

    /// See [`BackupManager::delete_backup`].
    pub fn delete_backup(&self, backup_id: &str) {
        self.backups.delete_backup(backup_id);
    }

    /// See [`BackupManager::clear_all_backups`].
    pub fn clear_all_backups(&self) {
        self.backups.clear_all_backups();
    }

    /// See [`BackupManager::latest_auto_save`].
    #[must_use]
    pub fn latest_auto_save(&self) -> Option<AutoSaveSlot> {
        self.backups.latest_auto_save()
    }

    /// See [`BackupManager::clear_auto_save`].
    pub fn clear_auto_save(&self) {
        self.backups.clear_auto_save();
    }

    /// See [`RecoveryEngine::validate_with_recovery`].
    #[must_use]
    pub fn validate_with_recovery(&self, draft: &Value) -> RecoveryReport {
        self.engine.validate_with_recovery(draft)
    }

    /// See [`generate_recovery_suggestions`].
    #[must_use]
    pub fn recovery_suggestions(&self, draft: &Value) -> Vec<String> {
        generate_recovery_suggestions(draft)
    }

    /// Start auto-save with the configured interval.
    pub fn start_auto_save<F>(
        &self,
        draft_provider: F,
        character_id: Option<&str>,
    ) -> AutoSaveHandle
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.scheduler.start(draft_provider, character_id, &self.config.auto_save)
    }
}
