//! character-recovery - Error recovery and auto-save for character drafts.
//!
//! Keeps the character authoring flow safe from lost work and invalid input:
//! - Versioned draft backups with bounded retention
//! - Validation that classifies schema failures and proposes auto-fixes
//! - Heuristic completeness suggestions for partial drafts
//! - Periodic background auto-save into a single slot
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 UI Layer (character forms)                  │
//! └─────────────────────────────────────────────────────────────┘
//!        │ drafts              │ drafts               │ provider
//!        ▼                     ▼                      ▼
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │ BackupManager│   │  RecoveryEngine  │   │ AutoSaveScheduler│
//! └──────────────┘   │  (DraftValidator)│   └──────────────────┘
//!        │           └──────────────────┘            │
//!        ▼                                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │        SnapshotStore (best-effort, never fails)             │
//! │        KeyValueStore: memory / file / host-provided         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use character_recovery::{BackupManager, BackupSource, MemoryKeyValueStore};
//!
//! let manager = BackupManager::new(Arc::new(MemoryKeyValueStore::new()));
//! let draft = serde_json::json!({ "name": "Tordek" });
//! let backup = manager.create_backup(&draft, BackupSource::Manual, Some("char-1"));
//! assert_eq!(manager.restore_from_backup(&backup.id).ok(), Some(draft));
//! ```
//!
//! ```rust
//! use character_recovery::generate_recovery_suggestions;
//!
//! let hints = generate_recovery_suggestions(&serde_json::json!({}));
//! assert!(hints.iter().any(|hint| hint.starts_with("Add a character name")));
//! ```

// ============================================================================
// Core modules
// ============================================================================

mod advisor;
mod autosave;
mod backup;
mod config;
mod draft;
mod error;
mod kv_store;
mod manager;
mod persistence;
mod recovery;
mod schema;
mod snapshot;
mod validation;

// ============================================================================
// Public exports
// ============================================================================

pub use advisor::generate_recovery_suggestions;
pub use autosave::{AutoSaveHandle, AutoSaveScheduler, save_tick};
pub use backup::{AutoSaveSlot, Backup, BackupSource, looks_restorable};
pub use config::{
    AutoSaveConfig, DEFAULT_AUTO_SAVE_INTERVAL_MS, DEFAULT_MAX_BACKUPS, RecoveryConfig,
    default_store_path,
};
pub use draft::{CharacterDraft, has_populated_fields, is_present, set_path, structural_clone};
pub use error::{RecoveryError, StorageError};
pub use kv_store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use manager::BackupManager;
pub use recovery::CharacterDataRecovery;
pub use schema::{
    AbilityScores, CharacterClass, CharacterSchemaValidator, CharacterSheet, ClassLevel,
    DraftValidator, FieldError, FieldErrorKind, HitPoints, Race,
};
pub use snapshot::{AUTOSAVE_KEY, BACKUPS_KEY, SnapshotStore};
pub use validation::{
    GENERIC_FIX, RecoveryEngine, RecoveryReport, ValidationErrorWithFix, apply_auto_fixes,
    classify_error,
};
