//! Backup records and the auto-save slot.
//!
//! A backup is an immutable copy of a character draft at a point in time,
//! tagged with where it came from and a cheap "worth restoring" flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::draft::{is_present, structural_clone};

/// Provenance tag of a backup. Only used for filtering and display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackupSource {
    /// Written by the auto-save flow.
    AutoSave,
    /// Explicitly requested by the user.
    #[default]
    Manual,
    /// Taken right before a risky operation.
    PreOperation,
}

impl BackupSource {
    /// String form used in stored records and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutoSave => "auto-save",
            Self::Manual => "manual",
            Self::PreOperation => "pre-operation",
        }
    }
}

/// A character draft captured at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    /// Unique identifier (`backup_<millis>_<suffix>`).
    pub id: String,
    /// Creation instant, stored as ISO-8601.
    pub timestamp: DateTime<Utc>,
    /// Character the draft belongs to; absent for unsaved characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
    /// Independent copy of the draft.
    pub data: Value,
    /// Provenance tag.
    pub source: BackupSource,
    /// Presence heuristic, not schema validation.
    pub is_valid: bool,
}

impl Backup {
    /// Capture `draft` at `timestamp`.
    #[must_use]
    pub fn capture(
        draft: &Value,
        source: BackupSource,
        character_id: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_backup_id(timestamp),
            timestamp,
            character_id: character_id.map(str::to_string),
            data: structural_clone(draft),
            source,
            is_valid: looks_restorable(draft),
        }
    }

    /// Whether this backup belongs to `character_id`.
    #[must_use]
    pub fn belongs_to(&self, character_id: &str) -> bool {
        self.character_id.as_deref() == Some(character_id)
    }
}

/// Cheap restore-worthiness check: any of name, race, classes or ability scores present.
#[must_use]
pub fn looks_restorable(draft: &Value) -> bool {
    ["name", "race", "classes", "abilityScores"]
        .iter()
        .any(|field| is_present(draft.get(*field)))
}

fn generate_backup_id(timestamp: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("backup_{}_{}", timestamp.timestamp_millis(), &suffix[..9])
}

/// The single latest auto-saved draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSaveSlot {
    /// Snapshot of the draft.
    pub data: Value,
    /// When the snapshot was taken, stored as ISO-8601.
    pub timestamp: DateTime<Utc>,
    /// Character the draft belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
}

impl AutoSaveSlot {
    /// Snapshot `draft` now.
    #[must_use]
    pub fn capture(draft: &Value, character_id: Option<&str>) -> Self {
        Self {
            data: structural_clone(draft),
            timestamp: Utc::now(),
            character_id: character_id.map(str::to_string),
        }
    }
}
