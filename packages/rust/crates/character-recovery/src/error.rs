//! Error types for character recovery.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Domain errors surfaced to callers.
///
/// Storage failures never appear here; they are contained at the
/// [`SnapshotStore`](crate::SnapshotStore) boundary.
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// No backup with the requested id exists.
    #[error("Backup with ID {0} not found")]
    BackupNotFound(String),

    /// The built-in character schema could not be compiled.
    #[error("Character schema error: {0}")]
    Schema(String),

    /// Configuration loading/parsing failures.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures raised by the bundled key-value backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Write would exceed the backend's byte capacity.
    #[error("Storage quota exceeded: {required} bytes required (capacity: {capacity})")]
    QuotaExceeded {
        /// Total bytes the store would hold after the write.
        required: usize,
        /// Configured capacity in bytes.
        capacity: usize,
    },

    /// Key contains characters the backend cannot address.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}
