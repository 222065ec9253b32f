//! Error types for Recall operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Recall operations.
pub type Result<T> = std::result::Result<T, RecallError>;

/// Errors surfaced to callers.
#[derive(Error, Debug)]
pub enum RecallError {
    /// Store error (missing or corrupt memory, failed write).
    #[error(transparent)]
    Store(#[from] recall_store::StoreError),

    /// Scan error.
    #[error(transparent)]
    Scan(#[from] recall_scanner::ScanError),

    /// The operation needs an active project and none was given.
    #[error("no active project")]
    NoActiveProject,

    /// The project a memory was packed from no longer exists.
    #[error("project path not found: {}", .0.display())]
    ProjectPathMissing(PathBuf),

    /// No snapshot was taken on or before the requested date.
    #[error("no snapshot of {alias} on or before {date}")]
    NoSnapshotAt { alias: String, date: String },

    /// A date argument could not be parsed.
    #[error("invalid date {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    /// The memory has no commit to diff against.
    #[error("no commit recorded in this memory")]
    NoCommitRecorded,
}

impl RecallError {
    /// Whether the memory exists but could not be read back.
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            Self::Store(
                recall_store::StoreError::Corrupt(_)
                    | recall_store::StoreError::UnsupportedVersion { .. }
            )
        )
    }

    /// Whether the requested memory does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(recall_store::StoreError::NotFound(_)))
    }
}
