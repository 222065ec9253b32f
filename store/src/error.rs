//! Error types for the memory store.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur reading or writing memories.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Record, snapshot or file does not exist.
    #[error("memory not found: {0}")]
    NotFound(String),

    /// Stored payload failed checksum, decoding, decompression or parsing.
    #[error("corrupt memory file: {0}")]
    Corrupt(String),

    /// Payload written by an incompatible format revision.
    #[error("unsupported memory format version {found} (supported: {supported})")]
    UnsupportedVersion { found: String, supported: String },

    /// Alias that cannot be used as a file name.
    #[error("invalid alias {0:?}: must be a single path component")]
    InvalidAlias(String),

    /// Every suffix for a snapshot identifier is taken.
    #[error("snapshot identifier exhausted: {0}")]
    SnapshotCollision(String),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error while writing.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem-level failures, with the path involved.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to create a store directory.
    #[error("failed to create directory: {0}")]
    CreateDirectory(String),

    /// Failed to read a file.
    #[error("failed to read file: {0}")]
    ReadFile(String),

    /// Failed to write a file.
    #[error("failed to write file: {0}")]
    WriteFile(String),
}
