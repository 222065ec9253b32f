//! Error types for the project scanner.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that abort a scan.
///
/// Failures on individual files never surface here; the analyzer skips the
/// file and keeps walking.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The project root does not exist.
    #[error("project root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The project root exists but is not a directory.
    #[error("project root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}
