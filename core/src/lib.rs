//! # Recall
//!
//! Portable project memory: scan a source tree into a compact digest, keep
//! an append-only history of past digests, and answer queries against them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use recall_core::{MemoryTarget, PackParams, Recall, RecallConfig};
//!
//! let recall = Recall::new(RecallConfig::default());
//! recall.pack(&PackParams::new("./my-app").with_alias("app"))?;
//!
//! let target = MemoryTarget::Alias("app".to_string());
//! let found = recall.find(&target, "auth", Some("app"))?;
//! ```
//!
//! The active project is never read from shared state: every operation that
//! needs one takes it as an argument.

pub mod config;
pub mod engine;
pub mod error;
pub mod pack;
pub mod query;

pub use config::RecallConfig;
pub use engine::{MemoryTarget, Recall};
pub use error::{RecallError, Result};
pub use pack::{PackOutcome, PackParams, build_summary, group_thousands};
pub use query::{Dependencies, DiffOutcome, FileEntities};

// Re-export the collaborator seam and the data model for callers.
pub use recall_protocol::{
    DirectorySummary, Entities, EntityCategory, KeyFile, ProjectStats, Stack,
};
pub use recall_scanner::{ChangeKind, FileChange, GitCli, NoVersionControl, VersionControl};
pub use recall_search::{FileMatch, FindResult};
pub use recall_store::{
    MemoryRecord, MemorySummary, QueryLogEntry, SnapshotId, SnapshotInfo, find_local_memory,
};
