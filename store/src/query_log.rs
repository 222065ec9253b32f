//! Bounded log of recent queries.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, StorageError};
use crate::record::now;

/// Entries kept by default.
pub const DEFAULT_QUERY_LOG_CAP: usize = 100;

/// Project recorded when no project is active.
pub const UNKNOWN_PROJECT: &str = "unknown";

/// One logged query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub date: NaiveDateTime,

    /// Command that ran the query, such as `find`.
    pub command: String,
    pub query: String,

    /// Number of results returned.
    pub results: usize,

    /// Active project alias, or `unknown`.
    pub project: String,
}

/// The most recent queries, oldest first, stored as one JSON array.
#[derive(Debug, Clone)]
pub struct QueryLog {
    path: PathBuf,
    cap: usize,
}

impl QueryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cap: DEFAULT_QUERY_LOG_CAP,
        }
    }

    /// Set how many entries are kept.
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries. A missing or unreadable log is empty.
    pub fn load(&self) -> Vec<QueryLogEntry> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                debug!("No query log at {}: {e}", self.path.display());
                return Vec::new();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Ignoring malformed query log {}: {e}", self.path.display());
            Vec::new()
        })
    }

    /// Entries, optionally only those for `project`.
    pub fn entries(&self, project: Option<&str>) -> Vec<QueryLogEntry> {
        let mut entries = self.load();
        if let Some(project) = project {
            entries.retain(|entry| entry.project == project);
        }
        entries
    }

    /// Record a query and drop the oldest entries beyond the cap.
    pub fn append(
        &self,
        command: &str,
        query: &str,
        results: usize,
        project: Option<&str>,
    ) -> Result<()> {
        let mut entries = self.load();
        entries.push(QueryLogEntry {
            date: now(),
            command: command.to_string(),
            query: query.to_string(),
            results,
            project: project.unwrap_or(UNKNOWN_PROJECT).to_string(),
        });

        let excess = entries.len().saturating_sub(self.cap);
        entries.drain(..excess);

        self.write(&entries)
    }

    fn write(&self, entries: &[QueryLogEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::CreateDirectory(format!("{}: {e}", parent.display()))
            })?;
        }
        let content = serde_json::to_string_pretty(entries)?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &content)
            .map_err(|e| StorageError::WriteFile(format!("{}: {e}", temp_path.display())))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| StorageError::WriteFile(format!("{}: {e}", self.path.display())))?;
        Ok(())
    }
}
