//! Read-only queries against a stored memory.

use std::path::Path;

use recall_protocol::Entities;
use recall_scanner::{FileChange, VersionControl};
use recall_search::{FindResult, Finder, SearchableIndex};
use tracing::{debug, warn};

use crate::engine::{MemoryTarget, Recall};
use crate::error::{RecallError, Result};

/// Files reported by `deps` and `entities` for one path fragment.
const MAX_DEPENDENCY_MATCHES: usize = 3;
const MAX_ENTITY_MATCHES: usize = 5;

/// Changes since the commit recorded at pack time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOutcome {
    pub since_commit: String,
    pub changes: Vec<FileChange>,
}

/// Import edges of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependencies {
    pub path: String,

    /// Raw import targets of `path`.
    pub imports: Vec<String>,

    /// Files whose imports name `path`'s file stem.
    pub dependents: Vec<String>,
}

/// Extracted facts of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntities {
    pub path: String,
    pub entities: Entities,
}

impl<V: VersionControl> Recall<V> {
    /// Search a memory and log the query against `active`.
    ///
    /// A failure to write the query log is logged and otherwise ignored.
    pub fn find(
        &self,
        target: &MemoryTarget,
        query: &str,
        active: Option<&str>,
    ) -> Result<FindResult> {
        let record = self.load(target)?;
        let index = SearchableIndex {
            corpus: &record.index.corpus,
            files: &record.index.files,
            functions: &record.index.functions,
            classes: &record.index.classes,
        };
        let result = Finder::new()
            .with_params(self.config.bm25)
            .with_top_k(self.config.top_k)
            .find(index, query);
        debug!("find {query:?}: {} results", result.total());

        if let Err(e) = self.queries.append("find", query, result.total(), active) {
            warn!("Failed to log query: {e}");
        }
        Ok(result)
    }

    /// Files changed since the memory was packed.
    pub fn diff(&self, target: &MemoryTarget) -> Result<DiffOutcome> {
        let record = self.load(target)?;
        if record.last_commit.is_empty() {
            return Err(RecallError::NoCommitRecorded);
        }
        if !record.path.is_dir() {
            return Err(RecallError::ProjectPathMissing(record.path));
        }

        let changes = self.vcs.changed_files(&record.path, &record.last_commit);
        Ok(DiffOutcome {
            since_commit: record.last_commit,
            changes,
        })
    }

    /// Import edges of the files whose path contains `fragment`. Files that
    /// import nothing are matched too and report no imports.
    pub fn deps(&self, target: &MemoryTarget, fragment: &str) -> Result<Vec<Dependencies>> {
        let record = self.load(target)?;
        let graph = &record.index.import_graph;

        let found = record
            .index
            .files
            .iter()
            .filter(|path| path.contains(fragment))
            .take(MAX_DEPENDENCY_MATCHES)
            .map(|path| {
                let stem = file_stem(path);
                let dependents = graph
                    .iter()
                    .filter(|(other, targets)| {
                        *other != path && targets.iter().any(|t| import_names(t, stem))
                    })
                    .map(|(other, _)| other.clone())
                    .collect();
                Dependencies {
                    path: path.clone(),
                    imports: graph
                        .get(path)
                        .map(|imports| imports.iter().cloned().collect())
                        .unwrap_or_default(),
                    dependents,
                }
            })
            .collect();
        Ok(found)
    }

    /// Extracted facts of the files whose path contains `fragment`.
    pub fn entities(&self, target: &MemoryTarget, fragment: &str) -> Result<Vec<FileEntities>> {
        let record = self.load(target)?;
        Ok(record
            .entities
            .into_iter()
            .filter(|(path, _)| path.contains(fragment))
            .take(MAX_ENTITY_MATCHES)
            .map(|(path, entities)| FileEntities { path, entities })
            .collect())
    }
}

fn file_stem(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or(path)
}

/// Whether an import target's last path or module segment is `stem`.
fn import_names(target: &str, stem: &str) -> bool {
    target.rsplit(['/', '.']).next() == Some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_import_names() {
        assert!(import_names("./users", "users"));
        assert!(import_names("../api/users", "users"));
        assert!(import_names("app.models.users", "users"));
        assert!(import_names("users", "users"));
        assert!(!import_names("./user_service", "users"));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("src/api/users.ts"), "users");
        assert_eq!(file_stem("main.py"), "main");
    }
}
