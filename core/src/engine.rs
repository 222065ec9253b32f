//! The [`Recall`] facade over the scanner, search engine and memory store.

use std::path::{Path, PathBuf};

use recall_scanner::{GitCli, VersionControl};
use recall_store::{
    MemoryRecord, MemoryStore, MemorySummary, QueryLog, QueryLogEntry, SnapshotId, SnapshotInfo,
    load_file, parse_date, save_file,
};
use tracing::{debug, info};

use crate::config::RecallConfig;
use crate::error::{RecallError, Result};

/// Which memory an operation reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryTarget {
    /// The live record of a project saved in the central store.
    Alias(String),
    /// A standalone `.mem` file, usually one written next to a project.
    File(PathBuf),
}

impl MemoryTarget {
    /// The alias, if this target names one.
    pub fn alias(&self) -> Option<&str> {
        match self {
            Self::Alias(alias) => Some(alias),
            Self::File(_) => None,
        }
    }
}

/// Entry point for packing, annotating and querying project memories.
///
/// The version-control collaborator is a type parameter so callers can
/// substitute a fake in tests.
pub struct Recall<V = GitCli> {
    pub(crate) config: RecallConfig,
    pub(crate) store: MemoryStore,
    pub(crate) queries: QueryLog,
    pub(crate) vcs: V,
}

impl Recall<GitCli> {
    /// Create an instance backed by the `git` command line.
    pub fn new(config: RecallConfig) -> Self {
        Self::with_vcs(config, GitCli)
    }
}

impl<V: VersionControl> Recall<V> {
    /// Create an instance with a specific version-control collaborator.
    pub fn with_vcs(config: RecallConfig, vcs: V) -> Self {
        let store = MemoryStore::new(&config.home);
        let queries = QueryLog::new(store.queries_path()).with_cap(config.query_log_cap);
        debug!("Using memory store at {}", store.root().display());
        Self {
            config,
            store,
            queries,
            vcs,
        }
    }

    pub fn config(&self) -> &RecallConfig {
        &self.config
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// File backing `target`.
    pub fn location(&self, target: &MemoryTarget) -> Result<PathBuf> {
        match target {
            MemoryTarget::Alias(alias) => Ok(self.store.memory_path(alias)?),
            MemoryTarget::File(path) => Ok(path.clone()),
        }
    }

    /// Load the record behind `target`.
    pub fn load(&self, target: &MemoryTarget) -> Result<MemoryRecord> {
        Ok(load_file(&self.location(target)?)?)
    }

    /// Load the most recent snapshot of `alias` taken on or before `date`.
    pub fn load_at(&self, alias: &str, date: &str) -> Result<(SnapshotId, MemoryRecord)> {
        let day = parse_date(date).ok_or_else(|| RecallError::InvalidDate(date.to_string()))?;
        let id = self
            .store
            .resolve_at(alias, day)?
            .ok_or_else(|| RecallError::NoSnapshotAt {
                alias: alias.to_string(),
                date: day.to_string(),
            })?;
        let record = self.store.load_snapshot(alias, &id)?;
        info!("Loaded {alias} as of {id}");
        Ok((id, record))
    }

    /// Replace the project description.
    pub fn describe(&self, target: &MemoryTarget, text: &str) -> Result<MemoryRecord> {
        self.modify(target, |record| record.description = text.to_string())
    }

    /// Append a decision note.
    pub fn note(&self, target: &MemoryTarget, text: &str) -> Result<MemoryRecord> {
        self.modify(target, |record| record.add_decision(text))
    }

    /// Append a work-session topic.
    pub fn session(&self, target: &MemoryTarget, topic: &str) -> Result<MemoryRecord> {
        self.modify(target, |record| record.add_session(topic))
    }

    /// Summaries of every memory in the central store.
    pub fn list(&self) -> Result<Vec<MemorySummary>> {
        Ok(self.store.list_memories()?)
    }

    /// Snapshots of `alias`, newest first.
    pub fn history(&self, alias: &str) -> Result<Vec<SnapshotInfo>> {
        Ok(self.store.history(alias)?)
    }

    /// Logged queries, optionally only those made against `project`.
    pub fn queries(&self, project: Option<&str>) -> Vec<QueryLogEntry> {
        self.queries.entries(project)
    }

    fn modify(
        &self,
        target: &MemoryTarget,
        change: impl FnOnce(&mut MemoryRecord),
    ) -> Result<MemoryRecord> {
        let path = self.location(target)?;
        let mut record = load_file(&path)?;
        change(&mut record);
        save_file(&path, &mut record)?;
        debug!("Updated {}", path.display());
        Ok(record)
    }
}

/// Canonical form of a project directory.
pub(crate) fn project_root(path: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(path).map_err(|_| RecallError::ProjectPathMissing(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use recall_scanner::NoVersionControl;
    use tempfile::TempDir;

    fn recall() -> (TempDir, Recall<NoVersionControl>) {
        let dir = TempDir::new().unwrap();
        let recall = Recall::with_vcs(RecallConfig::new(dir.path()), NoVersionControl);
        (dir, recall)
    }

    fn seed(recall: &Recall<NoVersionControl>, alias: &str) {
        let mut record = MemoryRecord::new(alias, "/nowhere");
        recall.store().save(alias, &mut record).unwrap();
    }

    #[test]
    fn test_annotations_accumulate() {
        let (_dir, recall) = recall();
        seed(&recall, "app");
        let target = MemoryTarget::Alias("app".to_string());

        recall.describe(&target, "Billing backend").unwrap();
        recall.note(&target, "use postgres").unwrap();
        recall.note(&target, "drop redis").unwrap();
        recall.session(&target, "auth refactor").unwrap();

        let record = recall.load(&target).unwrap();
        assert_eq!(record.description, "Billing backend");
        let notes: Vec<_> = record.decisions.iter().map(|d| d.note.as_str()).collect();
        assert_eq!(notes, vec!["use postgres", "drop redis"]);
        assert_eq!(record.sessions.len(), 1);
    }

    #[test]
    fn test_missing_target_is_not_found() {
        let (_dir, recall) = recall();
        let err = recall
            .note(&MemoryTarget::Alias("ghost".to_string()), "x")
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_at_rejects_bad_dates() {
        let (_dir, recall) = recall();
        seed(&recall, "app");

        assert!(matches!(
            recall.load_at("app", "last tuesday"),
            Err(RecallError::InvalidDate(_))
        ));
        assert!(matches!(
            recall.load_at("app", "2024-01-01"),
            Err(RecallError::NoSnapshotAt { .. })
        ));
    }

    #[test]
    fn test_file_target_location() {
        let (_dir, recall) = recall();
        let target = MemoryTarget::File(PathBuf::from("/work/app.mem"));
        assert_eq!(
            recall.location(&target).unwrap(),
            PathBuf::from("/work/app.mem")
        );
        assert_eq!(target.alias(), None);
    }
}
