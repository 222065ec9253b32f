//! Packing a project into a memory record.

use std::path::{Path, PathBuf};

use recall_protocol::{ProjectStats, Stack};
use recall_scanner::{ProjectAnalysis, ProjectAnalyzer, ScanConfig, VersionControl};
use recall_store::{IndexBundle, MEM_EXTENSION, MemoryRecord, SnapshotId, load_file, save_file};
use tracing::{info, warn};

use crate::engine::{Recall, project_root};
use crate::error::{RecallError, Result};

/// Arguments shared by a first pack and a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackParams {
    /// Project directory to scan.
    pub path: PathBuf,

    /// Store the record under this alias and keep its history.
    pub alias: Option<String>,

    /// Write the record here instead of the default location.
    pub output: Option<PathBuf>,
}

impl PackParams {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            alias: None,
            output: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }
}

/// Result of a pack.
#[derive(Debug, Clone)]
pub struct PackOutcome {
    /// The record as written.
    pub record: MemoryRecord,

    pub output_path: PathBuf,

    /// Snapshot taken of the previous record, if any.
    pub snapshot_id: Option<SnapshotId>,

    /// TODO, NOTE and DECISION markers found.
    pub entity_count: usize,
}

impl<V: VersionControl> Recall<V> {
    /// Scan a project and write its memory.
    ///
    /// When an alias is given and a record already exists for it, that
    /// record is archived first; a failed archive aborts the pack. The
    /// description, decisions, sessions and creation time of an existing
    /// record are carried over.
    pub fn pack(&self, params: &PackParams) -> Result<PackOutcome> {
        let root = project_root(&params.path)?;
        let name = project_name(&root);
        let output_path = match (&params.output, &params.alias) {
            (Some(output), _) => output.clone(),
            (None, Some(alias)) => self.store.memory_path(alias)?,
            (None, None) => root.join(format!("{name}{MEM_EXTENSION}")),
        };

        info!("Packing {name} from {}", root.display());
        let analysis = ProjectAnalyzer::new(ScanConfig::new(&root))
            .with_key_file_limit(self.config.key_file_limit)
            .analyze(&self.vcs)?;

        let previous = if output_path.exists() {
            match load_file(&output_path) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Ignoring unreadable memory {}: {e}", output_path.display());
                    None
                }
            }
        } else {
            None
        };

        let snapshot_id = match (&params.alias, &previous) {
            (Some(alias), Some(record)) => Some(self.store.snapshot(alias, record)?),
            _ => None,
        };

        let entity_count = analysis.entity_count();
        let mut record = build_record(&name, &root, analysis);
        if let Some(previous) = previous {
            record.description = previous.description;
            record.decisions = previous.decisions;
            record.sessions = previous.sessions;
            record.created = previous.created;
            record.updated = previous.updated;
        }

        save_file(&output_path, &mut record)?;
        info!(
            "Packed {name}: {} files, {} lines",
            record.stats.total_files, record.stats.total_lines
        );

        Ok(PackOutcome {
            record,
            output_path,
            snapshot_id,
            entity_count,
        })
    }

    /// Re-pack the project recorded under `alias`.
    pub fn update(&self, alias: &str) -> Result<PackOutcome> {
        let record = self.store.load(alias)?;
        if !record.path.exists() {
            return Err(RecallError::ProjectPathMissing(record.path));
        }
        self.pack(&PackParams::new(record.path).with_alias(alias))
    }
}

/// One-line digest of a project:
/// `name: | Stack: k: v, ... | N files, L lines | F functions, C components`.
pub fn build_summary(name: &str, stack: &Stack, stats: &ProjectStats) -> String {
    let mut parts = vec![format!("{name}:")];
    if !stack.is_empty() {
        let entries: Vec<String> = stack
            .entries()
            .into_iter()
            .map(|(category, value)| format!("{category}: {value}"))
            .collect();
        parts.push(format!("Stack: {}", entries.join(", ")));
    }
    parts.push(format!(
        "{} files, {} lines",
        stats.total_files,
        group_thousands(stats.total_lines)
    ));
    parts.push(format!(
        "{} functions, {} components",
        stats.total_functions, stats.total_classes
    ));
    parts.join(" | ")
}

fn build_record(name: &str, root: &Path, analysis: ProjectAnalysis) -> MemoryRecord {
    let mut record = MemoryRecord::new(name, root);
    record.summary = build_summary(name, &analysis.stack, &analysis.stats);
    record.index = IndexBundle {
        files: analysis.files.iter().map(|f| f.path.clone()).collect(),
        functions: analysis.functions.into_iter().map(|s| s.name).collect(),
        classes: analysis.classes.into_iter().map(|s| s.name).collect(),
        import_graph: analysis.import_graph,
        corpus: analysis.corpus,
    };
    record.stack = analysis.stack;
    record.structure = analysis.structure;
    record.directories = analysis.directories;
    record.key_files = analysis.key_files;
    record.stats = analysis.stats;
    record.entities = analysis.entities;
    record.last_commit = analysis.last_commit;
    record
}

fn project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_summary_with_stack() {
        let stack = Stack {
            frontend: Some("React".to_string()),
            language: Some("TypeScript".to_string()),
            ..Default::default()
        };
        let stats = ProjectStats {
            total_files: 12,
            total_lines: 4321,
            total_functions: 30,
            total_classes: 4,
            ..Default::default()
        };

        assert_eq!(
            build_summary("shop", &stack, &stats),
            "shop: | Stack: frontend: React, language: TypeScript | 12 files, 4,321 lines | 30 functions, 4 components"
        );
    }

    #[test]
    fn test_summary_without_stack() {
        let stats = ProjectStats {
            total_files: 1,
            total_lines: 3,
            ..Default::default()
        };
        assert_eq!(
            build_summary("tiny", &Stack::default(), &stats),
            "tiny: | 1 files, 3 lines | 0 functions, 0 components"
        );
    }
}
