//! Single-pass project analysis.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Instant;

use recall_protocol::{
    DirectorySummary, Entities, FileRecord, ImportGraph, KeyFile, ProjectStats, SearchCorpus,
    Stack,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::config::{FileKind, ScanConfig};
use crate::entity::EntityExtractor;
use crate::error::{Result, ScanError};
use crate::purpose::PurposeClassifier;
use crate::ranking::KeyFileRanker;
use crate::stack::detect_stack;
use crate::structure::{StructureExtractor, Symbol};
use crate::vcs::VersionControl;

/// Function names kept per file record and corpus document.
const FILE_FUNCTIONS: usize = 5;

/// Bucket for files directly under the project root.
const ROOT_BUCKET: &str = "root";

/// Everything one scan learns about a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    /// Scanned files in walk order.
    pub files: Vec<FileRecord>,

    /// Walked directory (relative, or `root`) → number of scanned files.
    pub structure: BTreeMap<String, usize>,

    /// Top-level directory (or `root`) → summary.
    pub directories: BTreeMap<String, DirectorySummary>,

    /// Every function found, untruncated.
    pub functions: Vec<Symbol>,

    /// Every class or component found.
    pub classes: Vec<Symbol>,

    /// Project-wide import targets.
    pub imports: BTreeSet<String>,

    pub import_graph: ImportGraph,

    /// Facts per file, only for files with at least one.
    pub entities: BTreeMap<String, Entities>,

    pub corpus: SearchCorpus,
    pub stack: Stack,
    pub key_files: Vec<KeyFile>,
    pub stats: ProjectStats,

    /// Abbreviated commit identifier, empty outside version control.
    pub last_commit: String,
}

impl ProjectAnalysis {
    /// Number of to-do, note and decision facts across all files.
    pub fn entity_count(&self) -> usize {
        self.entities
            .values()
            .map(|e| e.todos.len() + e.notes.len() + e.decisions.len())
            .sum()
    }
}

/// Per top-level directory accumulator.
#[derive(Default)]
struct DirectoryTally {
    files: usize,
    lines: usize,
    /// Distinct purposes in first-seen order.
    purposes: Vec<String>,
}

/// Walks a project tree and extracts structure, facts and rankings.
pub struct ProjectAnalyzer {
    config: ScanConfig,
    structure: StructureExtractor,
    entities: EntityExtractor,
    purposes: PurposeClassifier,
    ranker: KeyFileRanker,
}

impl ProjectAnalyzer {
    /// Create an analyzer for the tree described by `config`.
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            structure: StructureExtractor::new(),
            entities: EntityExtractor::new(),
            purposes: PurposeClassifier::new(),
            ranker: KeyFileRanker::new(),
        }
    }

    /// Set how many key files are kept.
    pub fn with_key_file_limit(mut self, limit: usize) -> Self {
        self.ranker = self.ranker.with_limit(limit);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan the whole tree.
    ///
    /// Files that cannot be read are skipped. Only a missing root fails.
    pub fn analyze(&self, vcs: &impl VersionControl) -> Result<ProjectAnalysis> {
        let root = &self.config.root;
        if !root.exists() {
            return Err(ScanError::RootNotFound(root.clone()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.clone()));
        }

        let start = Instant::now();
        let mut analysis = ProjectAnalysis::default();
        let mut tallies: BTreeMap<String, DirectoryTally> = BTreeMap::new();
        let mut skipped = 0usize;

        // Files before subdirectories, both by name, so output is stable.
        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .sort_by(|a, b| {
                (a.file_type().is_dir(), a.file_name()).cmp(&(b.file_type().is_dir(), b.file_name()))
            })
            .into_iter()
            .filter_entry(|entry| !self.is_pruned(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {e}");
                    skipped += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let Some(ext) = self.config.recognized_extension(entry.path()) else {
                continue;
            };

            let content = match std::fs::read(entry.path()) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    debug!("Skipping {}: {e}", entry.path().display());
                    skipped += 1;
                    continue;
                }
            };

            let Some(rel_path) = relative_path(root, entry.path()) else {
                continue;
            };
            self.add_file(&mut analysis, &mut tallies, rel_path, &ext, &content);
        }

        analysis.stats.total_files = analysis.files.len();
        analysis.stats.total_functions = analysis.functions.len();
        analysis.stats.total_classes = analysis.classes.len();

        analysis.stack = detect_stack(
            &analysis.imports,
            &analysis.stats.by_extension,
            &analysis.files,
        );
        analysis.key_files = self.ranker.rank(&analysis.files);
        analysis.directories = tallies
            .into_iter()
            .map(|(name, tally)| {
                let summary = DirectorySummary {
                    files: tally.files,
                    lines: tally.lines,
                    purpose: summarize_purposes(&tally.purposes),
                };
                (name, summary)
            })
            .collect();
        analysis.last_commit = vcs.current_commit(root);

        info!(
            "Analyzed {} files ({} lines) in {:?}, skipped {}",
            analysis.stats.total_files,
            analysis.stats.total_lines,
            start.elapsed(),
            skipped
        );

        Ok(analysis)
    }

    fn is_pruned(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .config
                .should_skip_dir(&entry.file_name().to_string_lossy())
    }

    fn add_file(
        &self,
        analysis: &mut ProjectAnalysis,
        tallies: &mut BTreeMap<String, DirectoryTally>,
        rel_path: String,
        ext: &str,
        content: &str,
    ) {
        let kind = FileKind::from_extension(ext);
        let lines = content.lines().count();

        let structure = self.structure.extract(content, kind);
        let entities = self.entities.extract(content, kind);
        let purpose = self.purposes.classify(&rel_path, &structure.classes);

        let functions: Vec<String> = structure
            .function_names()
            .take(FILE_FUNCTIONS)
            .map(str::to_string)
            .collect();
        let classes: Vec<String> = structure.class_names().map(str::to_string).collect();

        let document = std::iter::once(rel_path.as_str())
            .chain(std::iter::once(purpose))
            .chain(functions.iter().map(String::as_str))
            .chain(classes.iter().map(String::as_str))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        analysis.corpus.push(rel_path.clone(), document);

        if !structure.imports.is_empty() {
            analysis
                .import_graph
                .entry(rel_path.clone())
                .or_default()
                .extend(structure.imports.iter().cloned());
        }
        analysis.imports.extend(structure.imports);

        if !entities.is_empty() {
            analysis.entities.insert(rel_path.clone(), entities);
        }

        let (walked_dir, top_dir) = match rel_path.rsplit_once('/') {
            Some((parent, _)) => (
                parent.to_string(),
                parent.split('/').next().unwrap_or(parent).to_string(),
            ),
            None => (ROOT_BUCKET.to_string(), ROOT_BUCKET.to_string()),
        };
        *analysis.structure.entry(walked_dir).or_default() += 1;

        let tally = tallies.entry(top_dir).or_default();
        tally.files += 1;
        tally.lines += lines;
        if !tally.purposes.iter().any(|p| p == purpose) {
            tally.purposes.push(purpose.to_string());
        }

        analysis.stats.total_lines += lines;
        *analysis
            .stats
            .by_extension
            .entry(ext.to_string())
            .or_default() += 1;

        analysis.functions.extend(structure.functions);
        analysis.classes.extend(structure.classes);
        analysis.files.push(FileRecord {
            path: rel_path,
            lines,
            functions,
            classes,
            purpose: purpose.to_string(),
        });
    }
}

/// Reduce the distinct purposes of a directory to one display label.
pub fn summarize_purposes(purposes: &[String]) -> String {
    let has = |label: &str| purposes.iter().any(|p| p == label);

    if let [only] = purposes {
        only.clone()
    } else if has("API endpoint") {
        "API endpoints".to_string()
    } else if has("UI component") || has("Component") {
        "UI components".to_string()
    } else if has("Page/Route") {
        "Pages/Routes".to_string()
    } else {
        purposes
            .iter()
            .take(2)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// `path` relative to `root`, slash-separated.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_summarize_purposes() {
        assert_eq!(summarize_purposes(&labels(&["Styles"])), "Styles");
        assert_eq!(
            summarize_purposes(&labels(&["Code", "API endpoint", "Page/Route"])),
            "API endpoints"
        );
        assert_eq!(
            summarize_purposes(&labels(&["Page/Route", "Component"])),
            "UI components"
        );
        assert_eq!(
            summarize_purposes(&labels(&["Code", "Page/Route"])),
            "Pages/Routes"
        );
        assert_eq!(
            summarize_purposes(&labels(&["Code", "Tests", "Styles"])),
            "Code, Tests"
        );
    }

    #[test]
    fn test_relative_path_is_slash_separated() {
        let root = Path::new("/project");
        assert_eq!(
            relative_path(root, &root.join("src").join("api").join("users.ts")),
            Some("src/api/users.ts".to_string())
        );
        assert_eq!(relative_path(root, Path::new("/elsewhere/x.py")), None);
    }
}
