//! Per-file and per-project records produced by an analysis pass.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// File path → raw import targets.
///
/// Targets are kept exactly as extracted; they are never resolved to files,
/// so the graph may contain cycles and dangling edges.
pub type ImportGraph = BTreeMap<String, BTreeSet<String>>;

/// A single scanned source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the project root, slash-separated.
    pub path: String,

    /// Number of lines in the file.
    pub lines: usize,

    /// Up to five function names, in extraction order.
    pub functions: Vec<String>,

    /// Class, type and component names.
    pub classes: Vec<String>,

    /// Inferred purpose label.
    pub purpose: String,
}

/// A file judged structurally significant by the key-file ranker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFile {
    pub path: String,
    pub purpose: String,

    /// Up to three function names.
    pub functions: Vec<String>,
}

/// Aggregate of the files below one top-level directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySummary {
    pub files: usize,
    pub lines: usize,

    /// Display label reduced from the set of purposes seen in the directory.
    pub purpose: String,
}

/// Global counters for an analysis pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    #[serde(default)]
    pub total_files: usize,

    #[serde(default)]
    pub total_lines: usize,

    /// Extension (with leading dot) → file count.
    #[serde(default)]
    pub by_extension: BTreeMap<String, usize>,

    #[serde(default)]
    pub total_functions: usize,

    #[serde(default)]
    pub total_classes: usize,
}

/// Synthetic per-file documents used for ranked search.
///
/// `positions` is injective and covers exactly the files that have a
/// document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCorpus {
    #[serde(default, rename = "search_corpus")]
    pub documents: Vec<String>,

    #[serde(default, rename = "file_to_corpus_idx")]
    pub positions: BTreeMap<String, usize>,
}

impl SearchCorpus {
    /// Append a document for `path`.
    pub fn push(&mut self, path: impl Into<String>, document: impl Into<String>) {
        self.positions.insert(path.into(), self.documents.len());
        self.documents.push(document.into());
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Inverse of `positions`: document position → file path.
    pub fn paths_by_position(&self) -> BTreeMap<usize, &str> {
        self.positions
            .iter()
            .map(|(path, position)| (*position, path.as_str()))
            .collect()
    }
}
