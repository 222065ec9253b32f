//! The persisted memory of one project.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime, TimeDelta};
use recall_protocol::{
    DirectorySummary, Entities, ImportGraph, KeyFile, ProjectStats, SearchCorpus, Stack,
};
use serde::{Deserialize, Serialize};

use crate::codec::FORMAT_VERSION;

/// Current local time, without an offset.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// A structural digest of a project plus the annotations its users added.
///
/// `decisions` and `sessions` are append-only: re-packing carries them
/// forward untouched, along with `description` and `created`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Payload format revision.
    pub version: String,

    /// Project name (the directory name).
    pub project: String,

    /// Absolute path the project was packed from.
    pub path: PathBuf,

    pub created: NaiveDateTime,

    /// Refreshed on every save.
    pub updated: NaiveDateTime,

    /// Free text set by the user.
    #[serde(default)]
    pub description: String,

    /// One-line digest generated at pack time.
    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub stack: Stack,

    /// Walked directory → scanned file count.
    #[serde(default)]
    pub structure: BTreeMap<String, usize>,

    #[serde(default)]
    pub directories: BTreeMap<String, DirectorySummary>,

    #[serde(default)]
    pub key_files: Vec<KeyFile>,

    #[serde(default)]
    pub stats: ProjectStats,

    /// Extracted facts by file path.
    #[serde(default)]
    pub entities: BTreeMap<String, Entities>,

    #[serde(default)]
    pub decisions: Vec<Decision>,

    #[serde(default)]
    pub sessions: Vec<Session>,

    #[serde(default)]
    pub index: IndexBundle,

    /// Commit the project was at when packed; empty if unknown.
    #[serde(default)]
    pub last_commit: String,
}

impl MemoryRecord {
    /// Create an empty record stamped with the current time.
    pub fn new(project: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let now = now();
        Self {
            version: FORMAT_VERSION.to_string(),
            project: project.into(),
            path: path.into(),
            created: now,
            updated: now,
            description: String::new(),
            summary: String::new(),
            stack: Stack::default(),
            structure: BTreeMap::new(),
            directories: BTreeMap::new(),
            key_files: Vec::new(),
            stats: ProjectStats::default(),
            entities: BTreeMap::new(),
            decisions: Vec::new(),
            sessions: Vec::new(),
            index: IndexBundle::default(),
            last_commit: String::new(),
        }
    }

    /// Refresh `updated`. The new value is always later than the old one,
    /// even when the clock has not moved.
    pub fn touch(&mut self) {
        let now = now();
        self.updated = if now > self.updated {
            now
        } else {
            self.updated + TimeDelta::microseconds(1)
        };
    }

    /// Append a decision note dated now.
    pub fn add_decision(&mut self, note: impl Into<String>) {
        self.decisions.push(Decision {
            date: now(),
            note: note.into(),
        });
    }

    /// Append a work-session topic dated now.
    pub fn add_session(&mut self, topic: impl Into<String>) {
        self.sessions.push(Session {
            date: now(),
            topic: topic.into(),
        });
    }
}

/// A dated decision note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub date: NaiveDateTime,
    pub note: String,
}

/// A dated work-session topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub date: NaiveDateTime,
    pub topic: String,
}

/// Lookup tables used by queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexBundle {
    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default)]
    pub functions: Vec<String>,

    #[serde(default)]
    pub classes: Vec<String>,

    #[serde(default, rename = "imports")]
    pub import_graph: ImportGraph,

    #[serde(flatten)]
    pub corpus: SearchCorpus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_touch_is_strictly_increasing() {
        let mut record = MemoryRecord::new("demo", "/tmp/demo");
        let before = record.updated;

        record.touch();
        let first = record.updated;
        record.touch();

        assert!(first > before);
        assert!(record.updated > first);
        assert_eq!(record.created, before);
    }

    #[test]
    fn test_annotations_append() {
        let mut record = MemoryRecord::new("demo", "/tmp/demo");
        record.add_decision("use BM25");
        record.add_session("search tuning");
        record.add_decision("keep history");

        let notes: Vec<&str> = record.decisions.iter().map(|d| d.note.as_str()).collect();
        assert_eq!(notes, vec!["use BM25", "keep history"]);
        assert_eq!(record.sessions[0].topic, "search tuning");
    }

    #[test]
    fn test_index_bundle_field_names() {
        let mut index = IndexBundle::default();
        index.files.push("main.py".to_string());
        index
            .import_graph
            .entry("main.py".to_string())
            .or_default()
            .insert("os".to_string());
        index.corpus.push("main.py", "main.py Code");

        let value = serde_json::to_value(&index).unwrap();
        assert_eq!(value["imports"]["main.py"][0], "os");
        assert_eq!(value["search_corpus"][0], "main.py Code");
        assert_eq!(value["file_to_corpus_idx"]["main.py"], 0);
    }

    #[test]
    fn test_loads_minimal_payload() {
        let json = r#"{
            "version": "2.5",
            "project": "demo",
            "path": "/work/demo",
            "created": "2024-03-01T14:05:09.123456",
            "updated": "2024-03-02T08:00:00",
            "index": {}
        }"#;

        let record: MemoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.project, "demo");
        assert!(record.decisions.is_empty());
        assert!(record.index.corpus.is_empty());
        assert_eq!(record.updated.to_string(), "2024-03-02 08:00:00");
    }
}
