//! Key-file ranking.

use std::cmp::Reverse;

use recall_protocol::{FileRecord, KeyFile};

/// Path-substring weights. Only the first matching entry counts.
const PATH_WEIGHTS: &[(&str, u32)] = &[
    ("pages/api/", 10),
    ("/api/", 8),
    ("lib/", 7),
    ("src/lib/", 7),
    ("hooks/", 6),
    ("context/", 6),
    ("store/", 6),
    ("pages/", 5),
    ("app/", 5),
    ("routes/", 5),
    ("utils/", 4),
    ("helpers/", 4),
    ("services/", 5),
    ("components/", 3),
    ("styles/", 1),
    ("types/", 2),
    ("test", 0),
    ("spec", 0),
    ("__test", 0),
];

/// Default number of key files kept.
pub const DEFAULT_KEY_FILE_LIMIT: usize = 20;

/// Function names carried on each key file.
const KEY_FILE_FUNCTIONS: usize = 3;

/// Picks the structurally significant files of a project.
#[derive(Debug, Clone)]
pub struct KeyFileRanker {
    limit: usize,
}

impl KeyFileRanker {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_KEY_FILE_LIMIT,
        }
    }

    /// Set the number of files returned.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Rank `files`, highest score first.
    ///
    /// Files scoring zero are dropped. Ties keep scan order. Scores are not
    /// part of the output.
    pub fn rank(&self, files: &[FileRecord]) -> Vec<KeyFile> {
        let mut scored: Vec<(u32, &FileRecord)> = files
            .iter()
            .map(|file| (score(file), file))
            .filter(|(score, _)| *score > 0)
            .collect();

        scored.sort_by_key(|(score, _)| Reverse(*score));

        scored
            .into_iter()
            .take(self.limit)
            .map(|(_, file)| KeyFile {
                path: file.path.clone(),
                purpose: file.purpose.clone(),
                functions: file
                    .functions
                    .iter()
                    .take(KEY_FILE_FUNCTIONS)
                    .cloned()
                    .collect(),
            })
            .collect()
    }
}

impl Default for KeyFileRanker {
    fn default() -> Self {
        Self::new()
    }
}

fn score(file: &FileRecord) -> u32 {
    let path = file.path.to_lowercase();

    let mut score = PATH_WEIGHTS
        .iter()
        .find(|(pattern, _)| path.contains(pattern))
        .map_or(0, |(_, weight)| *weight);

    if path.contains("index") || path.contains("main") {
        score += 2;
    }
    if path.contains("app") {
        score += 2;
    }
    if file.functions.len() > 3 {
        score += 1;
    }
    if file.lines > 100 {
        score += 1;
    }
    if file.lines > 300 {
        score += 1;
    }

    // Test files never rank, whatever else they match.
    if path.contains("test") || path.contains("spec") {
        return 0;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file(path: &str, lines: usize, functions: &[&str]) -> FileRecord {
        FileRecord {
            path: path.to_string(),
            lines,
            functions: functions.iter().map(|f| (*f).to_string()).collect(),
            classes: Vec::new(),
            purpose: "Code".to_string(),
        }
    }

    fn paths(key_files: &[KeyFile]) -> Vec<&str> {
        key_files.iter().map(|k| k.path.as_str()).collect()
    }

    #[test]
    fn test_score_components() {
        assert_eq!(score(&file("pages/api/users.ts", 10, &[])), 10);
        // "src/lib/" never wins: "lib/" comes first with the same weight.
        assert_eq!(score(&file("src/lib/db.ts", 10, &[])), 7);
        assert_eq!(score(&file("src/main.py", 350, &["a", "b", "c", "d"])), 5);
        assert_eq!(score(&file("app/index.tsx", 10, &[])), 9);
        assert_eq!(score(&file("README.md", 10, &[])), 0);
    }

    #[test]
    fn test_test_files_are_excluded() {
        let files = vec![
            file("src/lib/auth.test.ts", 500, &["a", "b", "c", "d"]),
            file("pages/api/spec_helpers.ts", 10, &[]),
            file("src/lib/auth.ts", 10, &[]),
        ];

        let ranked = KeyFileRanker::new().rank(&files);
        assert_eq!(paths(&ranked), vec!["src/lib/auth.ts"]);
    }

    #[test]
    fn test_ties_keep_scan_order_and_limit_applies() {
        let files = vec![
            file("utils/b.ts", 10, &[]),
            file("utils/a.ts", 10, &[]),
            file("pages/api/x.ts", 10, &["one", "two", "three", "four"]),
            file("notes.md", 10, &[]),
        ];

        let ranked = KeyFileRanker::new().with_limit(2).rank(&files);
        assert_eq!(paths(&ranked), vec!["pages/api/x.ts", "utils/b.ts"]);
        assert_eq!(ranked[0].functions, vec!["one", "two", "three"]);
    }
}
