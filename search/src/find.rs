//! The `find` query over a stored project index.

use recall_protocol::SearchCorpus;
use serde::{Deserialize, Serialize};

use crate::bm25::{Bm25Index, Bm25Params};

/// Default number of ranked files returned.
pub const DEFAULT_TOP_K: usize = 10;

/// Score given to substring matches when no corpus is available.
const SUBSTRING_SCORE: f64 = 1.0;

/// Borrowed view of the searchable parts of a stored index.
#[derive(Debug, Clone, Copy)]
pub struct SearchableIndex<'a> {
    pub corpus: &'a SearchCorpus,
    pub files: &'a [String],
    pub functions: &'a [String],
    pub classes: &'a [String],
}

/// A ranked file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMatch {
    pub path: String,
    pub score: f64,
}

/// Results of one `find` query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindResult {
    /// Files, best first.
    pub files: Vec<FileMatch>,

    /// Function names containing the query, in index order.
    pub functions: Vec<String>,

    /// Class names containing the query, in index order.
    pub classes: Vec<String>,
}

impl FindResult {
    /// Total number of matches across all sections.
    pub fn total(&self) -> usize {
        self.files.len() + self.functions.len() + self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Runs `find` queries.
#[derive(Debug, Clone)]
pub struct Finder {
    params: Bm25Params,
    top_k: usize,
}

impl Finder {
    pub fn new() -> Self {
        Self {
            params: Bm25Params::default(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_params(mut self, params: Bm25Params) -> Self {
        self.params = params;
        self
    }

    /// Set the number of ranked files returned.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Rank files with BM25 over the corpus, or fall back to path substring
    /// matching when the index carries no corpus. Function and class names
    /// always match by case-insensitive substring.
    pub fn find(&self, index: SearchableIndex<'_>, query: &str) -> FindResult {
        let needle = query.to_lowercase();
        let contains = |name: &&String| name.to_lowercase().contains(&needle);

        let files = if index.corpus.is_empty() {
            index
                .files
                .iter()
                .filter(contains)
                .map(|path| FileMatch {
                    path: path.clone(),
                    score: SUBSTRING_SCORE,
                })
                .collect()
        } else {
            let bm25 = Bm25Index::with_params(&index.corpus.documents, self.params);
            let paths = index.corpus.paths_by_position();
            bm25.search(query, self.top_k)
                .into_iter()
                .filter_map(|hit| {
                    paths.get(&hit.index).map(|path| FileMatch {
                        path: (*path).to_string(),
                        score: hit.score,
                    })
                })
                .collect()
        };

        FindResult {
            files,
            functions: index.functions.iter().filter(contains).cloned().collect(),
            classes: index.classes.iter().filter(contains).cloned().collect(),
        }
    }
}

impl Default for Finder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_find_ranks_files_and_matches_names() {
        let mut corpus = SearchCorpus::default();
        corpus.push("src/auth/login.ts", "src/auth/login.ts Authentication login");
        corpus.push("src/pay.ts", "src/pay.ts Code charge");
        let files = strings(&["src/auth/login.ts", "src/pay.ts"]);
        let functions = strings(&["login", "charge", "loginWithToken"]);
        let classes = strings(&["LoginForm"]);

        let result = Finder::new().find(
            SearchableIndex {
                corpus: &corpus,
                files: &files,
                functions: &functions,
                classes: &classes,
            },
            "Login",
        );

        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].path, "src/auth/login.ts");
        assert!(result.files[0].score > 0.0);
        assert_eq!(result.functions, vec!["login", "loginWithToken"]);
        assert_eq!(result.classes, vec!["LoginForm"]);
        assert_eq!(result.total(), 4);
    }

    #[test]
    fn test_find_without_corpus_falls_back_to_paths() {
        let corpus = SearchCorpus::default();
        let files = strings(&["src/Auth.ts", "src/pay.ts"]);

        let result = Finder::new().find(
            SearchableIndex {
                corpus: &corpus,
                files: &files,
                functions: &[],
                classes: &[],
            },
            "auth",
        );

        assert_eq!(
            result.files,
            vec![FileMatch {
                path: "src/Auth.ts".to_string(),
                score: 1.0,
            }]
        );
    }
}
