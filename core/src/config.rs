//! Configuration for Recall.

use std::path::PathBuf;

use recall_search::Bm25Params;
use recall_store::{DEFAULT_QUERY_LOG_CAP, MemoryStore};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the store location.
pub const HOME_ENV: &str = "RECALL_HOME";

/// Configuration for a [`crate::Recall`] instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallConfig {
    /// Root of the central store.
    pub home: PathBuf,

    /// Ranked files returned by `find`.
    pub top_k: usize,

    /// BM25 tuning.
    pub bm25: Bm25Params,

    /// Key files kept per memory.
    pub key_file_limit: usize,

    /// Entries kept in the query log.
    pub query_log_cap: usize,
}

impl RecallConfig {
    /// Create a configuration with the store at `home`.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            top_k: recall_search::find::DEFAULT_TOP_K,
            bm25: Bm25Params::default(),
            key_file_limit: recall_scanner::ranking::DEFAULT_KEY_FILE_LIMIT,
            query_log_cap: DEFAULT_QUERY_LOG_CAP,
        }
    }

    /// Store location: `explicit` if given, else `$RECALL_HOME`, else
    /// `~/.recall`, else `.recall` in the working directory.
    pub fn resolve_home(explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| std::env::var_os(HOME_ENV).map(PathBuf::from))
            .or_else(MemoryStore::default_location)
            .unwrap_or_else(|| PathBuf::from(".recall"))
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_bm25(mut self, params: Bm25Params) -> Self {
        self.bm25 = params;
        self
    }

    pub fn with_key_file_limit(mut self, limit: usize) -> Self {
        self.key_file_limit = limit;
        self
    }

    pub fn with_query_log_cap(mut self, cap: usize) -> Self {
        self.query_log_cap = cap;
        self
    }
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self::new(Self::resolve_home(None))
    }
}
