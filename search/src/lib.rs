//! # Corpus Search
//!
//! Okapi BM25 ranking over the synthetic per-file documents produced by a
//! project scan, plus the `find` query that combines ranked files with
//! substring matches on function and class names.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use recall_search::Bm25Index;
//!
//! let index = Bm25Index::new(&corpus.documents);
//! for hit in index.search("auth", 10) {
//!     println!("{} {:.2}", hit.index, hit.score);
//! }
//! ```

pub mod bm25;
pub mod find;

pub use bm25::{Bm25Index, Bm25Params, SearchHit, tokenize};
pub use find::{FileMatch, FindResult, Finder, SearchableIndex};
