//! # Project Scanner
//!
//! Turns a directory tree into structured facts about a source project.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Project Analyzer                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ScanConfig ──► walk ──► StructureExtractor ──► PurposeClassifier│
//! │                   │              │                               │
//! │                   ▼              ▼                               │
//! │           EntityExtractor   SearchCorpus                         │
//! │                                                                  │
//! │  after the walk: detect_stack, KeyFileRanker, summarize_purposes │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Python files are parsed with tree-sitter. JavaScript and TypeScript use
//! best-effort regular expressions, so their recall and precision are
//! limited; every other recognized file type yields no structure.

pub mod analyzer;
pub mod config;
pub mod entity;
pub mod error;
pub mod purpose;
pub mod ranking;
pub mod stack;
pub mod structure;
pub mod vcs;

pub use analyzer::{ProjectAnalysis, ProjectAnalyzer, summarize_purposes};
pub use config::{CODE_EXTENSIONS, FileKind, SKIP_DIRS, ScanConfig};
pub use entity::EntityExtractor;
pub use error::{Result, ScanError};
pub use purpose::PurposeClassifier;
pub use ranking::KeyFileRanker;
pub use stack::detect_stack;
pub use structure::{CodeStructure, StructureExtractor, Symbol};
pub use vcs::{ChangeKind, FileChange, GitCli, NoVersionControl, VersionControl};
