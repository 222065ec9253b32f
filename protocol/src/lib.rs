//! Plain data types shared between the scanner and the memory store.
//!
//! Everything here is produced once per analysis pass and treated as
//! immutable afterwards. The types carry only small helpers; the behavior
//! that produces them lives in `recall-scanner`.

mod entities;
mod records;
mod stack;

pub use entities::{Entities, EntityCategory};
pub use records::{
    DirectorySummary, FileRecord, ImportGraph, KeyFile, ProjectStats, SearchCorpus,
};
pub use stack::Stack;
