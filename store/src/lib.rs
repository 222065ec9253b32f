//! # Memory Store
//!
//! Persistence for project memories.
//!
//! A memory is a [`MemoryRecord`] saved as a `.mem` file: a few `#` comment
//! lines followed by the base64 encoding of gzip-compressed JSON. Records
//! saved under an alias live in a central store; every re-pack archives the
//! previous record into that alias's history, which can be read back by
//! date.
//!
//! ## Layout
//!
//! ```text
//! ~/.recall/
//! ├── memories/<alias>.mem
//! ├── history/<alias>/<YYYYMMDD_HHMMSS>.mem
//! ├── queries.json
//! └── current
//! ```

pub mod codec;
pub mod error;
pub mod query_log;
pub mod record;
pub mod snapshot;
pub mod store;

pub use codec::{FORMAT_VERSION, MEM_EXTENSION, decode, encode};
pub use error::{Result, StorageError, StoreError};
pub use query_log::{DEFAULT_QUERY_LOG_CAP, QueryLog, QueryLogEntry, UNKNOWN_PROJECT};
pub use record::{Decision, IndexBundle, MemoryRecord, Session, now};
pub use snapshot::{SnapshotId, SnapshotInfo, parse_date};
pub use store::{MemoryStore, MemorySummary, find_local_memory, load_file, save_file};
