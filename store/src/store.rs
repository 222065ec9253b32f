//! On-disk storage of live records and their history.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use chrono::NaiveDate;
use recall_protocol::ProjectStats;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::codec::{MEM_EXTENSION, decode, encode};
use crate::error::{Result, StorageError, StoreError};
use crate::record::{MemoryRecord, now};
use crate::snapshot::{SnapshotId, SnapshotInfo};

const MEMORIES_DIR: &str = "memories";
const HISTORY_DIR: &str = "history";
const QUERIES_FILE: &str = "queries.json";
const CURRENT_FILE: &str = "current";

/// Largest collision suffix tried for one second.
const MAX_SNAPSHOT_SUFFIX: u32 = 99;

/// Project name shown for records that fail to load.
const LOAD_ERROR_PROJECT: &str = "Error loading";

/// Listing entry for one stored alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySummary {
    pub alias: String,
    pub project: String,
    pub path: String,

    /// Day of the last save; `None` when the record failed to load.
    pub updated: Option<NaiveDate>,
    pub stats: ProjectStats,
    pub description: String,

    /// Number of archived snapshots.
    pub snapshots: usize,
}

/// Central store of memories keyed by alias.
///
/// Live records are the only mutable files. Snapshots are written once and
/// never replaced.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    root: PathBuf,
}

impl MemoryStore {
    /// Open a store rooted at `root`. Directories are created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `~/.recall`, if a home directory is known.
    pub fn default_location() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".recall"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the live record for `alias`.
    pub fn memory_path(&self, alias: &str) -> Result<PathBuf> {
        validate_alias(alias)?;
        Ok(self
            .root
            .join(MEMORIES_DIR)
            .join(format!("{alias}{MEM_EXTENSION}")))
    }

    /// Directory holding the snapshots of `alias`.
    pub fn history_dir(&self, alias: &str) -> Result<PathBuf> {
        validate_alias(alias)?;
        Ok(self.root.join(HISTORY_DIR).join(alias))
    }

    pub fn queries_path(&self) -> PathBuf {
        self.root.join(QUERIES_FILE)
    }

    /// File naming the active project.
    pub fn current_path(&self) -> PathBuf {
        self.root.join(CURRENT_FILE)
    }

    /// Whether a live record exists for `alias`.
    pub fn contains(&self, alias: &str) -> bool {
        self.memory_path(alias).is_ok_and(|path| path.is_file())
    }

    /// Load the live record for `alias`.
    pub fn load(&self, alias: &str) -> Result<MemoryRecord> {
        load_file(&self.memory_path(alias)?)
    }

    /// Stamp `record` and write it as the live record for `alias`.
    pub fn save(&self, alias: &str, record: &mut MemoryRecord) -> Result<PathBuf> {
        let path = self.memory_path(alias)?;
        save_file(&path, record)?;
        Ok(path)
    }

    /// Archive `record` as a new snapshot of `alias`.
    ///
    /// The record is written exactly as given and never over an existing
    /// file. The new identifier always sorts after every existing one: a
    /// `_NN` suffix is appended when the current second is taken, and the
    /// newest identifier is suffixed instead when the clock reads earlier
    /// than it.
    pub fn snapshot(&self, alias: &str, record: &MemoryRecord) -> Result<SnapshotId> {
        let dir = self.history_dir(alias)?;
        create_dir(&dir)?;

        let latest = self.list_history(alias)?.into_iter().next();
        let stamp = SnapshotId::at(now());
        let mut candidates: Vec<SnapshotId> = std::iter::once(stamp.clone())
            .chain((1..=MAX_SNAPSHOT_SUFFIX).map(|n| stamp.with_suffix(n)))
            .collect();
        if let Some(latest) = &latest {
            candidates.retain(|id| id > latest);
            if candidates.is_empty() {
                warn!("Clock is behind snapshot {alias}/{latest}");
                candidates = (1..=MAX_SNAPSHOT_SUFFIX)
                    .map(|n| latest.with_suffix(n))
                    .collect();
            }
        }

        for id in candidates {
            if write_new_file(&snapshot_path(&dir, &id), record)? {
                info!("Saved snapshot {id} for {alias}");
                return Ok(id);
            }
        }

        Err(StoreError::SnapshotCollision(format!("{alias}/{stamp}")))
    }

    /// Snapshot identifiers for `alias`, newest first.
    pub fn list_history(&self, alias: &str) -> Result<Vec<SnapshotId>> {
        let dir = self.history_dir(alias)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut ids: Vec<SnapshotId> = mem_files(&dir)?
            .iter()
            .filter_map(|path| path.file_stem())
            .map(|stem| SnapshotId::from_stem(stem.to_string_lossy()))
            .collect();
        ids.sort();
        ids.reverse();
        Ok(ids)
    }

    /// Snapshot details for `alias`, newest first. Unreadable snapshots are
    /// left out.
    pub fn history(&self, alias: &str) -> Result<Vec<SnapshotInfo>> {
        let infos = self
            .list_history(alias)?
            .into_iter()
            .filter_map(|id| match self.load_snapshot(alias, &id) {
                Ok(record) => Some(SnapshotInfo {
                    id,
                    date: record.updated.date(),
                    commit: record.last_commit,
                    files: record.stats.total_files,
                }),
                Err(e) => {
                    warn!("Skipping snapshot {alias}/{id}: {e}");
                    None
                }
            })
            .collect();
        Ok(infos)
    }

    /// Load one snapshot of `alias`.
    pub fn load_snapshot(&self, alias: &str, id: &SnapshotId) -> Result<MemoryRecord> {
        load_file(&snapshot_path(&self.history_dir(alias)?, id))
    }

    /// The most recent snapshot of `alias` taken on or before `date`.
    pub fn resolve_at(&self, alias: &str, date: NaiveDate) -> Result<Option<SnapshotId>> {
        Ok(self
            .list_history(alias)?
            .into_iter()
            .find(|id| id.is_on_or_before(date)))
    }

    /// Summaries of every stored alias, ordered by alias.
    pub fn list_memories(&self) -> Result<Vec<MemorySummary>> {
        let dir = self.root.join(MEMORIES_DIR);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        for path in mem_files(&dir)? {
            let Some(alias) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let snapshots = self.list_history(&alias).map_or(0, |ids| ids.len());

            let summary = match load_file(&path) {
                Ok(record) => MemorySummary {
                    alias,
                    project: record.project,
                    path: record.path.display().to_string(),
                    updated: Some(record.updated.date()),
                    stats: record.stats,
                    description: record.description,
                    snapshots,
                },
                Err(e) => {
                    warn!("Failed to load memory {}: {e}", path.display());
                    MemorySummary {
                        alias,
                        project: LOAD_ERROR_PROJECT.to_string(),
                        path: String::new(),
                        updated: None,
                        stats: ProjectStats::default(),
                        description: String::new(),
                        snapshots: 0,
                    }
                }
            };
            summaries.push(summary);
        }

        Ok(summaries)
    }
}

/// Stamp `record` and write it to `path`.
pub fn save_file(path: &Path, record: &mut MemoryRecord) -> Result<()> {
    record.touch();
    write_file(path, record)
}

/// Read a `.mem` file.
///
/// A missing file is [`StoreError::NotFound`]; a damaged one is
/// [`StoreError::Corrupt`].
pub fn load_file(path: &Path) -> Result<MemoryRecord> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(path.display().to_string()));
        }
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            return Err(StoreError::Corrupt(format!("{}: {e}", path.display())));
        }
        Err(e) => {
            return Err(StorageError::ReadFile(format!("{}: {e}", path.display())).into());
        }
    };

    let record = decode(&text)?;
    debug!("Loaded memory file: {}", path.display());
    Ok(record)
}

/// Find the first `.mem` file in `start` or one of its ancestors, stopping
/// below the filesystem root.
pub fn find_local_memory(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .filter(|dir| dir.parent().is_some())
        .find_map(|dir| mem_files(dir).ok()?.into_iter().next())
}

/// Write `record` to `path` through a temporary file and a rename.
fn write_file(path: &Path, record: &MemoryRecord) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    let content = encode(record)?;

    let temp_path = path.with_extension("mem.tmp");
    fs::write(&temp_path, &content)
        .map_err(|e| StorageError::WriteFile(format!("{}: {e}", temp_path.display())))?;

    fs::rename(&temp_path, path)
        .map_err(|e| StorageError::WriteFile(format!("{}: {e}", path.display())))?;

    debug!("Saved memory file: {}", path.display());
    Ok(())
}

/// Write `record` to `path` unless something is already there. Returns
/// `false` if `path` exists.
fn write_new_file(path: &Path, record: &MemoryRecord) -> Result<bool> {
    let content = encode(record)?;
    let dir = path.parent().unwrap_or(Path::new("."));
    let write_error = |e: std::io::Error| StorageError::WriteFile(format!("{}: {e}", path.display()));

    let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
    temp.write_all(content.as_bytes()).map_err(write_error)?;
    match temp.persist_noclobber(path) {
        Ok(_) => {
            debug!("Saved memory file: {}", path.display());
            Ok(true)
        }
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(write_error(e.error).into()),
    }
}

/// An alias names one file and one directory inside the store.
fn validate_alias(alias: &str) -> Result<()> {
    let mut components = Path::new(alias).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if single && !alias.contains(['/', '\\']) {
        Ok(())
    } else {
        Err(StoreError::InvalidAlias(alias.to_string()))
    }
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .map_err(|e| StorageError::CreateDirectory(format!("{}: {e}", dir.display())).into())
}

fn snapshot_path(dir: &Path, id: &SnapshotId) -> PathBuf {
    dir.join(format!("{id}{MEM_EXTENSION}"))
}

/// `.mem` files directly inside `dir`, sorted by name.
fn mem_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| StorageError::ReadFile(format!("{}: {e}", dir.display())))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy().ends_with(MEM_EXTENSION))
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn store() -> (TempDir, MemoryStore) {
        let dir = TempDir::new().unwrap();
        let store = MemoryStore::new(dir.path().join(".recall"));
        (dir, store)
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, store) = store();
        let mut record = MemoryRecord::new("demo", "/work/demo");
        let before = record.updated;

        let path = store.save("demo", &mut record).unwrap();
        assert_eq!(path, store.memory_path("demo").unwrap());
        assert!(record.updated > before);

        let loaded = store.load("demo").unwrap();
        assert_eq!(loaded, record);
        assert!(!path.with_extension("mem.tmp").exists());
    }

    #[test]
    fn test_missing_and_corrupt_are_distinct() {
        let (_dir, store) = store();
        assert!(matches!(store.load("nope"), Err(StoreError::NotFound(_))));

        let path = store.memory_path("broken").unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "# Recall Memory File v2.5\nnot base64 at all!").unwrap();
        assert!(matches!(store.load("broken"), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_snapshots_in_the_same_second_get_suffixes() {
        let (_dir, store) = store();
        let record = MemoryRecord::new("demo", "/work/demo");

        let ids: Vec<SnapshotId> = (0..3)
            .map(|_| store.snapshot("demo", &record).unwrap())
            .collect();

        let listed = store.list_history("demo").unwrap();
        assert_eq!(listed.len(), 3);
        assert!(listed.windows(2).all(|w| w[0] > w[1]));
        for id in &ids {
            assert!(listed.contains(id));
        }
        // Snapshots keep the record exactly as given.
        assert_eq!(store.load_snapshot("demo", &ids[0]).unwrap(), record);
    }

    #[test]
    fn test_write_new_file_never_overwrites() {
        let (dir, _store) = store();
        let path = dir.path().join("20240301_120000.mem");
        fs::write(&path, "existing").unwrap();

        let record = MemoryRecord::new("demo", "/work/demo");
        assert!(!write_new_file(&path, &record).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing");

        let fresh = dir.path().join("20240301_120001.mem");
        assert!(write_new_file(&fresh, &record).unwrap());
        assert_eq!(load_file(&fresh).unwrap(), record);
        assert_eq!(mem_files(dir.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_aliases_stay_inside_the_store() {
        let (_dir, store) = store();
        let mut record = MemoryRecord::new("demo", "/work/demo");

        for alias in ["../escape", "a/b", "..", ".", "", "/abs"] {
            assert!(
                matches!(store.save(alias, &mut record), Err(StoreError::InvalidAlias(_))),
                "{alias:?} accepted"
            );
            assert!(matches!(
                store.snapshot(alias, &record),
                Err(StoreError::InvalidAlias(_))
            ));
        }
        assert!(!store.contains("../escape"));
        assert!(store.save("my-app.v2", &mut record).is_ok());
    }

    #[test]
    fn test_list_memories_reports_broken_records() {
        let (_dir, store) = store();
        let mut record = MemoryRecord::new("demo", "/work/demo");
        record.description = "demo app".to_string();
        store.save("demo", &mut record).unwrap();
        fs::write(store.memory_path("broken").unwrap(), "garbage").unwrap();

        let summaries = store.list_memories().unwrap();
        assert_eq!(summaries.len(), 2);

        assert_eq!(summaries[0].alias, "broken");
        assert_eq!(summaries[0].project, "Error loading");
        assert_eq!(summaries[0].updated, None);

        assert_eq!(summaries[1].alias, "demo");
        assert_eq!(summaries[1].description, "demo app");
        assert_eq!(summaries[1].path, "/work/demo");
    }

    #[test]
    fn test_find_local_memory_walks_up() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("project");
        let nested = project.join("src").join("api");
        fs::create_dir_all(&nested).unwrap();

        let mut record = MemoryRecord::new("project", &project);
        save_file(&project.join("project.mem"), &mut record).unwrap();

        assert_eq!(find_local_memory(&nested), Some(project.join("project.mem")));
    }
}
