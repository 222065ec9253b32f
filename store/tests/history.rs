//! Integration tests for snapshot history and time travel.

use chrono::{Days, NaiveDate};
use pretty_assertions::assert_eq;
use recall_store::{MemoryRecord, MemoryStore, SnapshotId, StoreError, parse_date, save_file};
use tempfile::TempDir;

fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

/// Save over the live record the way a re-pack does: archive first.
fn repack(store: &MemoryStore, alias: &str, files: usize) {
    if store.contains(alias) {
        let previous = store.load(alias).unwrap();
        store.snapshot(alias, &previous).unwrap();
    }
    let mut record = MemoryRecord::new(alias, "/work/app");
    record.stats.total_files = files;
    store.save(alias, &mut record).unwrap();
}

/// Place a snapshot with a chosen identifier.
fn seed_snapshot(store: &MemoryStore, alias: &str, id: &str, commit: &str) {
    let mut record = MemoryRecord::new(alias, "/work/app");
    record.last_commit = commit.to_string();
    let path = store.history_dir(alias).unwrap().join(format!("{id}.mem"));
    save_file(&path, &mut record).unwrap();
}

#[test]
fn test_each_repack_archives_the_previous_record() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new(dir.path());

    for files in 1..=4 {
        repack(&store, "app", files);
    }

    let history = store.list_history("app").unwrap();
    assert_eq!(history.len(), 3);
    assert!(history.windows(2).all(|w| w[0] > w[1]));

    let infos = store.history("app").unwrap();
    let files: Vec<usize> = infos.iter().map(|i| i.files).collect();
    assert_eq!(files, vec![3, 2, 1]);

    assert_eq!(store.load("app").unwrap().stats.total_files, 4);
}

#[test]
fn test_resolve_at_picks_latest_snapshot_not_after_date() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new(dir.path());
    seed_snapshot(&store, "app", "20240110_090000", "aaaa1111");
    seed_snapshot(&store, "app", "20240215_180000", "bbbb2222");
    seed_snapshot(&store, "app", "20240215_180000_01", "cccc3333");
    seed_snapshot(&store, "app", "20240301_120000", "dddd4444");

    let resolve = |s: &str| store.resolve_at("app", date(s)).unwrap();

    assert_eq!(resolve("2024-02-20"), Some(SnapshotId::from_stem("20240215_180000_01")));
    assert_eq!(resolve("2024-01-10"), Some(SnapshotId::from_stem("20240110_090000")));
    assert_eq!(resolve("20991231"), Some(SnapshotId::from_stem("20240301_120000")));
    assert_eq!(resolve("2024-01-09"), None);

    let id = resolve("2024-02-15").unwrap();
    assert_eq!(store.load_snapshot("app", &id).unwrap().last_commit, "cccc3333");
}

#[test]
fn test_resolve_at_without_history() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new(dir.path());

    let today = chrono::Local::now().date_naive();
    assert_eq!(store.resolve_at("app", today).unwrap(), None);
    assert!(store.list_history("app").unwrap().is_empty());
}

#[test]
fn test_todays_snapshot_resolves_for_today_only() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new(dir.path());
    repack(&store, "app", 1);
    repack(&store, "app", 2);

    let today = chrono::Local::now().date_naive();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap();

    assert!(store.resolve_at("app", today).unwrap().is_some());
    assert_eq!(store.resolve_at("app", yesterday).unwrap(), None);
}

#[test]
fn test_round_trip_preserves_every_field() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new(dir.path());

    let mut record = MemoryRecord::new("app", "/work/app");
    record.description = "Billing dashboard".to_string();
    record.summary = "app: | 2 files, 10 lines".to_string();
    record.stack.language = Some("TypeScript".to_string());
    record.structure.insert("src".to_string(), 2);
    record
        .entities
        .entry("src/a.ts".to_string())
        .or_default()
        .todos
        .push("add pagination".to_string());
    record.index.files = vec!["src/a.ts".to_string(), "src/b.ts".to_string()];
    record.index.corpus.push("src/a.ts", "src/a.ts Code");
    record.add_decision("keep history");
    record.add_session("search tuning");
    record.last_commit = "abc12345".to_string();

    store.save("app", &mut record).unwrap();
    assert_eq!(store.load("app").unwrap(), record);
}

#[test]
fn test_missing_alias_is_not_found() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new(dir.path());

    assert!(matches!(store.load("ghost"), Err(StoreError::NotFound(_))));
}

#[test]
fn test_snapshot_after_clock_moves_back_is_still_newest() {
    let dir = TempDir::new().unwrap();
    let store = MemoryStore::new(dir.path());
    seed_snapshot(&store, "app", "29991231_000000", "future");

    let record = MemoryRecord::new("app", "/work/app");
    let id = store.snapshot("app", &record).unwrap();

    assert_eq!(id, SnapshotId::from_stem("29991231_000000_01"));
    let history = store.list_history("app").unwrap();
    assert_eq!(history[0], id);
    assert_eq!(history.len(), 2);
}
