//! Plain-text views of memories and query results.
//!
//! Every function returns the text to print so the views can be tested
//! without capturing stdout.

use std::cmp::Reverse;

use recall_core::{
    ChangeKind, Dependencies, DiffOutcome, DirectorySummary, EntityCategory, FileEntities,
    FindResult, MemoryRecord, MemorySummary, PackOutcome, QueryLogEntry, SnapshotInfo,
    group_thousands,
};

const CONTEXT_DIRECTORIES: usize = 10;
const CONTEXT_KEY_FILES: usize = 15;
const CONTEXT_DECISIONS: usize = 5;
const CONTEXT_SESSIONS: usize = 3;
const SHOW_DIRECTORIES: usize = 8;
const SHOW_ANNOTATIONS: usize = 5;
const LIST_DESCRIPTION_CHARS: usize = 40;
const FIND_LIMIT: usize = 10;
const DIFF_LIMIT: usize = 20;
const DEPS_IMPORTS: usize = 10;
const HISTORY_LIMIT: usize = 10;
const QUERIES_LIMIT: usize = 15;
const QUERY_CHARS: usize = 30;
const ENTITIES_PER_CATEGORY: usize = 3;

const RULE: &str = "============================================================";

/// Markdown context block for an AI assistant.
pub fn context(record: &MemoryRecord) -> String {
    let mut out = vec![
        format!("# Project: {}", record.project),
        format!("Updated: {}", record.updated.date()),
        String::new(),
    ];

    if !record.description.is_empty() {
        out.push("## Description".to_string());
        out.push(record.description.clone());
        out.push(String::new());
    }

    out.push("## Summary".to_string());
    out.push(record.summary.clone());
    out.push(String::new());

    if !record.stack.is_empty() {
        out.push("## Stack".to_string());
        for (category, value) in record.stack.entries() {
            out.push(format!("- {category}: {value}"));
        }
        out.push(String::new());
    }

    if !record.directories.is_empty() {
        out.push("## Directory Overview".to_string());
        for (name, dir) in largest_directories(record, CONTEXT_DIRECTORIES) {
            out.push(format!("- `{name}/` ({} files) - {}", dir.files, dir.purpose));
        }
        out.push(String::new());
    }

    if !record.key_files.is_empty() {
        out.push("## Key Files".to_string());
        for file in record.key_files.iter().take(CONTEXT_KEY_FILES) {
            let functions = if file.functions.is_empty() {
                String::new()
            } else {
                format!(" ({})", file.functions.join(", "))
            };
            out.push(format!("- `{}` - {}{functions}", file.path, file.purpose));
        }
        out.push(String::new());
    }

    if !record.decisions.is_empty() {
        out.push("## Decisions".to_string());
        for decision in last(&record.decisions, CONTEXT_DECISIONS) {
            out.push(format!("- [{}] {}", decision.date.date(), decision.note));
        }
        out.push(String::new());
    }

    if !record.sessions.is_empty() {
        out.push("## Recent Sessions".to_string());
        for session in last(&record.sessions, CONTEXT_SESSIONS) {
            out.push(format!("- [{}] {}", session.date.date(), session.topic));
        }
        out.push(String::new());
    }

    out.push("---".to_string());
    out.push("Commands:".to_string());
    out.push("   `recall deps <file>` -> imports of a file and the files that depend on it".to_string());
    out.push("   `recall find <query>` -> ranked search".to_string());
    out.push("   `recall diff` -> changes since the last pack".to_string());

    out.join("\n")
}

/// Full human-readable view of a memory.
pub fn show(record: &MemoryRecord) -> String {
    let mut out = vec![
        RULE.to_string(),
        record.project.clone(),
        RULE.to_string(),
        String::new(),
    ];

    if !record.description.is_empty() {
        out.push(record.description.clone());
        out.push(String::new());
    }

    out.push(format!("Summary: {}", record.summary));
    out.push(format!("Created: {}", record.created.date()));
    out.push(format!("Updated: {}", record.updated.date()));
    if !record.last_commit.is_empty() {
        out.push(format!("Git: {}", record.last_commit));
    }
    out.push(String::new());

    if !record.stack.is_empty() {
        out.push("Stack:".to_string());
        for (category, value) in record.stack.entries() {
            out.push(format!("   {category}: {value}"));
        }
        out.push(String::new());
    }

    if !record.directories.is_empty() {
        out.push("Directories:".to_string());
        for (name, dir) in largest_directories(record, SHOW_DIRECTORIES) {
            out.push(format!("   {name}/ ({} files) - {}", dir.files, dir.purpose));
        }
        out.push(String::new());
    }

    let stats = &record.stats;
    out.push("Stats:".to_string());
    out.push(format!("   Files: {}", stats.total_files));
    out.push(format!("   Lines: {}", group_thousands(stats.total_lines)));
    out.push(format!("   Functions: {}", stats.total_functions));
    out.push(format!("   Components: {}", stats.total_classes));
    out.push(String::new());

    if !record.entities.is_empty() {
        let total: usize = record
            .entities
            .values()
            .map(|e| e.todos.len() + e.notes.len())
            .sum();
        out.push(format!(
            "Entities: {total} extracted from {} files",
            record.entities.len()
        ));
        out.push(String::new());
    }

    if !record.decisions.is_empty() {
        out.push(format!("Decisions ({}):", record.decisions.len()));
        for decision in last(&record.decisions, SHOW_ANNOTATIONS) {
            out.push(format!("   [{}] {}", decision.date.date(), decision.note));
        }
        out.push(String::new());
    }

    if !record.sessions.is_empty() {
        out.push(format!("Sessions ({}):", record.sessions.len()));
        for session in last(&record.sessions, SHOW_ANNOTATIONS) {
            out.push(format!("   [{}] {}", session.date.date(), session.topic));
        }
        out.push(String::new());
    }

    out.push(RULE.to_string());
    out.join("\n")
}

/// Report of a finished pack.
pub fn pack_outcome(outcome: &PackOutcome) -> String {
    let stats = &outcome.record.stats;
    let mut out = Vec::new();
    if let Some(id) = &outcome.snapshot_id {
        out.push(format!("Snapshot saved: {id}"));
    }
    out.push(format!("Created {}", outcome.output_path.display()));
    out.push(format!(
        "   {} files, {} lines indexed",
        stats.total_files,
        group_thousands(stats.total_lines)
    ));
    if outcome.entity_count > 0 {
        out.push(format!("   {} entities extracted", outcome.entity_count));
    }
    out.join("\n")
}

/// The central store's memories, marking the active one.
pub fn memory_list(memories: &[MemorySummary], active: Option<&str>) -> String {
    if memories.is_empty() {
        return "No saved memories. Run 'recall pack <path> --name <alias>' to create one."
            .to_string();
    }

    let mut out = vec!["Saved memories:".to_string(), String::new()];
    for memory in memories {
        let marker = if Some(memory.alias.as_str()) == active {
            "-> "
        } else {
            "   "
        };
        out.push(format!("{marker}{}", memory.alias));
        out.push(format!(
            "     {} | {} files, {} lines",
            memory.project,
            memory.stats.total_files,
            group_thousands(memory.stats.total_lines)
        ));
        if memory.snapshots > 0 {
            out.push(format!("     {} snapshots", memory.snapshots));
        }
        if !memory.description.is_empty() {
            let short: String = memory.description.chars().take(LIST_DESCRIPTION_CHARS).collect();
            out.push(format!("     \"{short}...\""));
        }
        let updated = memory
            .updated
            .map_or_else(|| "unknown".to_string(), |d| d.format("%Y-%m-%d").to_string());
        out.push(format!("     Updated: {updated}"));
        out.push(String::new());
    }
    out.join("\n")
}

pub fn find_results(query: &str, result: &FindResult) -> String {
    if result.is_empty() {
        return format!("No results for '{query}'");
    }

    let mut out = vec![format!("Results for '{query}':"), String::new()];
    if !result.files.is_empty() {
        out.push("Files (ranked by relevance):".to_string());
        for file in result.files.iter().take(FIND_LIMIT) {
            out.push(format!("   {} ({:.2})", file.path, file.score));
        }
        out.push(String::new());
    }
    if !result.functions.is_empty() {
        out.push("Functions:".to_string());
        out.extend(result.functions.iter().take(FIND_LIMIT).map(|f| format!("   {f}")));
        out.push(String::new());
    }
    if !result.classes.is_empty() {
        out.push("Classes/Components:".to_string());
        out.extend(result.classes.iter().take(FIND_LIMIT).map(|c| format!("   {c}")));
    }
    out.join("\n")
}

pub fn diff(outcome: &DiffOutcome) -> String {
    if outcome.changes.is_empty() {
        return "No changes since last pack".to_string();
    }

    let mut out = vec![
        format!("Changes since last pack ({}):", outcome.since_commit),
        String::new(),
    ];
    for change in outcome.changes.iter().take(DIFF_LIMIT) {
        let icon = match change.kind {
            ChangeKind::Added => '+',
            ChangeKind::Modified => '~',
            ChangeKind::Deleted => '-',
            ChangeKind::Changed => '?',
        };
        out.push(format!("   {icon} {} ({})", change.path, change.kind.as_str()));
    }
    if outcome.changes.len() > DIFF_LIMIT {
        out.push(String::new());
        out.push(format!(
            "   ... and {} more",
            outcome.changes.len() - DIFF_LIMIT
        ));
    }
    out.push(String::new());
    out.push("Run 'recall update' to refresh the memory".to_string());
    out.join("\n")
}

pub fn deps(fragment: &str, found: &[Dependencies]) -> String {
    if found.is_empty() {
        return format!("File not found: {fragment}");
    }

    let mut out = Vec::new();
    for entry in found {
        out.push(entry.path.clone());
        if entry.imports.is_empty() {
            out.push("   No imports tracked".to_string());
        } else {
            out.push("   Imports:".to_string());
            out.extend(
                entry
                    .imports
                    .iter()
                    .take(DEPS_IMPORTS)
                    .map(|i| format!("      <- {i}")),
            );
        }
        if !entry.dependents.is_empty() {
            out.push("   Imported by:".to_string());
            out.extend(entry.dependents.iter().map(|d| format!("      -> {d}")));
        }
        out.push(String::new());
    }
    out.join("\n")
}

pub fn history(alias: &str, snapshots: &[SnapshotInfo]) -> String {
    if snapshots.is_empty() {
        return format!("No history for '{alias}'. Snapshots are created on each 'recall update'.");
    }

    let mut out = vec![format!("History for {alias}:"), String::new()];
    for snapshot in snapshots.iter().take(HISTORY_LIMIT) {
        out.push(format!(
            "   {} | {} | {} | {} files",
            snapshot.id, snapshot.date, snapshot.commit, snapshot.files
        ));
    }
    if snapshots.len() > HISTORY_LIMIT {
        out.push(String::new());
        out.push(format!("   ... and {} more", snapshots.len() - HISTORY_LIMIT));
    }
    out.push(String::new());
    out.push("Use 'recall load --at YYYY-MM-DD' to time-travel".to_string());
    out.join("\n")
}

/// The most recent logged queries, oldest first.
pub fn queries(entries: &[QueryLogEntry]) -> String {
    if entries.is_empty() {
        return "No queries logged.".to_string();
    }

    let mut out = vec!["Recent queries:".to_string(), String::new()];
    for entry in last(entries, QUERIES_LIMIT) {
        let query: String = entry.query.chars().take(QUERY_CHARS).collect();
        out.push(format!(
            "   [{}] {}: \"{query}\" ({} results)",
            entry.date.date(),
            entry.command,
            entry.results
        ));
    }
    out.join("\n")
}

pub fn entities(fragment: &str, found: &[FileEntities]) -> String {
    if found.is_empty() {
        return format!(
            "No entities found for: {fragment}\n   (Entities are extracted from TODO, NOTE, FIXME comments and docstrings)"
        );
    }

    let mut out = Vec::new();
    for file in found {
        out.push(file.path.clone());
        for category in EntityCategory::ALL {
            let facts = file.entities.get(category);
            if facts.is_empty() {
                continue;
            }
            out.push(format!("   {}:", category.display_name()));
            out.extend(
                facts
                    .iter()
                    .take(ENTITIES_PER_CATEGORY)
                    .map(|fact| format!("      - {fact}")),
            );
        }
        out.push(String::new());
    }
    out.join("\n")
}

fn largest_directories(
    record: &MemoryRecord,
    limit: usize,
) -> Vec<(&String, &DirectorySummary)> {
    let mut dirs: Vec<_> = record.directories.iter().collect();
    dirs.sort_by_key(|(_, dir)| Reverse(dir.files));
    dirs.truncate(limit);
    dirs
}

fn last<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}
