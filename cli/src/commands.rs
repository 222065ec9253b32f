//! Subcommand handlers.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use recall_core::{
    MemoryTarget, PackParams, Recall, RecallConfig, RecallError, VersionControl,
    find_local_memory,
};
use tracing::debug;

use crate::active::ActiveProject;
use crate::cli::{Cli, Command};
use crate::render;

/// Execute `cli` against the store it names and print the result.
pub fn run(cli: Cli) -> Result<()> {
    let config = RecallConfig::new(RecallConfig::resolve_home(cli.home));
    let active = ActiveProject::new(config.home.join("current"));
    let recall = Recall::new(config);
    let cwd = std::env::current_dir().context("failed to read the working directory")?;

    let output = execute(&recall, &active, &cwd, cli.command)?;
    println!("{output}");
    Ok(())
}

/// Run one command and return its output text.
pub fn execute<V: VersionControl>(
    recall: &Recall<V>,
    active: &ActiveProject,
    cwd: &Path,
    command: Command,
) -> Result<String> {
    let current = active.get();
    debug!("Active project: {current:?}");

    match command {
        Command::Pack { path, name, output } => {
            let params = PackParams {
                path,
                alias: name.clone(),
                output,
            };
            let outcome = recall.pack(&params).map_err(explain)?;
            let mut text = render::pack_outcome(&outcome);
            if let Some(alias) = name {
                active.set(&alias)?;
                text.push_str(&format!(
                    "\n   Active project: {alias}\n\n{}",
                    render::context(&outcome.record)
                ));
            }
            Ok(text)
        }
        Command::List => {
            let memories = recall.list()?;
            Ok(render::memory_list(&memories, current.as_deref()))
        }
        Command::Use { alias } => {
            let record = recall
                .load(&MemoryTarget::Alias(alias.clone()))
                .map_err(|e| {
                    if e.is_not_found() {
                        anyhow!("no memory found for '{alias}'; run 'recall list' to see available projects")
                    } else {
                        explain(e)
                    }
                })?;
            active.set(&alias)?;
            let mut text = format!("Switched to: {alias}\n   {}", record.project);
            if !record.description.is_empty() {
                text.push_str(&format!("\n   {}", record.description));
            }
            Ok(text)
        }
        Command::Update => {
            let alias = require_active(current)?;
            let outcome = recall.update(&alias).map_err(explain)?;
            Ok(render::pack_outcome(&outcome))
        }
        Command::Load { file, at: Some(date) } => {
            if file.is_some() {
                debug!("Ignoring the file argument for a dated load");
            }
            let alias = current.ok_or_else(|| anyhow!("no active project for time travel"))?;
            let (id, record) = recall.load_at(&alias, &date).map_err(explain)?;
            debug!("Resolved {date} to snapshot {id}");
            Ok(format!(
                "Time-traveling to {date}\n\n{}",
                render::context(&record)
            ))
        }
        Command::Load { file, at: None } => {
            let target = match file {
                Some(file) => MemoryTarget::File(file),
                // A memory next to the working directory wins over the active project.
                None => find_local_memory(cwd)
                    .map(MemoryTarget::File)
                    .or_else(|| current.map(MemoryTarget::Alias))
                    .ok_or_else(no_memory)?,
            };
            let record = recall.load(&target).map_err(explain)?;
            Ok(render::context(&record))
        }
        Command::Describe { text } => {
            let target = resolve_target(current, cwd)?;
            let record = recall.describe(&target, &text).map_err(explain)?;
            Ok(format!("Description updated for {}\n   {text}", record.project))
        }
        Command::Note { text } => {
            let target = resolve_target(current, cwd)?;
            recall.note(&target, &text).map_err(explain)?;
            Ok(format!("Added note: {text}"))
        }
        Command::Session { topic } => {
            let target = resolve_target(current, cwd)?;
            recall.session(&target, &topic).map_err(explain)?;
            Ok(format!("Logged session: {topic}"))
        }
        Command::Show { file } => {
            let target = match file {
                Some(file) => MemoryTarget::File(file),
                None => resolve_target(current, cwd)?,
            };
            let record = recall.load(&target).map_err(explain)?;
            Ok(render::show(&record))
        }
        Command::Find { query } => {
            let target = resolve_target(current.clone(), cwd)?;
            let result = recall
                .find(&target, &query, current.as_deref())
                .map_err(explain)?;
            Ok(render::find_results(&query, &result))
        }
        Command::Diff => {
            let target = resolve_target(current, cwd)?;
            let outcome = recall.diff(&target).map_err(explain)?;
            Ok(render::diff(&outcome))
        }
        Command::Deps { file } => {
            let target = resolve_target(current, cwd)?;
            let found = recall.deps(&target, &file).map_err(explain)?;
            Ok(render::deps(&file, &found))
        }
        Command::History => {
            let alias = require_active(current)?;
            let snapshots = recall.history(&alias)?;
            Ok(render::history(&alias, &snapshots))
        }
        Command::Queries => {
            let entries = recall.queries(current.as_deref());
            Ok(render::queries(&entries))
        }
        Command::Entity { file } => {
            let target = resolve_target(current, cwd)?;
            let found = recall.entities(&target, &file).map_err(explain)?;
            Ok(render::entities(&file, &found))
        }
    }
}

/// The active project if there is one, else the nearest local memory.
fn resolve_target(current: Option<String>, cwd: &Path) -> Result<MemoryTarget> {
    if let Some(alias) = current {
        return Ok(MemoryTarget::Alias(alias));
    }
    find_local_memory(cwd)
        .map(MemoryTarget::File)
        .ok_or_else(no_memory)
}

fn require_active(current: Option<String>) -> Result<String> {
    current.ok_or_else(|| anyhow!("no active project; run 'recall use <alias>' first"))
}

fn no_memory() -> anyhow::Error {
    anyhow!(
        "no .mem file found in the current directory or central store; run 'recall pack --name <alias>' to create one"
    )
}

/// Attach the next step a user should take to a core error.
fn explain(error: RecallError) -> anyhow::Error {
    let hint = if error.is_corrupt() {
        Some("the memory is damaged; run 'recall pack' again to rebuild it")
    } else if error.is_not_found() {
        Some("run 'recall pack' first")
    } else {
        match &error {
            RecallError::NoCommitRecorded => Some("run 'recall update' inside a git repository"),
            RecallError::NoSnapshotAt { .. } => Some("run 'recall history' to see available dates"),
            _ => None,
        }
    };
    match hint {
        Some(hint) => anyhow::Error::new(error).context(hint),
        None => anyhow::Error::new(error),
    }
}
