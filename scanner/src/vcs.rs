//! Version-control collaborator.
//!
//! The analyzer only needs a commit identifier and, for diffs, a list of
//! changed paths. Both degrade to empty values when the tool is missing or
//! the directory is not a repository.

use std::path::Path;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Length of the abbreviated commit identifier.
const SHORT_COMMIT_LEN: usize = 8;

/// How a file changed between two commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    /// Renames, copies and any other status.
    Changed,
}

impl ChangeKind {
    /// Map a `--name-status` letter.
    pub fn from_status(status: &str) -> Self {
        match status {
            "A" => Self::Added,
            "M" => Self::Modified,
            "D" => Self::Deleted,
            _ => Self::Changed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Changed => "changed",
        }
    }
}

/// One changed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
}

/// Source of commit identifiers and change lists.
///
/// Implementations never fail: an unavailable tool yields an empty string or
/// an empty list.
pub trait VersionControl {
    /// Abbreviated identifier of the current commit, or `""`.
    fn current_commit(&self, root: &Path) -> String;

    /// Files changed between `since` and the current commit, in tool order.
    fn changed_files(&self, root: &Path, since: &str) -> Vec<FileChange>;
}

/// Shells out to the `git` executable.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    fn run(root: &Path, args: &[&str]) -> Option<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                debug!("Failed to run git {args:?}: {e}");
                return None;
            }
        };

        if !output.status.success() {
            debug!(
                "git {args:?} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControl for GitCli {
    fn current_commit(&self, root: &Path) -> String {
        Self::run(root, &["rev-parse", "HEAD"])
            .map(|out| out.trim().chars().take(SHORT_COMMIT_LEN).collect())
            .unwrap_or_default()
    }

    fn changed_files(&self, root: &Path, since: &str) -> Vec<FileChange> {
        let range = format!("{since}..HEAD");
        Self::run(root, &["diff", "--name-status", &range])
            .map(|out| parse_name_status(&out))
            .unwrap_or_default()
    }
}

/// Collaborator for trees outside version control.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVersionControl;

impl VersionControl for NoVersionControl {
    fn current_commit(&self, _root: &Path) -> String {
        String::new()
    }

    fn changed_files(&self, _root: &Path, _since: &str) -> Vec<FileChange> {
        Vec::new()
    }
}

/// Parse `git diff --name-status` output. Lines without a path are skipped.
pub fn parse_name_status(output: &str) -> Vec<FileChange> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split('\t');
            let status = parts.next()?;
            let path = parts.next()?;
            Some(FileChange {
                path: path.to_string(),
                kind: ChangeKind::from_status(status),
            })
        })
        .collect()
}
