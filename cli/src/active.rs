//! The active-project pointer.
//!
//! A single file in the store directory holding the alias that commands
//! without an explicit target operate on.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ActiveProject {
    path: PathBuf,
}

impl ActiveProject {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The active alias. A missing or blank pointer means none.
    pub fn get(&self) -> Option<String> {
        let alias = fs::read_to_string(&self.path).ok()?;
        let alias = alias.trim();
        (!alias.is_empty()).then(|| alias.to_string())
    }

    pub fn set(&self, alias: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, alias)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        debug!("Active project set to {alias}");
        Ok(())
    }
}
