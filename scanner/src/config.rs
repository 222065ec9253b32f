//! Configuration types for project scanning.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extensions (with leading dot) of files that are analyzed.
pub const CODE_EXTENSIONS: &[&str] = &[
    ".py", ".ts", ".tsx", ".js", ".jsx", ".vue", ".svelte", ".go", ".rs", ".java", ".kt", ".swift",
    ".rb", ".php", ".css", ".scss", ".html", ".md", ".json", ".yaml", ".yml",
];

/// Directory names that are never descended into.
pub const SKIP_DIRS: &[&str] = &[
    // Version control
    ".git",
    // Dependencies
    "node_modules",
    "vendor",
    ".venv",
    "venv",
    "env",
    ".env",
    // Build artifacts
    ".next",
    "__pycache__",
    "dist",
    "build",
    ".turbo",
    ".cache",
    // Coverage
    "coverage",
    ".nyc_output",
    // Our own store
    ".recall",
];

/// How the structure of a file is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Parsed with a real grammar.
    Python,

    /// JavaScript and TypeScript, handled by pattern heuristics.
    Script,

    /// Any other recognized file; no structure is extracted.
    Other,
}

impl FileKind {
    /// Classify a file by its extension (with leading dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            ".py" => Self::Python,
            ".ts" | ".tsx" | ".js" | ".jsx" => Self::Script,
            _ => Self::Other,
        }
    }
}

/// Configuration for one scan of a project tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Root of the project.
    pub root: PathBuf,

    /// Recognized extensions, with leading dot.
    pub extensions: BTreeSet<String>,

    /// Directory names pruned before descending.
    pub skip_dirs: BTreeSet<String>,

    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,

    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
}

impl ScanConfig {
    /// Create a config for `root` with the default extension and skip sets.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: CODE_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            skip_dirs: SKIP_DIRS.iter().map(|d| (*d).to_string()).collect(),
            max_depth: None,
            follow_symlinks: false,
        }
    }

    /// Add a directory name to prune.
    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.skip_dirs.insert(name.into());
        self
    }

    /// Recognize an additional extension. A missing leading dot is added.
    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        let ext = ext.into();
        let ext = if ext.starts_with('.') {
            ext
        } else {
            format!(".{ext}")
        };
        self.extensions.insert(ext);
        self
    }

    /// Set the maximum depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Enable following symbolic links.
    pub fn follow_symlinks(mut self) -> Self {
        self.follow_symlinks = true;
        self
    }

    /// Whether a directory with this name is pruned.
    pub fn should_skip_dir(&self, name: &str) -> bool {
        self.skip_dirs.contains(name)
    }

    /// Lower-cased extension of `path` with a leading dot, if it is
    /// recognized.
    pub fn recognized_extension(&self, path: &Path) -> Option<String> {
        let ext = format!(".{}", path.extension()?.to_string_lossy().to_lowercase());
        self.extensions.contains(&ext).then_some(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scan_config_creation() {
        let config = ScanConfig::new("/home/user/project")
            .exclude_dir("target")
            .with_extension("toml")
            .with_max_depth(4);

        assert_eq!(config.root, Path::new("/home/user/project"));
        assert!(config.should_skip_dir("target"));
        assert!(config.should_skip_dir("node_modules"));
        assert!(config.extensions.contains(".toml"));
        assert_eq!(config.max_depth, Some(4));
        assert!(!config.follow_symlinks);
    }

    #[test]
    fn test_recognized_extension() {
        let config = ScanConfig::new("/p");

        assert_eq!(
            config.recognized_extension(Path::new("src/app.tsx")),
            Some(".tsx".to_string())
        );
        assert_eq!(
            config.recognized_extension(Path::new("README.MD")),
            Some(".md".to_string())
        );
        assert_eq!(config.recognized_extension(Path::new("logo.png")), None);
        assert_eq!(config.recognized_extension(Path::new("Makefile")), None);
    }

    #[test]
    fn test_file_kind() {
        assert_eq!(FileKind::from_extension(".py"), FileKind::Python);
        assert_eq!(FileKind::from_extension(".jsx"), FileKind::Script);
        assert_eq!(FileKind::from_extension(".vue"), FileKind::Other);
    }
}
