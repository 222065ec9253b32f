//! Argument surface of the `recall` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "recall")]
#[command(about = "Portable project memory for AI assistants", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Memory store directory
    #[arg(long, global = true, env = "RECALL_HOME")]
    pub home: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a memory from a project
    Pack {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Alias in the central store
        #[arg(short, long)]
        name: Option<String>,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List saved memories
    List,

    /// Switch the active project
    Use {
        alias: String,
    },

    /// Re-pack the active project
    Update,

    /// Print the context block for an AI assistant
    Load {
        /// A .mem file to read instead of the active project
        file: Option<PathBuf>,

        /// Load the active project as it was on this date (YYYY-MM-DD)
        #[arg(long)]
        at: Option<String>,
    },

    /// Set the project description
    Describe {
        text: String,
    },

    /// Record a decision
    Note {
        text: String,
    },

    /// Log a work session
    Session {
        topic: String,
    },

    /// Show the full memory
    Show {
        /// A .mem file to read instead of the active project
        file: Option<PathBuf>,
    },

    /// Search files, functions and classes
    Find {
        query: String,
    },

    /// Show changes since the last pack
    Diff,

    /// Show the imports of a file and the files that import it
    Deps {
        /// Path fragment
        file: String,
    },

    /// List snapshots of the active project
    History,

    /// Show logged searches
    Queries,

    /// Show TODOs, notes and other facts extracted from a file
    Entity {
        /// Path fragment
        file: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pack_arguments() {
        let cli = Cli::try_parse_from(["recall", "pack", "./app", "-n", "app"]).unwrap();
        match cli.command {
            Command::Pack { path, name, output } => {
                assert_eq!(path, PathBuf::from("./app"));
                assert_eq!(name.as_deref(), Some("app"));
                assert_eq!(output, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["recall", "find", "auth", "--home", "/tmp/r", "-v"]).unwrap();
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/r")));
        assert!(cli.verbose);
    }
}
