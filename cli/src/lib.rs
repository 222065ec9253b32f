//! The `recall` command line.
//!
//! The binary owns the active-project pointer and all text rendering; the
//! memory operations themselves live in `recall-core`.

pub mod active;
pub mod cli;
pub mod commands;
pub mod render;

pub use cli::{Cli, Command};
pub use commands::run;
