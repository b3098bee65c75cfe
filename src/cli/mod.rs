//! Command-line interface for verse-forge.
//!
//! Provides one batch compilation command per prompt task.

mod commands;

pub use commands::{parse_cli, run_with_cli, Cli};
