use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, file-backed to-do tracker.
/// Tasks live in a single JSON blob under the data directory.
#[derive(Parser)]
#[command(name = "taskpad", version, about = "To-do task tracker CLI")]
pub struct Cli {
    /// Data directory holding the task list (default: ~/.taskpad).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
