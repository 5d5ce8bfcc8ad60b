//! # taskpad - to-do task tracker
//!
//! A small file-backed to-do tracker with a terminal task editor and a CLI
//! for scripted use.
//!
//! ## Key Features
//!
//! - **Task Editor**: TUI form for creating and updating tasks, with modal
//!   date-time pickers for the start/end window and a status selector
//! - **Task List**: table view of all tasks with open-for-edit and delete
//! - **Local File Storage**: the whole list is one JSON blob in `~/.taskpad`
//! - **Scriptable CLI**: `add`, `list`, `view`, `update`, `delete` mirror
//!   the editor so automation goes through the same validation
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the UI
//! taskpad ui
//!
//! # Add a task from the command line
//! taskpad add "Buy milk" --start 2024-01-01T09:00 --end 2024-01-01T10:00 --status open
//!
//! # List tasks
//! taskpad list
//! ```
//!
//! Persistence failures during a save are logged (see `RUST_LOG`) rather
//! than surfaced in the UI; the form keeps its state so the save can be
//! retried by hand.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod editor;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod date_picker;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use store::{FileStorage, TaskStore};

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    // Determine the data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".taskpad")
    });
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("Failed to create data directory {}: {}", data_dir.display(), e);
        std::process::exit(1);
    }

    // Completions and the UI manage their own storage lifetimes
    match &cli.command {
        Commands::Ui => {
            cmd_ui(&data_dir);
            return;
        }
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            return;
        }
        _ => {}
    }

    let mut store = TaskStore::new(FileStorage::new(&data_dir));

    match cli.command {
        Commands::Ui | Commands::Completions { .. } => unreachable!("handled above"),

        Commands::Add {
            title,
            start,
            end,
            status,
        } => cmd_add(&mut store, title, start, end, status),

        Commands::List { status } => cmd_list(&store, status),

        Commands::View { id } => cmd_view(&store, id),

        Commands::Update {
            id,
            title,
            start,
            end,
            status,
        } => cmd_update(&mut store, id, title, start, end, status),

        Commands::Delete { id } => cmd_delete(&mut store, id),
    }
}
