//! Command implementations for the CLI interface.
//!
//! This module contains the handlers behind each subcommand. `add` and
//! `update` drive the same [`TaskEditor`](crate::editor::TaskEditor) submit
//! routine as the TUI form, with notifications printed to stdout instead of
//! rendered as toasts.

use std::path::Path;

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell as CompletionShell};

use crate::cli::Cli;
use crate::editor::{format_severity, Destination, Severity, Shell, TaskEditor};
use crate::store::{FileStorage, TaskStore};
use crate::task::{format_status, Status, Task};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Start date/time, e.g. 2024-01-01T09:00.
        #[arg(long)]
        start: String,
        /// End date/time, e.g. 2024-01-01T10:00.
        #[arg(long)]
        end: String,
        /// Status: open | progress | pending | closed.
        #[arg(long, value_enum)]
        status: Status,
    },

    /// List tasks.
    List {
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
    },

    /// View a single task by id (or unique id prefix).
    View {
        /// Task id to view.
        id: String,
    },

    /// Update fields on a task.
    Update {
        /// Task id to update.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, value_enum)]
        status: Option<Status>,
    },

    /// Delete a task by id.
    Delete {
        /// Task id to delete.
        id: String,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

/// Shell implementation for the CLI: notifications go to stdout, navigation
/// is a no-op since there is no screen to leave.
struct CliShell;

impl Shell for CliShell {
    fn notify(&mut self, severity: Severity, title: &str, body: &str) {
        if body.is_empty() {
            println!("[{}] {}", format_severity(severity), title);
        } else {
            println!("[{}] {}: {}", format_severity(severity), title, body);
        }
    }

    fn navigate(&mut self, _destination: Destination) {}
}

/// Launch the terminal user interface.
pub fn cmd_ui(data_dir: &Path) {
    if let Err(e) = run_tui(data_dir) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the list.
pub fn cmd_add(
    store: &mut TaskStore<FileStorage>,
    title: String,
    start: String,
    end: String,
    status: Status,
) {
    let mut editor = TaskEditor::create();
    editor.title = title;
    editor.start_date = start;
    editor.end_date = end;
    editor.status = Some(status);
    editor.submit(store, &mut CliShell);
}

/// Update fields on an existing task.
pub fn cmd_update(
    store: &mut TaskStore<FileStorage>,
    id: String,
    title: Option<String>,
    start: Option<String>,
    end: Option<String>,
    status: Option<Status>,
) {
    let task = match resolve_task(store, &id) {
        Some(t) => t,
        None => {
            eprintln!("No task with id '{id}'");
            std::process::exit(1);
        }
    };

    let mut editor = TaskEditor::edit(task);
    if let Some(t) = title {
        editor.title = t;
    }
    if let Some(s) = start {
        editor.start_date = s;
    }
    if let Some(e) = end {
        editor.end_date = e;
    }
    if let Some(s) = status {
        editor.status = Some(s);
    }
    editor.submit(store, &mut CliShell);
}

/// List tasks, optionally filtered by status.
pub fn cmd_list(store: &TaskStore<FileStorage>, status: Option<Status>) {
    let tasks = match store.all() {
        Ok(tasks) => tasks,
        Err(e) => {
            eprintln!("Failed to read task list: {e}");
            std::process::exit(1);
        }
    };

    let filtered: Vec<&Task> = tasks
        .iter()
        .filter(|t| status.map_or(true, |s| t.status == s))
        .collect();

    if filtered.is_empty() {
        println!("No tasks.");
        return;
    }
    print_table(&filtered);
}

/// View a single task in full.
pub fn cmd_view(store: &TaskStore<FileStorage>, id: String) {
    match resolve_task(store, &id) {
        Some(t) => {
            println!("Id:     {}", t.id);
            println!("Title:  {}", t.title);
            println!("Start:  {}", t.start_date);
            println!("End:    {}", t.end_date);
            println!("Status: {}", format_status(t.status));
        }
        None => {
            eprintln!("No task with id '{id}'");
            std::process::exit(1);
        }
    }
}

/// Delete a task by id.
pub fn cmd_delete(store: &mut TaskStore<FileStorage>, id: String) {
    let task = match resolve_task(store, &id) {
        Some(t) => t,
        None => {
            eprintln!("No task with id '{id}'");
            std::process::exit(1);
        }
    };
    match store.remove(&task.id) {
        Ok(true) => println!("Deleted '{}'", task.title),
        Ok(false) => eprintln!("No task with id '{id}'"),
        Err(e) => {
            eprintln!("Failed to delete task: {e}");
            std::process::exit(1);
        }
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}

/// Resolve an id argument, accepting a unique prefix of a full uuid.
fn resolve_task(store: &TaskStore<FileStorage>, id: &str) -> Option<Task> {
    let tasks = store.all().ok()?;
    if let Some(t) = tasks.iter().find(|t| t.id == id) {
        return Some(t.clone());
    }
    let mut matches = tasks.iter().filter(|t| t.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(t), None) => Some(t.clone()),
        _ => None,
    }
}

/// Print tasks in a formatted table.
fn print_table(tasks: &[&Task]) {
    println!(
        "{:<10} {:<10} {:<18} {:<18} {}",
        "ID", "Status", "Start", "End", "Title"
    );
    for t in tasks {
        println!(
            "{:<10} {:<10} {:<18} {:<18} {}",
            truncate(&t.id, 10),
            format_status(t.status),
            truncate(&t.start_date, 18),
            truncate(&t.end_date, 18),
            t.title
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
