//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, renders the interface, and wires the task editor
//! form to the persisted task list.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};

use crate::editor::{Destination, Severity, Shell, TaskEditor};
use crate::store::{FileStorage, TaskStore};
use crate::task::{format_status, Status, Task};
use crate::tui::colors::{DARK_GREEN, DIM_GREY, GOLD, STEEL_BLUE};
use crate::tui::task_form::{
    TaskForm, END_DATE_FIELD, START_DATE_FIELD, STATUS_FIELD, TITLE_FIELD,
};
use crate::tui::utils::{centered_rect, toast_rect};

/// How long a toast stays on screen.
const TOAST_TTL: Duration = Duration::from_millis(2500);

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
enum AppState {
    TaskList,
    AddTask,
    EditTask,
    Confirm,
    Help,
}

/// A transient notification rendered near the top of the screen.
struct Toast {
    severity: Severity,
    title: String,
    body: String,
    shown_at: Instant,
}

/// Shell implementation for the TUI. The editor's notification and
/// navigation requests are buffered here and applied by the app once
/// submit returns, which keeps the borrow of the store short.
#[derive(Default)]
struct TuiShell {
    notice: Option<(Severity, String, String)>,
    destination: Option<Destination>,
}

impl Shell for TuiShell {
    fn notify(&mut self, severity: Severity, title: &str, body: &str) {
        self.notice = Some((severity, title.to_string(), body.to_string()));
    }

    fn navigate(&mut self, destination: Destination) {
        self.destination = Some(destination);
    }
}

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    store: TaskStore<FileStorage>,
    tasks: Vec<Task>,
    table_state: TableState,
    task_form: TaskForm,
    /// Record being edited; `None` while creating.
    editing: Option<Task>,
    toast: Option<Toast>,
    status_message: String,
    should_exit: bool,
}

impl App {
    /// Create a new App instance over the given data directory.
    pub fn new(data_dir: &Path) -> Self {
        let store = TaskStore::new(FileStorage::new(data_dir));
        let mut app = App {
            state: AppState::TaskList,
            store,
            tasks: Vec::new(),
            table_state: TableState::default(),
            task_form: TaskForm::new(),
            editing: None,
            toast: None,
            status_message: String::new(),
            should_exit: false,
        };
        app.refresh_tasks();
        if !app.tasks.is_empty() {
            app.table_state.select(Some(0));
        }
        app
    }

    /// Reload the task list from storage.
    fn refresh_tasks(&mut self) {
        match self.store.all() {
            Ok(tasks) => self.tasks = tasks,
            Err(e) => {
                log::error!("failed to read task list: {e}");
                self.status_message = "Could not read the task list".to_string();
            }
        }
        let len = self.tasks.len();
        if len == 0 {
            self.table_state.select(None);
        } else if let Some(i) = self.table_state.selected() {
            if i >= len {
                self.table_state.select(Some(len - 1));
            }
        }
    }

    fn selected_task(&self) -> Option<&Task> {
        self.table_state.selected().and_then(|i| self.tasks.get(i))
    }

    fn select_next(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 < self.tasks.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let prev = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(prev));
    }

    /// Main event loop.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.expire_toast();
            terminal.draw(|f| self.render(f))?;
            self.handle_input()?;
            if self.should_exit {
                break;
            }
        }
        Ok(())
    }

    fn expire_toast(&mut self) {
        if let Some(toast) = &self.toast {
            if toast.shown_at.elapsed() > TOAST_TTL {
                self.toast = None;
            }
        }
    }

    /// Handle keyboard input based on current state.
    fn handle_input(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                match self.state {
                    AppState::TaskList => self.handle_task_list_input(key.code),
                    AppState::AddTask | AppState::EditTask => self.handle_form_input(key.code),
                    AppState::Confirm => self.handle_confirm_input(key.code),
                    AppState::Help => self.state = AppState::TaskList,
                }
            }
        }
        Ok(())
    }

    fn handle_task_list_input(&mut self, key: KeyCode) {
        self.status_message.clear();
        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_exit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char('a') => {
                self.editing = None;
                self.task_form = TaskForm::new();
                self.state = AppState::AddTask;
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(task) = self.selected_task().cloned() {
                    self.task_form = TaskForm::from_task(&task);
                    self.editing = Some(task);
                    self.state = AppState::EditTask;
                }
            }
            KeyCode::Char('d') => {
                if self.selected_task().is_some() {
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('r') => {
                self.refresh_tasks();
                self.status_message = "Tasks refreshed".to_string();
            }
            KeyCode::Char('?') => {
                self.state = AppState::Help;
            }
            _ => {}
        }
    }

    fn handle_form_input(&mut self, key: KeyCode) {
        // An open picker captures everything first.
        if let Some(picker) = self.task_form.visible_picker_mut() {
            match key {
                KeyCode::Esc => picker.cancel(),
                KeyCode::Left => picker.prev_segment(),
                KeyCode::Right => picker.next_segment(),
                KeyCode::Up => picker.adjust(true),
                KeyCode::Down => picker.adjust(false),
                KeyCode::Enter => self.task_form.confirm_picker(),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Esc => {
                self.state = AppState::TaskList;
                self.editing = None;
            }
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => match self.task_form.current_field {
                START_DATE_FIELD | END_DATE_FIELD => self.task_form.open_picker(),
                _ => self.submit_form(),
            },
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(task) = self.selected_task().cloned() {
                    match self.store.remove(&task.id) {
                        Ok(_) => {
                            self.status_message = format!("Deleted '{}'", task.title);
                            self.refresh_tasks();
                        }
                        Err(e) => {
                            log::error!("failed to delete task: {e}");
                            self.status_message = "Error deleting task".to_string();
                        }
                    }
                }
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.state = AppState::TaskList;
            }
            _ => {}
        }
    }

    /// Build a `TaskEditor` from the form and run the submit routine.
    fn submit_form(&mut self) {
        let mut editor = match &self.editing {
            Some(task) => TaskEditor::edit(task.clone()),
            None => TaskEditor::create(),
        };
        editor.title = self.task_form.title.value.clone();
        editor.start_date = self.task_form.start_date.clone();
        editor.end_date = self.task_form.end_date.clone();
        editor.status = self.task_form.selected_status();

        let mut shell = TuiShell::default();
        editor.submit(&mut self.store, &mut shell);

        if let Some((severity, title, body)) = shell.notice {
            self.toast = Some(Toast {
                severity,
                title,
                body,
                shown_at: Instant::now(),
            });
        }
        if shell.destination == Some(Destination::TaskList) {
            self.state = AppState::TaskList;
            self.editing = None;
            self.refresh_tasks();
        }
    }

    fn screen_title(&self) -> &'static str {
        match self.state {
            AppState::AddTask => "Add Task",
            AppState::EditTask => "Update Task",
            _ => "Tasks",
        }
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(f.area());

        let header = Paragraph::new(format!(" taskpad — {}", self.screen_title()))
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(header, chunks[0]);

        match self.state {
            AppState::TaskList | AppState::Confirm => self.render_task_list(f, chunks[1]),
            AppState::AddTask | AppState::EditTask => self.render_task_form(f, chunks[1]),
            AppState::Help => {
                self.render_task_list(f, chunks[1]);
                self.render_help(f, chunks[1]);
            }
        }
        if self.state == AppState::Confirm {
            self.render_confirm(f, chunks[1]);
        }

        self.render_status_bar(f, chunks[2]);
        self.render_toast(f, f.area());
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        if self.tasks.is_empty() {
            let empty = Paragraph::new("No tasks yet. Press 'a' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Task List"));
            f.render_widget(empty, area);
            return;
        }

        let rows: Vec<Row> = self
            .tasks
            .iter()
            .map(|t| {
                let style = if t.status == Status::Closed {
                    Style::default().fg(DIM_GREY)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    t.title.clone(),
                    t.start_date.clone(),
                    t.end_date.clone(),
                    format_status(t.status).to_string(),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(22),
                Constraint::Percentage(22),
                Constraint::Percentage(16),
            ],
        )
        .header(
            Row::new(vec!["Title", "Start", "End", "Status"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .row_highlight_style(Style::default().fg(GOLD).add_modifier(Modifier::BOLD))
        .highlight_symbol("» ")
        .block(Block::default().borders(Borders::ALL).title("Task List"));

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_task_form(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Start Date
                Constraint::Length(3), // End Date
                Constraint::Length(3), // Status
                Constraint::Min(1),    // Instructions
            ])
            .split(area);

        let field_style = |field: usize| {
            if self.task_form.current_field == field {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            }
        };

        let title_input = Paragraph::new(self.task_form.title.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Task Title *")
                .border_style(field_style(TITLE_FIELD)),
        );
        f.render_widget(title_input, chunks[0]);

        let start_text = if self.task_form.start_date.is_empty() {
            "Enter to pick…".to_string()
        } else {
            self.task_form.start_date.clone()
        };
        let start_input = Paragraph::new(start_text).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Start Date *")
                .border_style(field_style(START_DATE_FIELD)),
        );
        f.render_widget(start_input, chunks[1]);

        let end_text = if self.task_form.end_date.is_empty() {
            "Enter to pick…".to_string()
        } else {
            self.task_form.end_date.clone()
        };
        let end_input = Paragraph::new(end_text).block(
            Block::default()
                .borders(Borders::ALL)
                .title("End Date *")
                .border_style(field_style(END_DATE_FIELD)),
        );
        f.render_widget(end_input, chunks[2]);

        let status_text = match self.task_form.selected_status() {
            Some(s) => format!("< {} >", format_status(s)),
            None => "< - >".to_string(),
        };
        let status_selector = Paragraph::new(status_text).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Status *")
                .border_style(field_style(STATUS_FIELD)),
        );
        f.render_widget(status_selector, chunks[3]);

        let save_label = match &self.editing {
            Some(_) => "Update Task",
            None => "Save Task",
        };
        let instructions = Paragraph::new(vec![
            Line::default(),
            Line::from(vec![
                Span::styled("Enter", Style::default().fg(GOLD)),
                Span::raw(format!(
                    " {} (on dates: open picker)   ",
                    save_label
                )),
                Span::styled("Tab/↑↓", Style::default().fg(GOLD)),
                Span::raw(" fields   "),
                Span::styled("Esc", Style::default().fg(GOLD)),
                Span::raw(" cancel"),
            ]),
        ]);
        f.render_widget(instructions, chunks[4]);

        if self.task_form.start_picker.visible {
            self.task_form.start_picker.render(f, area, "Start Date");
        } else if self.task_form.end_picker.visible {
            self.task_form.end_picker.render(f, area, "End Date");
        }
    }

    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let title = self
            .selected_task()
            .map(|t| t.title.clone())
            .unwrap_or_default();
        let popup = centered_rect(50, 20, area);
        f.render_widget(Clear, popup);
        let dialog = Paragraph::new(vec![
            Line::default(),
            Line::from(format!("Delete '{title}'?")),
            Line::default(),
            Line::from("Press Y to confirm, N or Esc to cancel"),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Confirm"));
        f.render_widget(dialog, popup);
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 50, area);
        f.render_widget(Clear, popup);
        let help = Paragraph::new(vec![
            Line::default(),
            Line::from("a        add a task"),
            Line::from("Enter/e  edit the selected task"),
            Line::from("d        delete the selected task"),
            Line::from("r        reload from storage"),
            Line::from("↑↓/jk    move selection"),
            Line::from("q/Esc    quit"),
            Line::default(),
            Line::from("Press any key to return"),
        ])
        .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(help, popup);
    }

    /// Render the status bar with context-appropriate help text.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => {
                    "a add  Enter edit  d delete  r refresh  ? help  q quit".to_string()
                }
                AppState::AddTask | AppState::EditTask => {
                    "Tab next field  Enter save/pick  Esc cancel".to_string()
                }
                AppState::Confirm => "Y confirm  N cancel".to_string(),
                AppState::Help => "Press any key to return".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Render the active toast near the top-right corner.
    fn render_toast(&mut self, f: &mut Frame, area: Rect) {
        let Some(toast) = &self.toast else {
            return;
        };
        let bg = match toast.severity {
            Severity::Info => STEEL_BLUE,
            Severity::Success => DARK_GREEN,
        };
        let mut lines = vec![Line::from(toast.title.clone())];
        if !toast.body.is_empty() {
            lines.push(Line::from(toast.body.clone()));
        }
        let height = lines.len() as u16 + 2;
        let width = lines
            .iter()
            .map(|l| l.width() as u16)
            .max()
            .unwrap_or(0)
            .max(20)
            + 4;
        let popup = toast_rect(area, width, height);
        f.render_widget(Clear, popup);
        let toast_widget = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(bg).fg(Color::White))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(toast_widget, popup);
    }
}
