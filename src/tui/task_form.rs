//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure for creating and editing
//! tasks: the four fields in visual order, focus cycling, the status
//! selector, and the two modal date pickers.

use crate::task::{Status, Task, ALL_STATUSES};
use crate::tui::date_picker::DatePicker;
use crate::tui::input::InputField;

/// Order constants for the form fields.
pub const TITLE_FIELD: usize = 0;
pub const START_DATE_FIELD: usize = 1;
pub const END_DATE_FIELD: usize = 2;
pub const STATUS_FIELD: usize = 3;

const FIELD_COUNT: usize = 4;

/// Task form for editing fields.
pub struct TaskForm {
    pub title: InputField,
    pub start_date: String,
    pub end_date: String,
    /// Index into `statuses`; 0 is "not selected".
    pub status: usize,
    pub statuses: Vec<Option<Status>>,
    pub current_field: usize,
    pub start_picker: DatePicker,
    pub end_picker: DatePicker,
}

impl TaskForm {
    /// Create an empty form with no status selected.
    pub fn new() -> Self {
        let mut statuses: Vec<Option<Status>> = vec![None];
        statuses.extend(ALL_STATUSES.iter().copied().map(Some));

        let mut form = TaskForm {
            title: InputField::new(),
            start_date: String::new(),
            end_date: String::new(),
            status: 0,
            statuses,
            current_field: TITLE_FIELD,
            start_picker: DatePicker::new(),
            end_picker: DatePicker::new(),
        };
        form.title.active = true;
        form
    }

    /// Create a form populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        let mut form = TaskForm::new();
        form.title = InputField::with_value(&task.title);
        form.title.active = true;
        form.start_date = task.start_date.clone();
        form.end_date = task.end_date.clone();
        form.status = form
            .statuses
            .iter()
            .position(|s| *s == Some(task.status))
            .unwrap_or(0);
        form
    }

    /// The status chosen in the selector, if any.
    pub fn selected_status(&self) -> Option<Status> {
        self.statuses.get(self.status).copied().flatten()
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_FIELD;
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        if self.current_field == TITLE_FIELD {
            self.title.handle_char(c);
        }
    }

    /// Handle backspace for the currently active field.
    pub fn handle_backspace(&mut self) {
        if self.current_field == TITLE_FIELD {
            self.title.handle_backspace();
        }
    }

    /// Handle delete for the currently active field.
    pub fn handle_delete(&mut self) {
        if self.current_field == TITLE_FIELD {
            self.title.handle_delete();
        }
    }

    /// Handle left/right arrows: cursor movement on the title, cycling on
    /// the status selector.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            TITLE_FIELD => {
                if right {
                    self.title.move_cursor_right()
                } else {
                    self.title.move_cursor_left()
                }
            }
            STATUS_FIELD => {
                if right {
                    self.status = (self.status + 1) % self.statuses.len();
                } else {
                    self.status = if self.status == 0 {
                        self.statuses.len() - 1
                    } else {
                        self.status - 1
                    };
                }
            }
            _ => {}
        }
    }

    /// The picker currently shown, if either is open.
    pub fn visible_picker_mut(&mut self) -> Option<&mut DatePicker> {
        if self.start_picker.visible {
            Some(&mut self.start_picker)
        } else if self.end_picker.visible {
            Some(&mut self.end_picker)
        } else {
            None
        }
    }

    /// Open the picker belonging to the focused date field, seeded with the
    /// field's current value. Does nothing on other fields.
    pub fn open_picker(&mut self) {
        match self.current_field {
            START_DATE_FIELD => self.start_picker.open(&self.start_date),
            END_DATE_FIELD => self.end_picker.open(&self.end_date),
            _ => {}
        }
    }

    /// Confirm the open picker into its field and close it.
    pub fn confirm_picker(&mut self) {
        if self.start_picker.visible {
            self.start_date = self.start_picker.confirm();
        } else if self.end_picker.visible {
            self.end_date = self.end_picker.confirm();
        }
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        TaskForm::new()
    }
}
