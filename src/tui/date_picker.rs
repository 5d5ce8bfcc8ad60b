//! Modal date-time picker for the task form.
//!
//! One picker instance backs each of the start and end date fields. While
//! visible it captures all form input: left/right move between the
//! year/month/day/hour/minute segments, up/down adjust the active segment,
//! Enter confirms the selection into the field and Esc closes the modal
//! without touching it.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, Timelike};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::colors::GOLD;
use crate::tui::utils::centered_rect;

/// Serialization format for picked date-times.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// The segment of the date currently being adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Year,
    Month,
    Day,
    Hour,
    Minute,
}

const SEGMENTS: [Segment; 5] = [
    Segment::Year,
    Segment::Month,
    Segment::Day,
    Segment::Hour,
    Segment::Minute,
];

/// Modal picker state for one date field.
pub struct DatePicker {
    pub visible: bool,
    segment: usize,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
}

impl DatePicker {
    /// Create a hidden picker seeded with the current local time.
    pub fn new() -> Self {
        let now = Local::now().naive_local();
        let mut picker = DatePicker {
            visible: false,
            segment: 0,
            year: 0,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
        };
        picker.set(now);
        picker
    }

    fn set(&mut self, dt: NaiveDateTime) {
        self.year = dt.year();
        self.month = dt.month();
        self.day = dt.day();
        self.hour = dt.hour();
        self.minute = dt.minute();
    }

    /// Open the modal, seeding from the field's current value when it parses.
    pub fn open(&mut self, current: &str) {
        if let Ok(dt) = NaiveDateTime::parse_from_str(current.trim(), DATE_FORMAT) {
            self.set(dt);
        } else {
            self.set(Local::now().naive_local());
        }
        self.segment = 0;
        self.visible = true;
    }

    /// Close the modal without producing a value.
    pub fn cancel(&mut self) {
        self.visible = false;
    }

    /// Close the modal and return the selected date-time string.
    pub fn confirm(&mut self) -> String {
        self.visible = false;
        self.value()
    }

    /// The current selection serialized in `DATE_FORMAT`.
    pub fn value(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }

    /// Move to the next segment (wrapping).
    pub fn next_segment(&mut self) {
        self.segment = (self.segment + 1) % SEGMENTS.len();
    }

    /// Move to the previous segment (wrapping).
    pub fn prev_segment(&mut self) {
        self.segment = if self.segment == 0 {
            SEGMENTS.len() - 1
        } else {
            self.segment - 1
        };
    }

    /// Adjust the active segment up or down, keeping the date valid.
    pub fn adjust(&mut self, up: bool) {
        match SEGMENTS[self.segment] {
            Segment::Year => {
                self.year = if up {
                    (self.year + 1).min(9999)
                } else {
                    (self.year - 1).max(1970)
                };
            }
            Segment::Month => {
                self.month = cycle(self.month, 1, 12, up);
            }
            Segment::Day => {
                self.day = cycle(self.day, 1, days_in_month(self.year, self.month), up);
            }
            Segment::Hour => {
                self.hour = cycle(self.hour, 0, 23, up);
            }
            Segment::Minute => {
                self.minute = cycle(self.minute, 0, 59, up);
            }
        }
        // Changing year or month can invalidate the day (e.g. Jan 31 -> Feb).
        self.day = self.day.min(days_in_month(self.year, self.month));
    }

    /// Render the picker as a centered modal over `area`.
    pub fn render(&self, f: &mut Frame, area: Rect, title: &str) {
        let popup = centered_rect(44, 20, area);
        f.render_widget(Clear, popup);

        let active = Style::default().fg(GOLD).add_modifier(Modifier::BOLD);
        let plain = Style::default();
        let style_for = |s: Segment| {
            if SEGMENTS[self.segment] == s {
                active
            } else {
                plain
            }
        };

        let value_line = Line::from(vec![
            Span::styled(format!("{:04}", self.year), style_for(Segment::Year)),
            Span::raw("-"),
            Span::styled(format!("{:02}", self.month), style_for(Segment::Month)),
            Span::raw("-"),
            Span::styled(format!("{:02}", self.day), style_for(Segment::Day)),
            Span::raw("  "),
            Span::styled(format!("{:02}", self.hour), style_for(Segment::Hour)),
            Span::raw(":"),
            Span::styled(format!("{:02}", self.minute), style_for(Segment::Minute)),
        ]);
        let hint_line = Line::from("←→ segment  ↑↓ adjust  Enter confirm  Esc cancel");

        let body = Paragraph::new(vec![Line::default(), value_line, Line::default(), hint_line])
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string()),
            );
        f.render_widget(body, popup);
    }
}

impl Default for DatePicker {
    fn default() -> Self {
        DatePicker::new()
    }
}

fn cycle(value: u32, min: u32, max: u32, up: bool) -> u32 {
    if up {
        if value >= max {
            min
        } else {
            value + 1
        }
    } else if value <= min {
        max
    } else {
        value - 1
    }
}

/// Number of days in the given month.
fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker_at(value: &str) -> DatePicker {
        let mut p = DatePicker::new();
        p.open(value);
        p
    }

    #[test]
    fn test_open_seeds_from_existing_field_value() {
        let p = picker_at("2024-01-01T09:00");
        assert!(p.visible);
        assert_eq!(p.value(), "2024-01-01T09:00");
    }

    #[test]
    fn test_confirm_closes_and_formats() {
        let mut p = picker_at("2024-06-15T23:59");
        let value = p.confirm();
        assert!(!p.visible);
        assert_eq!(value, "2024-06-15T23:59");
    }

    #[test]
    fn test_cancel_closes_without_value() {
        let mut p = picker_at("2024-06-15T10:30");
        p.cancel();
        assert!(!p.visible);
    }

    #[test]
    fn test_adjust_wraps_month_and_minute() {
        let mut p = picker_at("2024-12-15T10:59");
        p.next_segment(); // month
        p.adjust(true);
        assert_eq!(p.value(), "2024-01-15T10:59");

        let mut p = picker_at("2024-12-15T10:59");
        for _ in 0..4 {
            p.next_segment();
        }
        p.adjust(true); // minute wraps to 00
        assert_eq!(p.value(), "2024-12-15T10:00");
    }

    #[test]
    fn test_day_is_clamped_when_month_shrinks() {
        let mut p = picker_at("2024-01-31T12:00");
        p.next_segment(); // month
        p.adjust(true); // -> February, leap year
        assert_eq!(p.value(), "2024-02-29T12:00");

        let mut p = picker_at("2023-01-31T12:00");
        p.next_segment();
        p.adjust(true);
        assert_eq!(p.value(), "2023-02-28T12:00");
    }

    #[test]
    fn test_day_wraps_within_month_length() {
        let mut p = picker_at("2024-04-30T08:00");
        p.next_segment();
        p.next_segment(); // day
        p.adjust(true);
        assert_eq!(p.value(), "2024-04-01T08:00");
    }
}
