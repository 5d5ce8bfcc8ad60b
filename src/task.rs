//! Task data structure and related functionality.
//!
//! This module defines the `Task` struct that represents a single to-do item
//! with its timing window and completion status, plus the `Status` enum and
//! identifier generation.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do item.
///
/// Serialized field names are camelCase to stay compatible with task lists
/// written by earlier versions of the app. Dates are stored as the string the
/// picker produced (`YYYY-MM-DDTHH:MM`); they are treated as opaque text
/// everywhere except inside the picker itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub start_date: String,
    pub end_date: String,
    pub status: Status,
}

/// Task completion status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Progress,
    Pending,
    Closed,
}

/// All statuses in dropdown order.
pub const ALL_STATUSES: [Status; 4] = [
    Status::Open,
    Status::Progress,
    Status::Pending,
    Status::Closed,
];

/// Format a task status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Open => "Open",
        Status::Progress => "Progress",
        Status::Pending => "Pending",
        Status::Closed => "Closed",
    }
}

/// Generate a fresh collision-resistant task identifier.
pub fn new_task_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_serializes_with_camel_case_keys() {
        let task = Task {
            id: "a1".into(),
            title: "Buy milk".into(),
            start_date: "2024-01-01T09:00".into(),
            end_date: "2024-01-01T10:00".into(),
            status: Status::Open,
        };
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"startDate\":\"2024-01-01T09:00\""));
        assert!(json.contains("\"endDate\":\"2024-01-01T10:00\""));
        assert!(json.contains("\"status\":\"open\""));
    }

    #[test]
    fn test_status_round_trips_lowercase() {
        for s in ALL_STATUSES {
            let json = serde_json::to_string(&s).unwrap();
            assert_eq!(json, json.to_lowercase());
            let back: Status = serde_json::from_str(&json).unwrap();
            assert_eq!(back, s);
        }
        let s: Status = serde_json::from_str("\"progress\"").unwrap();
        assert_eq!(s, Status::Progress);
    }

    #[test]
    fn test_new_task_ids_are_unique() {
        let a = new_task_id();
        let b = new_task_id();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }
}
