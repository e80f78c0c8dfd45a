//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct that represents a single
//! tracked item, plus the parameter structs the store accepts for creation
//! and partial update.

use serde::{Deserialize, Serialize};

use crate::fields::Status;

/// A single tracked to-do item.
///
/// `urgency` and `importance` are raw 1-5 integers; any label or threshold
/// mapping happens at the presentation layer. Timestamps are UTC epoch
/// seconds; `updated_at_utc` is refreshed by every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub note: Option<String>,
    pub urgency: u8,
    pub importance: u8,
    pub status: Status,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

impl Task {
    /// Eisenhower-style ranking value: urgency times importance. Derived on
    /// read, never persisted.
    pub fn priority_score(&self) -> u16 {
        self.urgency as u16 * self.importance as u16
    }
}

/// Fields accepted when creating a task. The store assigns id, status and
/// timestamps itself.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub note: Option<String>,
    pub urgency: u8,
    pub importance: u8,
}

/// Partial update for a task's details. `None` leaves a field untouched;
/// status changes go through `update_task_status` instead.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub note: Option<String>,
    pub urgency: Option<u8>,
    pub importance: Option<u8>,
}

impl TaskPatch {
    /// True when no field is set. The CLI checks this before calling the
    /// store so a bare `edit` gives feedback instead of a timestamp bump.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.note.is_none()
            && self.urgency.is_none()
            && self.importance.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, urgency: u8, importance: u8) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            note: None,
            urgency,
            importance,
            status: Status::ToDo,
            created_at_utc: 0,
            updated_at_utc: 0,
        }
    }

    #[test]
    fn test_priority_score() {
        assert_eq!(task(1, 5, 4).priority_score(), 20);
        assert_eq!(task(2, 1, 1).priority_score(), 1);
        assert_eq!(task(3, 5, 5).priority_score(), 25);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(TaskPatch::default().is_empty());
        let patch = TaskPatch { urgency: Some(2), ..Default::default() };
        assert!(!patch.is_empty());
    }
}
