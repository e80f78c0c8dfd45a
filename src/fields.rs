//! Field types and display helpers for tasks.
//!
//! Defines the closed lifecycle status set, the 1-5 urgency/importance scale
//! checks, and the label mappings the CLI uses when rendering tasks.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Task lifecycle status. One closed set, validated everywhere text enters
/// the system; any state may move to any other state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[serde(alias = "to do")]
    ToDo,
    Doing,
    Done,
}

impl Status {
    /// All states in lifecycle order, used for grouped listings.
    pub const ALL: [Status; 3] = [Status::ToDo, Status::Doing, Status::Done];

    /// Status assigned to newly created tasks.
    pub fn initial() -> Status {
        Status::ToDo
    }

    /// Canonical text form, also the value stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::ToDo => "to do",
            Status::Doing => "doing",
            Status::Done => "done",
        }
    }
}

/// Parse status text, accepting the canonical form plus hyphen/underscore
/// spellings ("to-do", "to_do", "todo"). Anything else is rejected.
pub fn parse_status(s: &str) -> Result<Status, ValidationError> {
    match s.trim().to_lowercase().as_str() {
        "to do" | "to-do" | "to_do" | "todo" => Ok(Status::ToDo),
        "doing" => Ok(Status::Doing),
        "done" => Ok(Status::Done),
        other => Err(ValidationError::UnknownStatus(other.to_string())),
    }
}

/// Check an urgency/importance value against the closed 1..=5 range.
pub fn validate_scale(field: &'static str, value: u8) -> Result<(), ValidationError> {
    if (1..=5).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::ScaleOutOfRange { field, value: value as i64 })
    }
}

/// Descriptive label for a 1-5 scale value.
pub fn scale_label(value: u8) -> &'static str {
    match value {
        1 => "Very Low",
        2 => "Low",
        3 => "Moderate",
        4 => "High",
        5 => "Very High",
        _ => "Unknown",
    }
}

/// Format a status for section headers ("To Do", "Doing", "Done").
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::ToDo => "To Do",
        Status::Doing => "Doing",
        Status::Done => "Done",
    }
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKey {
    Priority,
    Id,
}
