//! Error taxonomy for the task store.
//!
//! Three kinds of failure reach callers: bad input (`Validation`), a
//! reference to a task that does not exist (`NotFound`), and trouble with the
//! backing database (`Storage`). The store validates before writing, so a
//! validation failure never leaves a partial record behind.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaskError>;

/// Any failure a store operation can produce.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Input was rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The given task ID does not exist.
    #[error("no task with id {0}")]
    NotFound(i64),

    /// The backing SQLite database failed.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Input rejected by the store's field checks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("{field} must be between 1 and 5, got {value}")]
    ScaleOutOfRange { field: &'static str, value: i64 },

    #[error("unknown status '{0}' (expected: to do, doing, done)")]
    UnknownStatus(String),
}

impl TaskError {
    /// True for input errors the caller could fix and retry.
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation(_))
    }
}
