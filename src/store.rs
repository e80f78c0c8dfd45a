//! SQLite-backed task store.
//!
//! Sole owner of task records: every mutation is validated here before it
//! touches the database, and every read comes back in a stable id order.
//! Each operation is a short-lived unit of work; multi-statement operations
//! run inside a single transaction so a failure leaves no partial effect.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, TaskError, ValidationError};
use crate::fields::{parse_status, validate_scale, Status};
use crate::task::{NewTask, Task, TaskPatch};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    note TEXT,
    urgency INTEGER NOT NULL,
    importance INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'to do',
    created_at_utc INTEGER NOT NULL,
    updated_at_utc INTEGER NOT NULL
)";

const SELECT_COLUMNS: &str =
    "SELECT id, title, note, urgency, importance, status, created_at_utc, updated_at_utc
     FROM tasks";

/// Task store over a single SQLite table.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Store { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open a throwaway in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Store { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Ensure the tasks table exists. Idempotent; existing rows are kept.
    pub fn initialize(&self) -> Result<()> {
        self.conn.execute(SCHEMA, [])?;
        Ok(())
    }

    /// Create a task. The store assigns the id (SQLite autoincrement), the
    /// initial status, and both timestamps.
    pub fn add_task(&mut self, new: NewTask) -> Result<Task> {
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        validate_scale("urgency", new.urgency)?;
        validate_scale("importance", new.importance)?;
        let note = normalise_note(new.note);

        let now = Utc::now().timestamp();
        let status = Status::initial();
        self.conn.execute(
            "INSERT INTO tasks (title, note, urgency, importance, status, created_at_utc, updated_at_utc)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![title, note, new.urgency, new.importance, status.as_str(), now],
        )?;
        let id = self.conn.last_insert_rowid();

        Ok(Task {
            id,
            title,
            note,
            urgency: new.urgency,
            importance: new.importance,
            status,
            created_at_utc: now,
            updated_at_utc: now,
        })
    }

    /// The full working set, ordered by id ascending. Callers re-sort for
    /// display (e.g. by priority score).
    pub fn get_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
        let rows = stmt.query_map([], task_from_row)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Fetch one task by id.
    pub fn get_task(&self, id: i64) -> Result<Task> {
        self.conn
            .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), params![id], task_from_row)
            .optional()?
            .ok_or(TaskError::NotFound(id))
    }

    /// Move a task to a new lifecycle state. Only `status` and
    /// `updated_at_utc` change; any state may move to any other state.
    pub fn update_task_status(&mut self, id: i64, status: Status) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = ?1, updated_at_utc = ?2 WHERE id = ?3",
            params![status.as_str(), Utc::now().timestamp(), id],
        )?;
        if changed == 0 {
            return Err(TaskError::NotFound(id));
        }
        Ok(())
    }

    /// Apply a partial edit to a task's details. Omitted fields keep their
    /// previous values; `status` is never touched here. Read, merge and
    /// write happen in one transaction.
    pub fn update_task_details(&mut self, id: i64, patch: TaskPatch) -> Result<()> {
        if let Some(ref title) = patch.title {
            if title.trim().is_empty() {
                return Err(ValidationError::EmptyTitle.into());
            }
        }
        if let Some(u) = patch.urgency {
            validate_scale("urgency", u)?;
        }
        if let Some(i) = patch.importance {
            validate_scale("importance", i)?;
        }

        let tx = self.conn.transaction()?;
        let current = tx
            .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), params![id], task_from_row)
            .optional()?
            .ok_or(TaskError::NotFound(id))?;

        let title = patch.title.map(|t| t.trim().to_string()).unwrap_or(current.title);
        let note = match patch.note {
            Some(n) => normalise_note(Some(n)),
            None => current.note,
        };
        let urgency = patch.urgency.unwrap_or(current.urgency);
        let importance = patch.importance.unwrap_or(current.importance);

        tx.execute(
            "UPDATE tasks SET title = ?1, note = ?2, urgency = ?3, importance = ?4, updated_at_utc = ?5
             WHERE id = ?6",
            params![title, note, urgency, importance, Utc::now().timestamp(), id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Remove a task permanently. Deleting a missing id is an error, not a
    /// no-op.
    pub fn delete_task(&mut self, id: i64) -> Result<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(TaskError::NotFound(id));
        }
        Ok(())
    }

    /// Destroy all tasks and recreate the empty table. Drop and recreate run
    /// in one transaction, so a failed recreate rolls the drop back instead
    /// of leaving the store ambiguous. Dropping the table also resets the id
    /// sequence, so the next task gets id 1.
    pub fn reset(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DROP TABLE IF EXISTS tasks", [])?;
        tx.execute(SCHEMA, [])?;
        tx.commit()?;
        Ok(())
    }
}

/// Empty or whitespace-only notes are stored as NULL.
fn normalise_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Map a database row to a `Task`. Status text that is not in the configured
/// set means the row is corrupt, which surfaces as a storage error rather
/// than a validation error.
fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let status_text: String = row.get(5)?;
    let status = parse_status(&status_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        note: row.get(2)?,
        urgency: row.get(3)?,
        importance: row.get(4)?,
        status,
        created_at_utc: row.get(6)?,
        updated_at_utc: row.get(7)?,
    })
}
