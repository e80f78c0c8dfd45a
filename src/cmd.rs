//! Command implementations for the CLI interface.
//!
//! This module contains all the command handlers: thin presentation wrappers
//! around the task store. Handlers print for humans and exit non-zero on
//! store errors; they never reach into the database themselves.

use std::cmp::Reverse;
use std::fs;
use std::io;

use chrono::{Local, NaiveDate, TimeZone};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::error::TaskError;
use crate::fields::{format_status, scale_label, SortKey, Status};
use crate::store::Store;
use crate::task::{NewTask, Task, TaskPatch};

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional free-text note.
        #[arg(long)]
        note: Option<String>,
        /// Urgency, 1 (very low) to 5 (very high).
        #[arg(long, default_value_t = 3)]
        urgency: u8,
        /// Importance, 1 (very low) to 5 (very high).
        #[arg(long, default_value_t = 3)]
        importance: u8,
    },

    /// List tasks grouped by status.
    List {
        /// Show only one status group.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Sort key within each group.
        #[arg(long, value_enum, default_value_t = SortKey::Priority)]
        sort: SortKey,
    },

    /// View a single task in full.
    View {
        /// Task ID to view.
        id: i64,
    },

    /// Set a task's status.
    Status {
        /// Task ID to update.
        id: i64,
        /// New status: to-do | doing | done.
        #[arg(value_enum)]
        status: Status,
    },

    /// Mark a task done.
    Complete {
        /// Task ID to complete.
        id: i64,
    },

    /// Move a task back to "to do".
    Reopen {
        /// Task ID to reopen.
        id: i64,
    },

    /// Update fields on a task. Only the flags you pass change.
    Edit {
        /// Task ID to update.
        id: i64,
        #[arg(long)]
        title: Option<String>,
        /// New note; pass an empty string to clear it.
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        urgency: Option<u8>,
        #[arg(long)]
        importance: Option<u8>,
    },

    /// Delete a task by ID.
    Delete {
        /// Task ID to delete.
        id: i64,
    },

    /// Delete every task and start over. Irreversible.
    Reset {
        /// Required confirmation flag.
        #[arg(long)]
        force: bool,
    },

    /// Show counts by status and urgency, plus today's completions.
    Summary,

    /// Export all tasks as JSON.
    Export {
        /// Output file path (default: stdout).
        #[arg(long, short)]
        output: Option<String>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Add a new task to the store.
pub fn cmd_add(store: &mut Store, title: String, note: Option<String>, urgency: u8, importance: u8) {
    match store.add_task(NewTask { title, note, urgency, importance }) {
        Ok(task) => println!("Added task {} (priority {})", task.id, task.priority_score()),
        Err(e) => fail(e),
    }
}

/// List tasks grouped by status, each group sorted for display.
pub fn cmd_list(store: &Store, status: Option<Status>, sort: SortKey) {
    let tasks = match store.get_tasks() {
        Ok(t) => t,
        Err(e) => fail(e),
    };
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let groups: Vec<Status> = match status {
        Some(s) => vec![s],
        None => Status::ALL.to_vec(),
    };
    for group in groups {
        let mut rows: Vec<&Task> = tasks.iter().filter(|t| t.status == group).collect();
        println!("{}", format_status(group));
        if rows.is_empty() {
            println!("  (none)");
        } else {
            sort_for_display(&mut rows, sort);
            print_table(&rows);
        }
        println!();
    }
}

/// Show one task in full detail.
pub fn cmd_view(store: &Store, id: i64) {
    let task = match store.get_task(id) {
        Ok(t) => t,
        Err(e) => fail(e),
    };
    println!("Task {}: {}", task.id, task.title);
    if let Some(ref note) = task.note {
        println!("  Note:       {note}");
    }
    println!("  Status:     {}", format_status(task.status));
    println!("  Urgency:    {} ({})", task.urgency, scale_label(task.urgency));
    println!("  Importance: {} ({})", task.importance, scale_label(task.importance));
    println!("  Priority:   {}", task.priority_score());
    println!("  Created:    {}", format_timestamp(task.created_at_utc));
    println!("  Updated:    {}", format_timestamp(task.updated_at_utc));
}

/// Move a task to a new status.
pub fn cmd_status(store: &mut Store, id: i64, status: Status) {
    if let Err(e) = store.update_task_status(id, status) {
        fail(e);
    }
    println!("Task {} is now {}", id, status.as_str());
}

/// Update details on a task.
pub fn cmd_edit(
    store: &mut Store,
    id: i64,
    title: Option<String>,
    note: Option<String>,
    urgency: Option<u8>,
    importance: Option<u8>,
) {
    let patch = TaskPatch { title, note, urgency, importance };
    if patch.is_empty() {
        eprintln!("Nothing to change. Pass at least one of --title, --note, --urgency, --importance.");
        std::process::exit(1);
    }
    if let Err(e) = store.update_task_details(id, patch) {
        fail(e);
    }
    println!("Updated task {id}");
}

/// Delete a task.
pub fn cmd_delete(store: &mut Store, id: i64) {
    if let Err(e) = store.delete_task(id) {
        fail(e);
    }
    println!("Deleted task {id}");
}

/// Wipe the store. Requires --force.
pub fn cmd_reset(store: &mut Store, force: bool) {
    if !force {
        eprintln!("Refusing to reset without --force. This permanently deletes every task.");
        std::process::exit(1);
    }
    if let Err(e) = store.reset() {
        fail(e);
    }
    println!("Store reset. All tasks deleted.");
}

/// Print the textual analytics summary.
pub fn cmd_summary(store: &Store) {
    let tasks = match store.get_tasks() {
        Ok(t) => t,
        Err(e) => fail(e),
    };
    let summary = summarise(&tasks, Local::now().date_naive());

    println!("Tasks: {}", summary.total);
    for (status, count) in summary.by_status {
        println!("  {:<6} {}", format_status(status), count);
    }
    println!("By urgency:");
    for (level, count) in summary.by_urgency.iter().enumerate() {
        println!("  {:<10} {}", scale_label(level as u8 + 1), count);
    }
    println!("Completed today: {}", summary.completed_today);
}

/// Export all tasks as pretty-printed JSON.
pub fn cmd_export(store: &Store, output: Option<String>) {
    let tasks = match store.get_tasks() {
        Ok(t) => t,
        Err(e) => fail(e),
    };
    let json = match serde_json::to_string_pretty(&tasks) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Failed to serialise tasks: {e}");
            std::process::exit(1);
        }
    };
    match output {
        Some(path) => {
            if let Err(e) = fs::write(&path, json) {
                eprintln!("Failed to write {path}: {e}");
                std::process::exit(1);
            }
            println!("Exported {} tasks to {}", tasks.len(), path);
        }
        None => println!("{json}"),
    }
}

/// Generate shell completion scripts for the given shell.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "todoo", &mut io::stdout());
}

/// Print a store error and exit non-zero.
fn fail(e: TaskError) -> ! {
    eprintln!("{e}");
    std::process::exit(1)
}

/// Display-time ordering: priority score descending with id ascending as the
/// tiebreak, or plain id order.
pub fn sort_for_display(tasks: &mut [&Task], sort: SortKey) {
    match sort {
        SortKey::Priority => tasks.sort_by_key(|t| (Reverse(t.priority_score()), t.id)),
        SortKey::Id => tasks.sort_by_key(|t| t.id),
    }
}

/// Print tasks in a formatted table.
fn print_table(tasks: &[&Task]) {
    println!(
        "  {:<5} {:<4} {:<4} {:<6} {:<17} {}",
        "ID", "Urg", "Imp", "Score", "Updated", "Title [note]"
    );
    for t in tasks {
        let note = match t.note {
            Some(ref n) => format!(" [{n}]"),
            None => String::new(),
        };
        println!(
            "  {:<5} {:<4} {:<4} {:<6} {:<17} {}{}",
            t.id,
            t.urgency,
            t.importance,
            t.priority_score(),
            format_timestamp(t.updated_at_utc),
            t.title,
            note
        );
    }
}

/// Format an epoch-seconds timestamp in local time.
fn format_timestamp(ts: i64) -> String {
    match Local.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Aggregates for the summary command, computed here from the full task set
/// rather than in the store.
pub struct Summary {
    pub total: usize,
    pub by_status: [(Status, usize); 3],
    pub by_urgency: [usize; 5],
    pub completed_today: usize,
}

/// Count tasks per status and urgency level, plus tasks marked done today
/// (by their local-time update date).
pub fn summarise(tasks: &[Task], today: NaiveDate) -> Summary {
    let mut by_status = [(Status::ToDo, 0), (Status::Doing, 0), (Status::Done, 0)];
    let mut by_urgency = [0usize; 5];
    let mut completed_today = 0;

    for t in tasks {
        for entry in by_status.iter_mut() {
            if entry.0 == t.status {
                entry.1 += 1;
            }
        }
        if (1..=5).contains(&t.urgency) {
            by_urgency[t.urgency as usize - 1] += 1;
        }
        if t.status == Status::Done {
            let updated = Local.timestamp_opt(t.updated_at_utc, 0).single();
            if updated.map(|dt| dt.date_naive()) == Some(today) {
                completed_today += 1;
            }
        }
    }

    Summary { total: tasks.len(), by_status, by_urgency, completed_today }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: i64, urgency: u8, importance: u8, status: Status, updated: i64) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            note: None,
            urgency,
            importance,
            status,
            created_at_utc: updated,
            updated_at_utc: updated,
        }
    }

    #[test]
    fn test_sort_by_priority_descending_with_id_tiebreak() {
        let a = task(1, 2, 3, Status::ToDo, 0); // score 6
        let b = task(2, 5, 4, Status::ToDo, 0); // score 20
        let c = task(3, 3, 2, Status::ToDo, 0); // score 6, ties with a
        let d = task(4, 5, 5, Status::ToDo, 0); // score 25

        let mut rows: Vec<&Task> = vec![&a, &b, &c, &d];
        sort_for_display(&mut rows, SortKey::Priority);
        let ids: Vec<i64> = rows.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 2, 1, 3]);

        // Repeated sorting is deterministic.
        let mut again: Vec<&Task> = vec![&d, &c, &b, &a];
        sort_for_display(&mut again, SortKey::Priority);
        assert_eq!(again.iter().map(|t| t.id).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_sort_by_id() {
        let a = task(3, 1, 1, Status::ToDo, 0);
        let b = task(1, 5, 5, Status::ToDo, 0);
        let mut rows: Vec<&Task> = vec![&a, &b];
        sort_for_display(&mut rows, SortKey::Id);
        assert_eq!(rows.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_summarise_counts() {
        let now = Utc::now().timestamp();
        let tasks = vec![
            task(1, 5, 5, Status::ToDo, now),
            task(2, 5, 1, Status::Doing, now),
            task(3, 2, 2, Status::Done, now),     // done today
            task(4, 2, 2, Status::Done, 86_400),  // done in 1970
        ];

        let summary = summarise(&tasks, Local::now().date_naive());
        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_status[0], (Status::ToDo, 1));
        assert_eq!(summary.by_status[1], (Status::Doing, 1));
        assert_eq!(summary.by_status[2], (Status::Done, 2));
        assert_eq!(summary.by_urgency, [0, 2, 0, 0, 2]);
        assert_eq!(summary.completed_today, 1);
    }
}
