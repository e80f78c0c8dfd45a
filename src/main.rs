//! # Todooolist - Personal Task Tracker CLI
//!
//! A small command-line task tracker built around the Eisenhower idea:
//! every task carries an urgency and an importance rating (1-5), and lists
//! are ranked by their product.
//!
//! ## Key Features
//!
//! - **One SQLite table**: durable local storage in `~/.todooolist/tasks.db`,
//!   no server, no sync.
//! - **Closed lifecycle**: `to do` → `doing` → `done`, with any transition
//!   allowed in either direction.
//! - **Priority ranking**: urgency x importance, computed at read time and
//!   used to order every listing.
//! - **Plain-text analytics**: status and urgency breakdowns plus a count of
//!   tasks finished today.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! todoo add "Write report" --urgency 5 --importance 4
//!
//! # See the board, grouped by status and ranked by priority
//! todoo list
//!
//! # Work it, finish it
//! todoo status 1 doing
//! todoo complete 1
//!
//! # Counts by status and urgency
//! todoo summary
//! ```
//!
//! Pass `--db PATH` to any command to use a different database file, e.g.
//! one per project. `todoo reset --force` wipes a database back to empty.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod error;
pub mod fields;
pub mod store;
pub mod task;

use cli::Cli;
use cmd::*;
use store::Store;

fn main() {
    let cli = Cli::parse();

    // Completions don't need a database.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let data_dir = PathBuf::from(home).join(".todooolist");
        if let Err(e) = std::fs::create_dir_all(&data_dir) {
            eprintln!("Failed to create data directory {}: {}", data_dir.display(), e);
            std::process::exit(1);
        }
        data_dir.join("tasks.db")
    });

    let mut store = match Store::open(&db_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to open database {}: {}", db_path.display(), e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::Add { title, note, urgency, importance } =>
            cmd_add(&mut store, title, note, urgency, importance),

        Commands::List { status, sort } => cmd_list(&store, status, sort),

        Commands::View { id } => cmd_view(&store, id),

        Commands::Status { id, status } => cmd_status(&mut store, id, status),

        Commands::Complete { id } => cmd_status(&mut store, id, fields::Status::Done),

        Commands::Reopen { id } => cmd_status(&mut store, id, fields::Status::ToDo),

        Commands::Edit { id, title, note, urgency, importance } =>
            cmd_edit(&mut store, id, title, note, urgency, importance),

        Commands::Delete { id } => cmd_delete(&mut store, id),

        Commands::Reset { force } => cmd_reset(&mut store, force),

        Commands::Summary => cmd_summary(&store),

        Commands::Export { output } => cmd_export(&store, output),
    }
}
