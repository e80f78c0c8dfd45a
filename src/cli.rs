use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Simple, SQLite-backed task tracker CLI.
/// Storage defaults to ~/.todooolist/tasks.db or a path passed via --db.
#[derive(Parser)]
#[command(name = "todoo", version, about = "Eisenhower-style personal task tracker")]
pub struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
