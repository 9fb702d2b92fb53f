use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// File-backed project tracker CLI.
/// Storage defaults to ~/.taskdeck/taskdeck.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "td", version, about = "Project and task tracking CLI")]
pub struct Cli {
    /// Path to the JSON store file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}
