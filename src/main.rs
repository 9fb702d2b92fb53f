use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskdeck::cli::Cli;
use taskdeck::cmd::{self, Commands};
use taskdeck::store::Store;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Completions don't need a store.
    if let Commands::Completions { shell } = cli.command {
        if let Err(e) = cmd::cmd_completions(shell) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return;
    }

    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let deck_dir = PathBuf::from(home).join(".taskdeck");
        if let Err(e) = std::fs::create_dir_all(&deck_dir) {
            eprintln!("Failed to create directory {}: {e}", deck_dir.display());
            std::process::exit(1);
        }
        deck_dir.join("taskdeck.json")
    });

    let mut store = Store::load(&db_path);

    let result = match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::Project { action } => cmd::cmd_project(&mut store, &db_path, action),

        Commands::Add { title, project, desc, priority, due, tags, estimate, actual } =>
            cmd::cmd_add(&mut store, &db_path, title, project, desc, priority, due, tags,
                         estimate, actual),

        Commands::Begin { id } => cmd::cmd_begin(&mut store, &db_path, id),

        Commands::Complete { id } => cmd::cmd_complete(&mut store, &db_path, id),

        Commands::Update { id, title, desc, priority, status, progress, due, clear_due,
                           add_tags, rm_tags, estimate, actual } =>
            cmd::cmd_update(&mut store, &db_path, id, title, desc, priority, status, progress,
                            due, clear_due, add_tags, rm_tags, estimate, actual),

        Commands::Delete { id } => cmd::cmd_delete(&mut store, &db_path, id),

        Commands::List { all, status, priority, project, tags, due, sort, limit } =>
            cmd::cmd_list(&store, all, status, priority, project, tags, due, sort, limit),

        Commands::View { id } => cmd::cmd_view(&store, id),

        Commands::Tags => cmd::cmd_tags(&store),

        Commands::Backup => cmd::cmd_backup(&db_path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
