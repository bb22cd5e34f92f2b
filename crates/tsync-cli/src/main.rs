//! Template Sync CLI
//!
//! Keeps the per-language template indexes of a templates directory in step
//! with the master index.

mod cli;
mod commands;
mod error;
mod interactive;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use commands::SyncArgs;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(cli.verbose)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {}", e)))?;
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(&cli.templates_dir, cmd),
        None => {
            println!("{} Template Sync CLI", "tsync".green().bold());
            println!();
            println!("Run {} for available commands.", "tsync --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(dir: &std::path::Path, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Sync {
            dry_run,
            force_sync_tags,
            force_sync_language_fields,
            interactive,
            no_backup,
            json,
        } => commands::run_sync(
            dir,
            SyncArgs {
                dry_run,
                force_sync_tags,
                force_sync_language_fields,
                interactive,
                no_backup,
                json,
            },
        ),
        Commands::Check { json } => commands::run_check(dir, json),
        Commands::Diff { json } => commands::run_diff(dir, json),
        Commands::Languages { json } => commands::run_languages(dir, json),
        Commands::Backups => commands::run_backups(dir),
        Commands::Restore { language } => commands::run_restore(dir, &language),
    }
}
