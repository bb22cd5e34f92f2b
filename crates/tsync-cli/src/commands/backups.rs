//! Backups command implementation

use std::path::Path;

use colored::Colorize;

use crate::error::Result;

/// List backups, newest first.
pub fn run_backups(dir: &Path) -> Result<()> {
    let engine = super::open_engine(dir)?;
    let backups = engine.backups()?;

    if backups.is_empty() {
        println!("{} No backups found.", "=>".blue().bold());
        return Ok(());
    }

    for backup in &backups {
        println!(
            "{} {} ({})",
            "*".blue(),
            backup.id.cyan(),
            backup.metadata.created.format("%Y-%m-%d %H:%M:%S UTC")
        );
        for entry in &backup.metadata.files {
            println!("   {} {}", "-".dimmed(), entry.file);
        }
    }
    Ok(())
}
