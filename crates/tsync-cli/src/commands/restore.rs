//! Restore command implementation

use std::path::Path;

use colored::Colorize;

use crate::error::Result;

/// Restore a language file from its newest backup.
pub fn run_restore(dir: &Path, language: &str) -> Result<()> {
    let engine = super::open_engine(dir)?;
    let backup = engine.restore(language)?;

    println!(
        "{} Restored {} from backup {}",
        "OK".green().bold(),
        language.cyan(),
        backup.id.dimmed()
    );
    Ok(())
}
