//! Diff command implementation
//!
//! Previews what sync would write without applying it.

use std::path::Path;

use colored::Colorize;

use tsync_core::{LanguageDiff, SyncConfiguration};

use crate::error::Result;

/// Run the diff command
pub fn run_diff(dir: &Path, json: bool) -> Result<()> {
    let engine = super::open_engine(dir)?;
    let diffs = engine.diff(&SyncConfiguration::default())?;
    let pending: Vec<&LanguageDiff> = diffs.iter().filter(|d| !d.is_empty()).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&pending)?);
        return Ok(());
    }

    if pending.is_empty() {
        println!(
            "{} No changes needed. All language files are in sync.",
            "OK".green().bold()
        );
        return Ok(());
    }

    for diff in pending {
        println!(
            "{} {} ({}) {} {}",
            "Diff".blue().bold(),
            diff.path.cyan(),
            diff.language.dimmed(),
            format!("+{}", diff.added_lines).green(),
            format!("-{}", diff.removed_lines).red()
        );
        print_unified(&diff.unified);
        println!();
    }
    Ok(())
}

fn print_unified(unified: &str) {
    for line in unified.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
}
