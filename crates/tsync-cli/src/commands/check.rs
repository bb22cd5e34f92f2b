//! Check command implementation

use std::path::Path;

use colored::Colorize;

use tsync_core::CheckStatus;

use crate::error::{CliError, Result};

/// Run the check command
///
/// Fails unless every language file is in sync, so it can gate CI.
pub fn run_check(dir: &Path, json: bool) -> Result<()> {
    let engine = super::open_engine(dir)?;
    let report = engine.check()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} Checking templates in {}",
            "=>".blue().bold(),
            engine.root().as_str().yellow()
        );

        match report.status {
            CheckStatus::InSync => {
                println!("{} All language files are in sync.", "OK".green().bold());
            }
            CheckStatus::Missing => {
                println!("{} Some language files are missing:", "MISSING".yellow().bold());
            }
            CheckStatus::Drifted => {
                println!("{} Language files have drifted:", "DRIFTED".red().bold());
            }
            CheckStatus::Broken => {
                println!("{} Templates are in a broken state:", "BROKEN".red().bold());
            }
        }
        for item in &report.drift {
            println!(
                "   {} {} [{}]: {}",
                "!".red(),
                item.language.cyan(),
                item.category.dimmed(),
                item.description
            );
        }
        for message in &report.messages {
            println!("   {} {}", "-".yellow(), message);
        }
        if report.status != CheckStatus::InSync {
            println!();
            if report.status == CheckStatus::Broken {
                println!("Manual intervention may be required.");
            } else {
                println!("Run {} to repair.", "tsync sync".cyan());
            }
        }
    }

    if !report.is_in_sync() {
        return Err(CliError::user(format!(
            "templates are not in sync ({} issue(s))",
            report.drift.len() + report.messages.len()
        )));
    }
    Ok(())
}
