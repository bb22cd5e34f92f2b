//! Languages command implementation

use std::path::Path;

use colored::Colorize;
use serde_json::json;

use crate::error::Result;

/// List the language files a sync would process.
pub fn run_languages(dir: &Path, json: bool) -> Result<()> {
    let engine = super::open_engine(dir)?;
    let files = engine.languages()?;

    if json {
        let entries: Vec<_> = files
            .iter()
            .map(|file| {
                json!({
                    "language": file.code,
                    "path": file.path.as_str(),
                    "exists": file.path.is_file(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "{} Master: {}",
        "=>".blue().bold(),
        engine.master_path().as_str().yellow()
    );
    for file in &files {
        let state = if file.path.is_file() {
            "exists".green()
        } else {
            "missing".yellow()
        };
        println!(
            "   {} {:<8} {} {}",
            "*".blue(),
            file.code.cyan(),
            file.path.file_name().unwrap_or_default(),
            state
        );
    }
    Ok(())
}
