//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based confirmation.

use colored::Colorize;
use dialoguer::Confirm;

use crate::error::Result;

/// Force flags chosen for a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForceFlags {
    pub tags: bool,
    pub language_fields: bool,
}

/// Ask which protected fields to overwrite. Flags given on the command line
/// become the prompt defaults.
pub fn confirm_force_flags(defaults: ForceFlags) -> Result<ForceFlags> {
    println!();
    println!(
        "{} Translated fields are kept unless you choose to overwrite them.",
        "?".cyan().bold()
    );

    let tags = Confirm::new()
        .with_prompt("Overwrite translated tags with the master's?")
        .default(defaults.tags)
        .interact()?;

    let language_fields = Confirm::new()
        .with_prompt("Overwrite translated titles and descriptions with the master's?")
        .default(defaults.language_fields)
        .interact()?;

    println!();
    Ok(ForceFlags {
        tags,
        language_fields,
    })
}
