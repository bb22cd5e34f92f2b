//! Sync command implementation

use std::path::Path;

use colored::{ColoredString, Colorize};

use tsync_core::{
    ChangeKind, ChangeRecord, LanguageReport, RunSummary, SyncConfiguration, SyncEngine,
    SyncSettings,
};

use crate::error::{CliError, Result};
use crate::interactive::{ForceFlags, confirm_force_flags};

/// Flags of the sync command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncArgs {
    pub dry_run: bool,
    pub force_sync_tags: bool,
    pub force_sync_language_fields: bool,
    pub interactive: bool,
    pub no_backup: bool,
    pub json: bool,
}

/// Run the sync command
///
/// Fails if any language file could not be processed.
pub fn run_sync(dir: &Path, args: SyncArgs) -> Result<()> {
    if args.interactive && args.json {
        return Err(CliError::user("--interactive cannot be combined with --json"));
    }
    let root = super::templates_root(dir)?;
    let mut settings = SyncSettings::load(&root)?;
    if args.no_backup {
        settings.backup = false;
    }
    let engine = SyncEngine::new(root, settings);

    let mut force = ForceFlags {
        tags: args.force_sync_tags,
        language_fields: args.force_sync_language_fields,
    };
    if args.interactive {
        force = confirm_force_flags(force)?;
    }

    let config = SyncConfiguration::new(args.dry_run, force.tags, force.language_fields);
    tracing::debug!(?config, "starting sync");

    if !args.json {
        println!(
            "{} Synchronizing templates in {}{}",
            "=>".blue().bold(),
            engine.root().as_str().yellow(),
            if args.dry_run {
                " (dry run)".dimmed().to_string()
            } else {
                String::new()
            }
        );
    }

    let report = engine.sync(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for language in &report.languages {
            print_language(language, report.dry_run);
        }
        println!();
        print_summary(&report.summary, report.dry_run);
        if !report.errors.is_empty() {
            println!("{} Some languages failed:", "ERROR".red().bold());
            for error in &report.errors {
                println!(
                    "   {} {} ({}): {}",
                    "!".red(),
                    error.file.cyan(),
                    error.language.dimmed(),
                    error.message
                );
            }
        }
    }

    if !report.success() {
        return Err(CliError::user(format!(
            "{} language file(s) failed to synchronize",
            report.errors.len()
        )));
    }
    Ok(())
}

fn print_language(language: &LanguageReport, dry_run: bool) {
    let state = match (language.needs_write, language.created, dry_run) {
        (false, _, _) => "unchanged".dimmed(),
        (true, true, false) => "created".green(),
        (true, true, true) => "would create".green(),
        (true, false, false) => "updated".yellow(),
        (true, false, true) => "would update".yellow(),
    };
    println!(
        "   {} {} ({}) {}",
        "*".blue(),
        language.file.cyan(),
        language.language.dimmed(),
        state
    );

    let mut preserved = 0;
    for change in &language.changes {
        if change.kind == ChangeKind::Preserved {
            preserved += 1;
            continue;
        }
        println!("      {} {}", marker(change), change);
    }
    if preserved > 0 {
        println!(
            "      {} {} translated value(s) preserved",
            "=".dimmed(),
            preserved
        );
    }
    if let Some(backup) = &language.backup {
        println!("      {} backup: {}", "@".dimmed(), backup.dimmed());
    }
}

fn marker(change: &ChangeRecord) -> ColoredString {
    match change.kind {
        ChangeKind::Added | ChangeKind::AddedEntity | ChangeKind::AddedCategory => "+".green(),
        ChangeKind::RemovedEntity | ChangeKind::RemovedCategory => "-".red(),
        ChangeKind::AutoSynced | ChangeKind::ForceOverwritten => "~".yellow(),
        ChangeKind::MovedEntity => ">".cyan(),
        ChangeKind::Preserved => "=".dimmed(),
    }
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    let verb = if dry_run { "Would synchronize" } else { "Synchronized" };
    if !summary.has_changes() {
        println!(
            "{} {} {} file(s). No changes needed.",
            "OK".green().bold(),
            verb,
            summary.files_processed
        );
        return;
    }
    println!(
        "{} {} {} file(s): {} template(s) added, {} removed, {} updated, {} field(s) updated",
        "OK".green().bold(),
        verb,
        summary.files_processed,
        summary.templates_added,
        summary.templates_removed,
        summary.templates_updated,
        summary.fields_updated
    );
}
