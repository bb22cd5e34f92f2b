//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Template Sync - keep translated template indexes in step with the master
#[derive(Parser, Debug)]
#[command(name = "tsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Templates directory holding index.json and its translations
    #[arg(short = 'd', long = "dir", global = true, default_value = ".", env = "TSYNC_DIR")]
    pub templates_dir: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Synchronize every language file with the master index
    ///
    /// Technical fields (models, size, date, ...) always follow the master.
    /// Translated titles, descriptions and tags are kept unless forced.
    ///
    /// Examples:
    ///   tsync sync --dry-run                 # Show what would change
    ///   tsync sync --force-sync-tags         # Reset translated tags
    ///   tsync -d templates sync --no-backup  # Skip backups
    Sync {
        /// Report changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Overwrite translated tags with the master's
        #[arg(long)]
        force_sync_tags: bool,

        /// Overwrite translated titles and descriptions with the master's
        #[arg(long)]
        force_sync_language_fields: bool,

        /// Ask which protected fields to overwrite
        #[arg(short, long)]
        interactive: bool,

        /// Do not back up files before overwriting them
        #[arg(long)]
        no_backup: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Check whether every language file is in sync (exit code 1 if not)
    Check {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Preview what sync would change as unified diffs
    Diff {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the language files that would be processed
    Languages {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List backups, newest first
    Backups,

    /// Restore a language file from its latest backup
    Restore {
        /// Language code, e.g. ja or zh-TW
        language: String,
    },
}
