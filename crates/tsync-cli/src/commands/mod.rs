//! Command implementations for tsync-cli

pub mod backups;
pub mod check;
pub mod diff;
pub mod languages;
pub mod restore;
pub mod sync;

use std::path::Path;

use tsync_core::SyncEngine;
use tsync_fs::NormalizedPath;

use crate::error::{CliError, Result};

pub use backups::run_backups;
pub use check::run_check;
pub use diff::run_diff;
pub use languages::run_languages;
pub use restore::run_restore;
pub use sync::{SyncArgs, run_sync};

/// The templates directory, which must exist.
pub fn templates_root(dir: &Path) -> Result<NormalizedPath> {
    if !dir.is_dir() {
        return Err(CliError::user(format!(
            "Templates directory not found: {}",
            dir.display()
        )));
    }
    Ok(NormalizedPath::new(dir))
}

/// Open the engine for a templates directory, reading its settings file.
pub fn open_engine(dir: &Path) -> Result<SyncEngine> {
    Ok(SyncEngine::open(templates_root(dir)?)?)
}
