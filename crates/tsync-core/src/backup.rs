//! Backups of derived index files
//!
//! Every run that overwrites derived files gets its own directory under the
//! backup root, named after the run's start time. A `metadata.toml` in that
//! directory lists the files it holds together with their checksums:
//!
//! ```text
//! .tsync/backups/
//!   20261016T101500123Z-3f9a1c2e/
//!     metadata.toml
//!     index.ja.json
//!     index.zh.json
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tsync_fs::checksum::compute_file_checksum;
use tsync_fs::{ConfigStore, NormalizedPath, io};

use crate::{Error, Result};

const METADATA_FILE: &str = "metadata.toml";

/// One file inside a backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupEntry {
    /// File name relative to the templates directory
    pub file: String,
    /// Checksum of the copy, `sha256:<hex>`
    pub checksum: String,
}

/// Contents of a backup's `metadata.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupMetadata {
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub files: Vec<BackupEntry>,
}

/// A backup directory and its metadata.
#[derive(Debug, Clone)]
pub struct Backup {
    pub id: String,
    pub path: NormalizedPath,
    pub metadata: BackupMetadata,
}

impl Backup {
    pub fn entry(&self, file: &str) -> Option<&BackupEntry> {
        self.metadata.files.iter().find(|entry| entry.file == file)
    }
}

/// Creates backups for one run and restores from earlier ones.
pub struct BackupManager {
    root: NormalizedPath,
    backups_dir: NormalizedPath,
    run_id: String,
    created: DateTime<Utc>,
}

impl BackupManager {
    /// Manager for `root`, storing backups under `root/backup_dir`.
    pub fn new(root: NormalizedPath, backup_dir: &str) -> Self {
        let created = Utc::now();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let run_id = format!("{}-{}", created.format("%Y%m%dT%H%M%S%3fZ"), &suffix[..8]);
        let backups_dir = root.join(backup_dir);
        Self {
            root,
            backups_dir,
            run_id,
            created,
        }
    }

    pub fn backups_dir(&self) -> &NormalizedPath {
        &self.backups_dir
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    fn run_dir(&self) -> NormalizedPath {
        self.backups_dir.join(&self.run_id)
    }

    /// Copy `file` (a file name in the templates directory) into this run's
    /// backup and return the path of the copy.
    pub fn backup(&self, file: &str) -> Result<NormalizedPath> {
        validate_file_name(file)?;

        let source = self.root.join(file);
        let run_dir = self.run_dir();
        let dest = run_dir.join(file);
        io::copy_file(&source, &dest)?;
        let checksum = compute_file_checksum(&dest)?;

        let store = ConfigStore::new();
        let metadata_path = run_dir.join(METADATA_FILE);
        let mut metadata = if metadata_path.is_file() {
            store.load::<BackupMetadata>(&metadata_path)?
        } else {
            BackupMetadata {
                created: self.created,
                files: Vec::new(),
            }
        };
        metadata.files.retain(|entry| entry.file != file);
        metadata.files.push(BackupEntry {
            file: file.to_string(),
            checksum,
        });
        store.save(&metadata_path, &metadata)?;

        tracing::info!(file, backup = %dest, "backed up derived index");
        Ok(dest)
    }

    /// All readable backups, newest first.
    pub fn list_backups(&self) -> Result<Vec<Backup>> {
        if !self.backups_dir.is_dir() {
            return Ok(Vec::new());
        }

        let native = self.backups_dir.to_native();
        let entries =
            std::fs::read_dir(&native).map_err(|e| Error::from(tsync_fs::Error::io(&native, e)))?;

        let store = ConfigStore::new();
        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::from(tsync_fs::Error::io(&native, e)))?;
            let Some(id) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let path = self.backups_dir.join(&id);
            let metadata_path = path.join(METADATA_FILE);
            if !metadata_path.is_file() {
                continue;
            }
            match store.load::<BackupMetadata>(&metadata_path) {
                Ok(metadata) => backups.push(Backup { id, path, metadata }),
                Err(e) => tracing::warn!(backup = %path, error = %e, "skipping unreadable backup"),
            }
        }

        backups.sort_by(|a, b| {
            b.metadata
                .created
                .cmp(&a.metadata.created)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(backups)
    }

    /// The newest backup holding `file`.
    pub fn latest_for(&self, file: &str) -> Result<Option<Backup>> {
        validate_file_name(file)?;
        Ok(self
            .list_backups()?
            .into_iter()
            .find(|backup| backup.entry(file).is_some()))
    }

    /// Put the newest backed-up copy of `file` back in place.
    ///
    /// The copy is checked against its recorded checksum first; a mismatch
    /// leaves the current file untouched.
    pub fn restore_latest(&self, file: &str) -> Result<Backup> {
        let backup = self.latest_for(file)?.ok_or_else(|| Error::Backup {
            message: format!("no backup found for {}", file),
        })?;

        let source = backup.path.join(file);
        let expected = backup
            .entry(file)
            .map(|entry| entry.checksum.as_str())
            .unwrap_or_default();
        let actual = compute_file_checksum(&source)?;
        if actual != expected {
            return Err(Error::Backup {
                message: format!(
                    "backup {} of {} is corrupt (checksum {} != {})",
                    backup.id, file, actual, expected
                ),
            });
        }

        let content = std::fs::read(source.to_native())
            .map_err(|e| Error::from(tsync_fs::Error::io(source.to_native(), e)))?;
        io::write_atomic(&self.root.join(file), &content)?;

        tracing::info!(file, backup = %backup.id, "restored derived index");
        Ok(backup)
    }
}

/// Backed-up files are addressed by plain file name only.
fn validate_file_name(file: &str) -> Result<()> {
    if file.is_empty()
        || file == "."
        || file == ".."
        || file.contains(['/', '\\'])
        || file.contains('\0')
    {
        return Err(Error::Backup {
            message: format!("'{}' is not a plain file name", file),
        });
    }
    Ok(())
}
