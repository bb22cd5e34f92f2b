//! Run configuration and per-directory settings

use serde::{Deserialize, Serialize};
use tsync_fs::{ConfigStore, NormalizedPath, SyncPath};

use crate::field::FieldClass;
use crate::{Error, Result};

/// Flags for one synchronization run.
///
/// The reconciler reads only the two force flags; `dry_run` is honored by
/// the engine, which skips backups and writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfiguration {
    pub dry_run: bool,
    pub force_sync_tags: bool,
    pub force_sync_language_fields: bool,
}

impl SyncConfiguration {
    pub fn new(dry_run: bool, force_sync_tags: bool, force_sync_language_fields: bool) -> Self {
        Self {
            dry_run,
            force_sync_tags,
            force_sync_language_fields,
        }
    }

    /// Whether values of `class` are overwritten even when already present.
    pub fn forces(&self, class: FieldClass) -> bool {
        match class {
            FieldClass::TranslationProtected => self.force_sync_language_fields,
            FieldClass::TagProtected => self.force_sync_tags,
            FieldClass::AlwaysSync => true,
            FieldClass::Other => false,
        }
    }
}

/// Settings read from `tsync.toml` (or `.json`/`.yaml`) in the templates
/// directory. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncSettings {
    /// Master index file name
    pub master: String,
    /// Language codes to synchronize; `None` means the built-in list
    pub languages: Option<Vec<String>>,
    /// Discover `index.<code>.json` files instead of using a fixed list
    pub discover: bool,
    /// Back up derived files before overwriting them
    pub backup: bool,
    /// Backup root, relative to the templates directory
    pub backup_dir: String,
    /// Render short string arrays on a single line
    pub compact_arrays: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            master: SyncPath::MasterIndex.as_str().to_string(),
            languages: None,
            discover: false,
            backup: true,
            backup_dir: SyncPath::BackupDir.as_str().to_string(),
            compact_arrays: true,
        }
    }
}

impl SyncSettings {
    /// Load settings from the first settings file found in `root`, or the
    /// defaults when there is none.
    pub fn load(root: &NormalizedPath) -> Result<Self> {
        let candidates: Vec<NormalizedPath> = SyncPath::settings_candidates()
            .iter()
            .map(|name| root.join(name.as_str()))
            .collect();

        let settings = match ConfigStore::new().load_first::<Self>(&candidates)? {
            Some((path, settings)) => {
                tracing::debug!(path = %path, "loaded settings");
                settings
            }
            None => Self::default(),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings that would escape the templates directory or could
    /// never name a file.
    pub fn validate(&self) -> Result<()> {
        if self.master.is_empty() || self.master.contains(['/', '\\']) {
            return Err(Error::Settings {
                message: format!("master must be a plain file name, got '{}'", self.master),
            });
        }
        if !self.master.ends_with(".json") {
            return Err(Error::Settings {
                message: format!("master must be a .json file, got '{}'", self.master),
            });
        }
        if self.backup_dir.is_empty() || self.backup_dir.split(['/', '\\']).any(|c| c == "..") {
            return Err(Error::Settings {
                message: format!(
                    "backup_dir must stay inside the templates directory, got '{}'",
                    self.backup_dir
                ),
            });
        }
        if let Some(languages) = &self.languages
            && let Some(bad) = languages
                .iter()
                .find(|code| !crate::languages::is_valid_code(code))
        {
            return Err(Error::Settings {
                message: format!("invalid language code '{}'", bad),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_forces() {
        let config = SyncConfiguration::new(false, true, false);
        assert!(config.forces(FieldClass::TagProtected));
        assert!(!config.forces(FieldClass::TranslationProtected));
        assert!(config.forces(FieldClass::AlwaysSync));
        assert!(!config.forces(FieldClass::Other));
    }

    #[test]
    fn test_defaults_without_settings_file() {
        let temp = TempDir::new().unwrap();
        let settings = SyncSettings::load(&NormalizedPath::new(temp.path())).unwrap();
        assert_eq!(settings, SyncSettings::default());
        assert_eq!(settings.master, "index.json");
        assert!(settings.backup);
    }

    #[test]
    fn test_partial_settings_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("tsync.toml"),
            "languages = [\"ja\", \"ko\"]\nbackup = false\n",
        )
        .unwrap();

        let settings = SyncSettings::load(&NormalizedPath::new(temp.path())).unwrap();
        assert_eq!(settings.languages, Some(vec!["ja".to_string(), "ko".to_string()]));
        assert!(!settings.backup);
        assert_eq!(settings.master, "index.json");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("tsync.toml"), "mastr = \"index.json\"\n").unwrap();

        let err = SyncSettings::load(&NormalizedPath::new(temp.path())).unwrap_err();
        assert!(matches!(err, Error::Fs(tsync_fs::Error::Parse { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_master = SyncSettings {
            master: "../index.json".into(),
            ..SyncSettings::default()
        };
        assert!(bad_master.validate().is_err());

        let bad_backup = SyncSettings {
            backup_dir: "../outside".into(),
            ..SyncSettings::default()
        };
        assert!(bad_backup.validate().is_err());

        let bad_language = SyncSettings {
            languages: Some(vec!["zh/../x".into()]),
            ..SyncSettings::default()
        };
        assert!(bad_language.validate().is_err());
    }
}
