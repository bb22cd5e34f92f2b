//! Well-known file names inside a templates directory.

use std::path::Path;

/// Standard template-sync file names and directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPath {
    /// The master index (`index.json`)
    MasterIndex,
    /// The JSON schema shipped next to the index files, never a language file
    IndexSchema,
    /// Default backup root, relative to the templates directory
    BackupDir,
    /// Settings file candidates, in lookup order
    SettingsToml,
    SettingsJson,
    SettingsYaml,
}

impl SyncPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MasterIndex => "index.json",
            Self::IndexSchema => "index.schema.json",
            Self::BackupDir => ".tsync/backups",
            Self::SettingsToml => "tsync.toml",
            Self::SettingsJson => "tsync.json",
            Self::SettingsYaml => "tsync.yaml",
        }
    }

    /// Settings file names in the order they are looked up.
    pub fn settings_candidates() -> [SyncPath; 3] {
        [Self::SettingsToml, Self::SettingsJson, Self::SettingsYaml]
    }
}

impl AsRef<Path> for SyncPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SyncPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SyncPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
