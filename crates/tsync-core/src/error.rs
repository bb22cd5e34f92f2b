//! Error types for tsync-core

use std::path::PathBuf;

/// Result type for tsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// A master document that cannot be keyed.
///
/// Only the master is held to these rules; the same defects in a derived
/// document are tolerated and repaired by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    #[error(
        "master category #{index} has no identifier (expected `name` or one of moduleName/category/type)"
    )]
    MissingCategoryKey { index: usize },

    #[error("master template #{index} in category '{category}' has no string `name`")]
    MissingEntityId { category: String, index: usize },

    #[error("master template '{id}' appears more than once in category '{category}'")]
    DuplicateEntity { category: String, id: String },
}

/// Errors that can occur in tsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed master document
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// Index file is not valid JSON or not a list of categories
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Document value does not have the category-list shape
    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    /// Index file does not exist
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// Backup creation or restore failed
    #[error("Backup error: {message}")]
    Backup { message: String },

    /// Settings file holds values that cannot be used
    #[error("Invalid settings: {message}")]
    Settings { message: String },

    /// Filesystem error from tsync-fs
    #[error(transparent)]
    Fs(tsync_fs::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl From<tsync_fs::Error> for Error {
    fn from(err: tsync_fs::Error) -> Self {
        match err {
            tsync_fs::Error::NotFound { path } => Self::NotFound { path },
            other => Self::Fs(other),
        }
    }
}

impl Error {
    /// Whether this error means a file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
