//! Core of template-sync
//!
//! A master template index (`index.json`) defines which template categories
//! exist, which templates they hold and their technical metadata. Each
//! language has a derived copy (`index.ja.json`, ...) whose translated text
//! must survive while everything else follows the master.
//!
//! - [`document`]: the category / template / field model
//! - [`field`]: which merge policy applies to a field
//! - [`reconcile()`]: merges one derived document against the master
//! - [`summary`]: folds change records into run totals
//! - [`engine::SyncEngine`]: drives load, reconcile, backup and write for
//!   every language of a directory

pub mod backup;
pub mod change;
pub mod check;
pub mod config;
pub mod diff;
pub mod document;
pub mod engine;
pub mod error;
pub mod field;
pub mod format;
pub mod languages;
pub mod reconcile;
pub mod store;
pub mod summary;

pub use backup::{Backup, BackupManager};
pub use change::{ChangeKind, ChangeRecord};
pub use check::{CheckReport, CheckStatus, DriftItem};
pub use config::{SyncConfiguration, SyncSettings};
pub use diff::LanguageDiff;
pub use document::{Category, Document, Entity};
pub use engine::{LanguageError, LanguageReport, SyncEngine, SyncReport};
pub use error::{Error, Result, StructuralError};
pub use field::{FieldClass, classify};
pub use languages::LanguageFile;
pub use reconcile::{Reconciliation, reconcile};
pub use store::{DocumentStore, JsonDocumentStore};
pub use summary::{Accountant, RunSummary, accumulate};
