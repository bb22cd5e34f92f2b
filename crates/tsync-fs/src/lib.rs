//! Filesystem layer for template-sync
//!
//! Provides normalized paths, atomic I/O, format-agnostic settings loading
//! and content checksums. Nothing in here knows about templates.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::SyncPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
