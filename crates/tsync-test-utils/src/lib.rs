//! Shared test utilities for the template-sync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`dir`]: [`TemplatesDir`](dir::TemplatesDir) builder for a throwaway
//!   templates directory
//! - [`fixtures`]: small master and derived documents used across suites

pub mod dir;
pub mod fixtures;

pub use dir::TemplatesDir;
