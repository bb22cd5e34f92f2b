//! SyncEngine implementation
//!
//! Drives reconciliation for every language file of a templates directory:
//! load the master once, reconcile each derived file against it, and back
//! up and write the results. A failure in one language never stops the
//! others.

use serde::Serialize;
use tsync_fs::NormalizedPath;

use crate::backup::{Backup, BackupManager};
use crate::change::ChangeRecord;
use crate::check::{CheckReport, DriftItem};
use crate::config::{SyncConfiguration, SyncSettings};
use crate::diff::LanguageDiff;
use crate::document::Document;
use crate::format::FormatOptions;
use crate::languages::{self, LanguageFile};
use crate::reconcile::{Reconciliation, reconcile};
use crate::store::{DocumentStore, JsonDocumentStore};
use crate::summary::{Accountant, RunSummary};
use crate::{Error, Result};

/// Outcome for one language file.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageReport {
    pub language: String,
    /// File name inside the templates directory
    pub file: String,
    pub changes: Vec<ChangeRecord>,
    pub summary: RunSummary,
    /// The derived file did not exist before this run
    pub created: bool,
    /// The file was (or, in a dry run, would have been) rewritten
    pub needs_write: bool,
    pub written: bool,
    /// Where the previous version was copied to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<String>,
}

/// A language that could not be processed.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageError {
    pub language: String,
    pub file: String,
    pub message: String,
}

/// Report from a synchronization run
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub dry_run: bool,
    pub languages: Vec<LanguageReport>,
    /// Totals over every language that was processed
    pub summary: RunSummary,
    pub errors: Vec<LanguageError>,
}

impl SyncReport {
    /// Whether every language was processed.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Derived file state plus its reconciled replacement.
struct Prepared {
    current: Option<String>,
    reconciliation: Reconciliation,
    rendered: String,
}

impl Prepared {
    fn needs_write(&self) -> bool {
        self.current.as_deref() != Some(self.rendered.as_str())
    }
}

/// Synchronizes the derived index files of one templates directory.
pub struct SyncEngine {
    root: NormalizedPath,
    settings: SyncSettings,
    store: Box<dyn DocumentStore>,
}

impl SyncEngine {
    /// Create an engine for `root` with explicit settings.
    pub fn new(root: NormalizedPath, settings: SyncSettings) -> Self {
        let store = JsonDocumentStore::new(FormatOptions {
            compact_arrays: settings.compact_arrays,
        });
        Self {
            root,
            settings,
            store: Box::new(store),
        }
    }

    /// Create an engine for `root`, reading settings from the directory.
    pub fn open(root: NormalizedPath) -> Result<Self> {
        let settings = SyncSettings::load(&root)?;
        Ok(Self::new(root, settings))
    }

    /// Replace the document store.
    pub fn with_store(mut self, store: Box<dyn DocumentStore>) -> Self {
        self.store = store;
        self
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn master_path(&self) -> NormalizedPath {
        self.root.join(&self.settings.master)
    }

    /// The language files this engine covers, in processing order.
    pub fn languages(&self) -> Result<Vec<LanguageFile>> {
        languages::resolve(&self.master_path(), &self.settings)
    }

    /// Load the master document.
    pub fn load_master(&self) -> Result<Document> {
        self.store.load(&self.master_path())
    }

    /// Reconcile one language file in memory.
    pub fn reconcile_language(
        &self,
        master: &Document,
        file: &LanguageFile,
        config: &SyncConfiguration,
    ) -> Result<Reconciliation> {
        Ok(self.prepare(master, file, config)?.reconciliation)
    }

    fn prepare(
        &self,
        master: &Document,
        file: &LanguageFile,
        config: &SyncConfiguration,
    ) -> Result<Prepared> {
        let current = match self.store.read(&file.path) {
            Ok(text) => Some(text),
            Err(e) if e.is_not_found() => {
                tracing::warn!(language = %file.code, path = %file.path, "derived index not found, will create it");
                None
            }
            Err(e) => return Err(e),
        };

        let derived = match &current {
            Some(text) => self.store.parse(&file.path, text)?,
            None => Document::empty(),
        };

        let reconciliation = reconcile(master, &derived, config)?;
        let rendered = self.store.render(&reconciliation.document)?;

        Ok(Prepared {
            current,
            reconciliation,
            rendered,
        })
    }

    /// Synchronize every language file.
    ///
    /// A missing or unreadable master fails the whole run. Errors in a single
    /// language are collected in the report.
    pub fn sync(&self, config: &SyncConfiguration) -> Result<SyncReport> {
        let master = self.load_master()?;
        let files = self.languages()?;

        let backups = (self.settings.backup && !config.dry_run)
            .then(|| BackupManager::new(self.root.clone(), &self.settings.backup_dir));

        let mut accountant = Accountant::new();
        let mut report = SyncReport {
            dry_run: config.dry_run,
            languages: Vec::with_capacity(files.len()),
            summary: RunSummary::default(),
            errors: Vec::new(),
        };

        for file in &files {
            match self.sync_language(&master, file, config, backups.as_ref()) {
                Ok(language) => {
                    accountant.merge(language.summary);
                    report.languages.push(language);
                }
                Err(e) => {
                    tracing::error!(language = %file.code, error = %e, "failed to sync language");
                    report.errors.push(LanguageError {
                        language: file.code.clone(),
                        file: file_name(file),
                        message: e.to_string(),
                    });
                }
            }
        }

        report.summary = accountant.total();
        tracing::info!(
            languages = report.languages.len(),
            failed = report.errors.len(),
            dry_run = config.dry_run,
            "sync finished"
        );
        Ok(report)
    }

    fn sync_language(
        &self,
        master: &Document,
        file: &LanguageFile,
        config: &SyncConfiguration,
        backups: Option<&BackupManager>,
    ) -> Result<LanguageReport> {
        let prepared = self.prepare(master, file, config)?;
        let name = file_name(file);
        let needs_write = prepared.needs_write();

        let mut backup = None;
        let mut written = false;
        if needs_write && !config.dry_run {
            if let Some(manager) = backups
                && prepared.current.is_some()
            {
                backup = Some(manager.backup(&name)?.to_string());
            }
            self.store.write_rendered(&file.path, &prepared.rendered)?;
            written = true;
        }

        let summary = RunSummary {
            files_processed: 1,
            ..crate::summary::accumulate(&prepared.reconciliation.changes)
        };

        tracing::info!(
            language = %file.code,
            changes = prepared.reconciliation.changes.len(),
            written,
            "processed language"
        );

        Ok(LanguageReport {
            language: file.code.clone(),
            file: name,
            created: prepared.current.is_none(),
            changes: prepared.reconciliation.changes,
            summary,
            needs_write,
            written,
            backup,
        })
    }

    /// Report what a sync with default flags would change, without writing.
    pub fn check(&self) -> Result<CheckReport> {
        let master = match self.load_master() {
            Ok(master) => master,
            Err(e) => return Ok(CheckReport::broken(format!("master: {}", e))),
        };
        let files = match self.languages() {
            Ok(files) => files,
            Err(e) => return Ok(CheckReport::broken(e.to_string())),
        };

        let config = SyncConfiguration::default();
        let mut report = CheckReport::in_sync();
        for file in &files {
            let name = file_name(file);
            let language_report = match self.prepare(&master, file, &config) {
                Err(Error::Structural(e)) => {
                    // Master defects break every language the same way.
                    return Ok(report.merge(CheckReport::broken(format!("master: {}", e))));
                }
                Err(e) => CheckReport::broken(format!("{}: {}", name, e)),
                Ok(prepared) if prepared.current.is_none() => {
                    CheckReport::missing(format!("{}: file does not exist", name))
                }
                Ok(prepared) => {
                    let drift: Vec<DriftItem> = prepared
                        .reconciliation
                        .changes
                        .iter()
                        .filter_map(|record| DriftItem::from_change(&file.code, record))
                        .collect();
                    if drift.is_empty() && prepared.needs_write() {
                        CheckReport::formatting(&name)
                    } else {
                        CheckReport::with_drift(drift)
                    }
                }
            };
            report = report.merge(language_report);
        }

        Ok(report)
    }

    /// Unified diffs of what a sync with `config` would write, per language.
    pub fn diff(&self, config: &SyncConfiguration) -> Result<Vec<LanguageDiff>> {
        let master = self.load_master()?;
        self.languages()?
            .iter()
            .map(|file| {
                let prepared = self.prepare(&master, file, config)?;
                Ok(LanguageDiff::compute(
                    &file.code,
                    &file_name(file),
                    prepared.current.as_deref().unwrap_or_default(),
                    &prepared.rendered,
                ))
            })
            .collect()
    }

    /// Restore the newest backup of the file for `language`.
    pub fn restore(&self, language: &str) -> Result<Backup> {
        let file = LanguageFile::for_master(&self.master_path(), language)?;
        BackupManager::new(self.root.clone(), &self.settings.backup_dir)
            .restore_latest(&file_name(&file))
    }

    /// Backups recorded for this directory, newest first.
    pub fn backups(&self) -> Result<Vec<Backup>> {
        BackupManager::new(self.root.clone(), &self.settings.backup_dir).list_backups()
    }
}

fn file_name(file: &LanguageFile) -> String {
    file.path
        .file_name()
        .map(str::to_string)
        .unwrap_or_else(|| file.path.to_string())
}
