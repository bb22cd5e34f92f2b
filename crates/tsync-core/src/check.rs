//! Check types for SyncEngine validation
//!
//! A check reconciles every language in memory and reports what a sync
//! would change, without writing anything.

use serde::{Deserialize, Serialize};

use crate::change::{ChangeKind, ChangeRecord};

/// Status of the synchronization check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckStatus {
    /// Every derived file matches what a sync would write
    InSync,
    /// Some derived files do not exist yet
    Missing,
    /// Some derived files differ from the master
    Drifted,
    /// The master or a derived file could not be read or keyed
    Broken,
}

/// One difference a sync would resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftItem {
    pub language: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub kind: ChangeKind,
    pub description: String,
}

impl DriftItem {
    /// Describe a reconciliation decision as drift. Preserved translations
    /// are not drift.
    pub fn from_change(language: &str, record: &ChangeRecord) -> Option<Self> {
        if !record.is_change() {
            return None;
        }

        let description = match (record.kind, &record.entity, &record.field) {
            (ChangeKind::Added, Some(id), Some(field)) => {
                format!("template '{}' is missing field '{}'", id, field)
            }
            (ChangeKind::Added, None, Some(field)) => {
                format!("category is missing field '{}'", field)
            }
            (ChangeKind::AddedEntity, Some(id), _) => format!("template '{}' is missing", id),
            (ChangeKind::RemovedEntity, Some(id), _) => {
                format!("template '{}' is not in the master", id)
            }
            (ChangeKind::MovedEntity, Some(id), _) => {
                format!("template '{}' is in the wrong category", id)
            }
            (ChangeKind::AddedCategory, _, _) => "category is missing".to_string(),
            (ChangeKind::RemovedCategory, _, _) => "category is not in the master".to_string(),
            (_, Some(id), Some(field)) => {
                format!("template '{}' field '{}' differs from the master", id, field)
            }
            (_, None, Some(field)) => format!("category field '{}' differs from the master", field),
            _ => record.to_string(),
        };

        Some(Self {
            language: language.to_string(),
            category: record.category.clone(),
            template: record.entity.clone(),
            field: record.field.clone(),
            kind: record.kind,
            description,
        })
    }
}

/// Report from a synchronization check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub status: CheckStatus,
    pub drift: Vec<DriftItem>,
    pub messages: Vec<String>,
}

impl CheckReport {
    pub fn in_sync() -> Self {
        Self {
            status: CheckStatus::InSync,
            drift: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn missing(message: String) -> Self {
        Self {
            status: CheckStatus::Missing,
            drift: Vec::new(),
            messages: vec![message],
        }
    }

    pub fn with_drift(drift: Vec<DriftItem>) -> Self {
        Self {
            status: if drift.is_empty() {
                CheckStatus::InSync
            } else {
                CheckStatus::Drifted
            },
            drift,
            messages: Vec::new(),
        }
    }

    pub fn broken(message: String) -> Self {
        Self {
            status: CheckStatus::Broken,
            drift: Vec::new(),
            messages: vec![message],
        }
    }

    /// Only formatting would change.
    pub fn formatting(file: &str) -> Self {
        Self {
            status: CheckStatus::Drifted,
            drift: Vec::new(),
            messages: vec![format!("{}: formatting differs from canonical output", file)],
        }
    }

    /// Merge two check reports; the resulting status is the worse of the two:
    /// Broken > Drifted > Missing > InSync
    pub fn merge(mut self, other: CheckReport) -> Self {
        self.drift.extend(other.drift);
        self.messages.extend(other.messages);
        self.status = self.status.max(other.status);
        self
    }

    pub fn is_in_sync(&self) -> bool {
        self.status == CheckStatus::InSync
    }
}

impl Default for CheckReport {
    fn default() -> Self {
        Self::in_sync()
    }
}
