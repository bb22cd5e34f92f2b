//! Run totals folded from change records

use std::collections::HashSet;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::change::{ChangeKind, ChangeRecord};

/// Counters for one language file or a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub files_processed: usize,
    pub templates_added: usize,
    pub templates_removed: usize,
    pub templates_updated: usize,
    pub fields_updated: usize,
}

impl RunSummary {
    /// Whether the counted records changed anything.
    pub fn has_changes(&self) -> bool {
        self.templates_added + self.templates_removed + self.templates_updated + self.fields_updated
            > 0
    }
}

impl AddAssign for RunSummary {
    fn add_assign(&mut self, other: Self) {
        self.files_processed += other.files_processed;
        self.templates_added += other.templates_added;
        self.templates_removed += other.templates_removed;
        self.templates_updated += other.templates_updated;
        self.fields_updated += other.fields_updated;
    }
}

impl Add for RunSummary {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl Sum for RunSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Count the records of one reconciliation.
///
/// A template that was added is counted once as added and its fields are
/// not counted as updates. `files_processed` is left at zero; see
/// [`Accountant::record`].
pub fn accumulate(records: &[ChangeRecord]) -> RunSummary {
    let added: HashSet<(&str, &str)> = records
        .iter()
        .filter(|r| r.kind == ChangeKind::AddedEntity)
        .filter_map(|r| Some((r.category.as_str(), r.entity.as_deref()?)))
        .collect();

    let mut summary = RunSummary::default();
    let mut updated: HashSet<(&str, &str)> = HashSet::new();

    for record in records {
        match record.kind {
            ChangeKind::AddedEntity => summary.templates_added += 1,
            ChangeKind::RemovedEntity => summary.templates_removed += 1,
            ChangeKind::MovedEntity => {
                if let Some(entity) = record.entity.as_deref() {
                    updated.insert((record.category.as_str(), entity));
                }
            }
            kind if kind.is_field_update() => match record.entity.as_deref() {
                Some(entity) if added.contains(&(record.category.as_str(), entity)) => {}
                Some(entity) => {
                    summary.fields_updated += 1;
                    updated.insert((record.category.as_str(), entity));
                }
                None => summary.fields_updated += 1,
            },
            _ => {}
        }
    }

    summary.templates_updated = updated.len();
    summary
}

/// Running totals across the languages of one run.
#[derive(Debug, Clone, Default)]
pub struct Accountant {
    total: RunSummary,
}

impl Accountant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in the records of one processed file and return its summary.
    pub fn record(&mut self, records: &[ChangeRecord]) -> RunSummary {
        let summary = RunSummary {
            files_processed: 1,
            ..accumulate(records)
        };
        self.total += summary;
        summary
    }

    /// Fold in a summary computed elsewhere.
    pub fn merge(&mut self, summary: RunSummary) {
        self.total += summary;
    }

    pub fn total(&self) -> RunSummary {
        self.total
    }
}
