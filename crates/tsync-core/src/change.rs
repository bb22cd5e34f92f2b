//! Change records produced by reconciliation

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the reconciler decided for a field, template or category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    /// Field overwritten with a differing master value
    AutoSynced,
    /// Translated value kept although the master differs
    Preserved,
    /// Field was missing and copied from the master
    Added,
    /// Translated value replaced because a force flag was set
    ForceOverwritten,
    /// Template copied in from the master
    AddedEntity,
    /// Template absent from the master, dropped
    RemovedEntity,
    /// Template kept but relocated to the master's category
    MovedEntity,
    /// Category created to mirror the master
    AddedCategory,
    /// Category absent from the master, dropped
    RemovedCategory,
}

impl ChangeKind {
    /// Field decisions that changed the derived value.
    pub fn is_field_update(self) -> bool {
        matches!(self, Self::AutoSynced | Self::Added | Self::ForceOverwritten)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AutoSynced => "auto-synced",
            Self::Preserved => "preserved",
            Self::Added => "added",
            Self::ForceOverwritten => "force-overwritten",
            Self::AddedEntity => "added-entity",
            Self::RemovedEntity => "removed-entity",
            Self::MovedEntity => "moved-entity",
            Self::AddedCategory => "added-category",
            Self::RemovedCategory => "removed-category",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reconciliation decision.
///
/// Category-level records have no `entity`; entity-level records have no
/// `field`. For [`ChangeKind::MovedEntity`], `previous` holds the category the
/// template was moved out of.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub kind: ChangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ChangeRecord {
    /// A field decision on a template (`entity` set) or category header.
    pub fn field(
        category: &str,
        entity: Option<&str>,
        field: &str,
        kind: ChangeKind,
        previous: Option<&Value>,
        value: &Value,
    ) -> Self {
        Self {
            category: category.to_string(),
            entity: entity.map(str::to_string),
            field: Some(field.to_string()),
            kind,
            previous: previous.cloned(),
            value: Some(value.clone()),
        }
    }

    /// A whole-template decision.
    pub fn entity(category: &str, id: &str, kind: ChangeKind) -> Self {
        Self {
            category: category.to_string(),
            entity: Some(id.to_string()),
            field: None,
            kind,
            previous: None,
            value: None,
        }
    }

    /// A template moved from `from` into `category`.
    pub fn moved(category: &str, id: &str, from: &str) -> Self {
        Self {
            previous: Some(Value::String(from.to_string())),
            ..Self::entity(category, id, ChangeKind::MovedEntity)
        }
    }

    /// A whole-category decision.
    pub fn category(category: &str, kind: ChangeKind) -> Self {
        Self {
            category: category.to_string(),
            entity: None,
            field: None,
            kind,
            previous: None,
            value: None,
        }
    }

    /// Anything other than a preserved translation.
    pub fn is_change(&self) -> bool {
        self.kind != ChangeKind::Preserved
    }
}

impl std::fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ", self.kind)?;
        match (&self.entity, &self.field) {
            (Some(entity), Some(field)) => write!(f, "{}.{}", entity, field)?,
            (Some(entity), None) => write!(f, "{}", entity)?,
            (None, Some(field)) => write!(f, "[{}].{}", self.category, field)?,
            (None, None) => write!(f, "[{}]", self.category)?,
        }
        if let (ChangeKind::MovedEntity, Some(Value::String(from))) = (self.kind, &self.previous) {
            write!(f, " (from [{}] to [{}])", from, self.category)?;
        }
        Ok(())
    }
}
