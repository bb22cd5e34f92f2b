//! Reconciliation of a derived index against the master
//!
//! The master dictates structure: which categories exist, in what order,
//! which templates each holds and in what order, and which fields each
//! template carries. The derived document contributes only the values that
//! the field policy lets it keep.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::change::{ChangeKind, ChangeRecord};
use crate::config::SyncConfiguration;
use crate::document::{Category, Document, ENTITY_ID_FIELD, Entity, Fields, type_name};
use crate::error::StructuralError;
use crate::field::{FieldClass, classify, classify_category_field};

/// Minimum share of templates two categories must have in common to be
/// paired when their identifiers differ.
const CATEGORY_OVERLAP_THRESHOLD: f64 = 0.5;

/// Output of [`reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// The updated derived document
    pub document: Document,
    /// Every decision taken, in processing order
    pub changes: Vec<ChangeRecord>,
}

impl Reconciliation {
    /// Whether anything other than preserved translations was recorded.
    pub fn has_changes(&self) -> bool {
        self.changes.iter().any(ChangeRecord::is_change)
    }
}

/// Reconcile `derived` against `master`.
///
/// Fails only when the master cannot be keyed; see [`StructuralError`].
pub fn reconcile(
    master: &Document,
    derived: &Document,
    config: &SyncConfiguration,
) -> Result<Reconciliation, StructuralError> {
    let master_index = MasterIndex::build(master)?;
    let derived_index = DerivedIndex::build(derived);
    let pairing = pair_categories(&master_index, &derived_index);

    let mut changes = Vec::new();
    let mut categories = Vec::with_capacity(master.categories().len());

    for (position, master_category) in master.categories().iter().enumerate() {
        let label = &master_index.labels[position];
        let paired = pairing[position];
        let derived_category = paired.map(|index| &derived.categories()[index]);

        let fields = match derived_category {
            Some(existing) => {
                merge_fields(
                    master_category.fields(),
                    existing.fields(),
                    config,
                    &Scope::category(label),
                    &mut changes,
                )
            }
            None => {
                tracing::debug!(category = %label, "adding category");
                changes.push(ChangeRecord::category(label, ChangeKind::AddedCategory));
                master_category.fields().clone()
            }
        };

        let mut entities = Vec::with_capacity(master_category.entities().len());
        for master_entity in master_category.entities() {
            let entity = reconcile_entity(
                label,
                paired,
                master_entity,
                &derived_index,
                config,
                &mut changes,
            );
            entities.push(entity);
        }

        if let Some(index) = paired {
            record_removals(label, &derived.categories()[index], &master_index, &mut changes);
        }

        categories.push(Category::new(fields, entities));
    }

    for (index, derived_category) in derived.categories().iter().enumerate() {
        if pairing.contains(&Some(index)) {
            continue;
        }
        let label = derived_index.label(index);
        record_removals(&label, derived_category, &master_index, &mut changes);
        tracing::debug!(category = %label, "removing category");
        changes.push(ChangeRecord::category(&label, ChangeKind::RemovedCategory));
    }

    Ok(Reconciliation {
        document: Document::new(categories),
        changes,
    })
}

/// Keys and template ids of the master, validated.
struct MasterIndex<'a> {
    /// Pairing key per category; several categories may share one
    keys: Vec<String>,
    /// Name used in change records, unique per category
    labels: Vec<String>,
    /// Keys carried by more than one master category
    repeated: HashSet<String>,
    /// Every template id in the master
    ids: HashSet<&'a str>,
    /// Template ids per master category
    entity_sets: Vec<HashSet<&'a str>>,
}

impl<'a> MasterIndex<'a> {
    fn build(master: &'a Document) -> Result<Self, StructuralError> {
        let mut keys = Vec::with_capacity(master.categories().len());
        let mut labels = Vec::with_capacity(master.categories().len());
        let mut occurrences: HashMap<String, usize> = HashMap::new();
        let mut ids = HashSet::new();
        let mut entity_sets = Vec::with_capacity(master.categories().len());

        for (index, category) in master.categories().iter().enumerate() {
            let key = category
                .key()
                .ok_or(StructuralError::MissingCategoryKey { index })?;
            let occurrence = occurrences.entry(key.clone()).or_default();
            *occurrence += 1;
            let label = if *occurrence == 1 {
                key.clone()
            } else {
                format!("{} #{}", key, occurrence)
            };

            let mut set = HashSet::new();
            for (position, entity) in category.entities().iter().enumerate() {
                let id = entity.id().ok_or_else(|| StructuralError::MissingEntityId {
                    category: label.clone(),
                    index: position,
                })?;
                if !set.insert(id) {
                    return Err(StructuralError::DuplicateEntity {
                        category: label,
                        id: id.to_string(),
                    });
                }
                ids.insert(id);
            }

            keys.push(key);
            labels.push(label);
            entity_sets.push(set);
        }

        let repeated = occurrences
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(key, _)| key)
            .collect();

        Ok(Self {
            keys,
            labels,
            repeated,
            ids,
            entity_sets,
        })
    }

    fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

/// Lookup structures over the derived document, built leniently.
struct DerivedIndex<'a> {
    keys: Vec<Option<String>>,
    /// Templates per category; a repeated id keeps its first occurrence
    by_category: Vec<HashMap<&'a str, &'a Entity>>,
    /// Template id -> (category position, template); first occurrence wins
    entities: HashMap<&'a str, (usize, &'a Entity)>,
}

impl<'a> DerivedIndex<'a> {
    fn build(derived: &'a Document) -> Self {
        let mut keys = Vec::with_capacity(derived.categories().len());
        let mut by_category = Vec::with_capacity(derived.categories().len());
        let mut entities = HashMap::new();

        for (index, category) in derived.categories().iter().enumerate() {
            keys.push(category.key());

            let mut templates = HashMap::new();
            for entity in category.entities() {
                let Some(id) = entity.id() else {
                    tracing::warn!(category = index, "dropping derived template without a name");
                    continue;
                };
                if templates.contains_key(id) {
                    tracing::warn!(category = index, template = id, "dropping duplicate derived template");
                    continue;
                }
                templates.insert(id, entity);
                entities.entry(id).or_insert((index, entity));
            }
            by_category.push(templates);
        }

        Self {
            keys,
            by_category,
            entities,
        }
    }

    /// Display name of a derived category.
    fn label(&self, index: usize) -> String {
        self.keys[index]
            .clone()
            .unwrap_or_else(|| format!("category #{}", index))
    }

    /// First derived category not yet paired whose key is `key`.
    fn unused_with_key(&self, key: &str, used: &[bool]) -> Option<usize> {
        self.keys
            .iter()
            .enumerate()
            .find(|(index, derived_key)| !used[*index] && derived_key.as_deref() == Some(key))
            .map(|(index, _)| index)
    }

    /// The derived copy of template `id`, preferring the category at `paired`.
    fn find(&self, id: &str, paired: Option<usize>) -> Option<(usize, &'a Entity)> {
        paired
            .and_then(|index| Some((index, *self.by_category[index].get(id)?)))
            .or_else(|| self.entities.get(id).copied())
    }
}

/// Pair every master category with at most one derived category.
///
/// Keys carried by a single master category are matched first. The rest
/// take the unused derived category with the largest template overlap, if
/// that overlap reaches [`CATEGORY_OVERLAP_THRESHOLD`]. Categories sharing a
/// key that are still unpaired then match by key in order of appearance.
fn pair_categories(master: &MasterIndex<'_>, derived: &DerivedIndex<'_>) -> Vec<Option<usize>> {
    let mut pairing: Vec<Option<usize>> = vec![None; master.keys.len()];
    let mut used = vec![false; derived.keys.len()];

    for (position, key) in master.keys.iter().enumerate() {
        if master.repeated.contains(key) {
            continue;
        }
        if let Some(index) = derived.unused_with_key(key, &used) {
            pairing[position] = Some(index);
            used[index] = true;
        }
    }

    for position in 0..master.keys.len() {
        if pairing[position].is_some() || master.entity_sets[position].is_empty() {
            continue;
        }
        let wanted = &master.entity_sets[position];

        let mut best: Option<(usize, f64)> = None;
        for (index, templates) in derived.by_category.iter().enumerate() {
            if used[index] || templates.is_empty() {
                continue;
            }
            let shared = wanted.iter().filter(|id| templates.contains_key(*id)).count();
            if shared == 0 {
                continue;
            }
            let score = shared as f64 / wanted.len().max(templates.len()) as f64;
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((index, score));
            }
        }

        if let Some((index, score)) = best
            && score >= CATEGORY_OVERLAP_THRESHOLD
        {
            tracing::debug!(
                category = %master.labels[position],
                derived = %derived.label(index),
                score,
                "paired category by template overlap"
            );
            pairing[position] = Some(index);
            used[index] = true;
        }
    }

    for (position, key) in master.keys.iter().enumerate() {
        if pairing[position].is_some() || !master.repeated.contains(key) {
            continue;
        }
        if let Some(index) = derived.unused_with_key(key, &used) {
            pairing[position] = Some(index);
            used[index] = true;
        }
    }

    pairing
}

fn reconcile_entity(
    label: &str,
    paired: Option<usize>,
    master_entity: &Entity,
    derived: &DerivedIndex<'_>,
    config: &SyncConfiguration,
    changes: &mut Vec<ChangeRecord>,
) -> Entity {
    // Ids were validated while building the master index.
    let id = master_entity.id().unwrap_or_default();

    let Some((derived_position, existing)) = derived.find(id, paired) else {
        tracing::debug!(category = %label, template = id, "adding template");
        changes.push(ChangeRecord::entity(label, id, ChangeKind::AddedEntity));
        for (field, value) in master_entity.fields() {
            if field != ENTITY_ID_FIELD {
                changes.push(ChangeRecord::field(
                    label,
                    Some(id),
                    field,
                    ChangeKind::Added,
                    None,
                    value,
                ));
            }
        }
        return master_entity.clone();
    };

    if paired != Some(derived_position) {
        let from = derived.label(derived_position);
        tracing::debug!(template = id, from = %from, to = %label, "moving template");
        changes.push(ChangeRecord::moved(label, id, &from));
    }

    Entity::new(merge_fields(
        master_entity.fields(),
        existing.fields(),
        config,
        &Scope::entity(label, id),
        changes,
    ))
}

/// Record every template of `derived_category` that the master lacks.
fn record_removals(
    label: &str,
    derived_category: &Category,
    master: &MasterIndex<'_>,
    changes: &mut Vec<ChangeRecord>,
) {
    for id in derived_category.entity_ids() {
        if !master.contains(id) {
            tracing::debug!(category = %label, template = id, "removing template");
            changes.push(ChangeRecord::entity(label, id, ChangeKind::RemovedEntity));
        }
    }
}

/// Where a field merge happens, for records and diagnostics.
struct Scope<'a> {
    category: &'a str,
    entity: Option<&'a str>,
    classify: fn(&str) -> FieldClass,
}

impl<'a> Scope<'a> {
    fn category(category: &'a str) -> Self {
        Self {
            category,
            entity: None,
            classify: classify_category_field,
        }
    }

    fn entity(category: &'a str, id: &'a str) -> Self {
        Self {
            category,
            entity: Some(id),
            classify,
        }
    }
}

/// Merge one field map. The result holds exactly the master's fields, in the
/// master's order.
fn merge_fields(
    master: &Fields,
    derived: &Fields,
    config: &SyncConfiguration,
    scope: &Scope<'_>,
    changes: &mut Vec<ChangeRecord>,
) -> Fields {
    let mut merged = Fields::with_capacity(master.len());

    for (field, master_value) in master {
        if scope.entity.is_some() && field == ENTITY_ID_FIELD {
            merged.insert(field.clone(), master_value.clone());
            continue;
        }

        let class = (scope.classify)(field);
        let current = derived.get(field);
        let (value, kind) = decide(class, master_value, current, config);

        if class == FieldClass::AlwaysSync
            && let Some(current) = current
            && std::mem::discriminant(current) != std::mem::discriminant(master_value)
        {
            tracing::warn!(
                category = %scope.category,
                template = scope.entity.unwrap_or("-"),
                field = %field,
                master_type = type_name(master_value),
                derived_type = type_name(current),
                "type mismatch, master value wins"
            );
        }

        if let Some(kind) = kind {
            tracing::debug!(
                category = %scope.category,
                template = scope.entity.unwrap_or("-"),
                field = %field,
                decision = %kind,
                "field decision"
            );
            changes.push(ChangeRecord::field(
                scope.category,
                scope.entity,
                field,
                kind,
                current,
                master_value,
            ));
        }

        merged.insert(field.clone(), value.clone());
    }

    merged
}

/// Pick the value a field ends up with and the decision to record, if any.
fn decide<'v>(
    class: FieldClass,
    master: &'v Value,
    current: Option<&'v Value>,
    config: &SyncConfiguration,
) -> (&'v Value, Option<ChangeKind>) {
    let Some(current) = current else {
        return (master, Some(ChangeKind::Added));
    };

    match class {
        FieldClass::AlwaysSync if current != master => (master, Some(ChangeKind::AutoSynced)),
        FieldClass::AlwaysSync => (master, None),
        FieldClass::TranslationProtected | FieldClass::TagProtected => {
            if !config.forces(class) {
                (current, Some(ChangeKind::Preserved))
            } else if values_differ(class, current, master) {
                (master, Some(ChangeKind::ForceOverwritten))
            } else {
                (current, None)
            }
        }
        FieldClass::Other => (current, None),
    }
}

/// Tag lists compare as sets; everything else compares exactly.
fn values_differ(class: FieldClass, current: &Value, master: &Value) -> bool {
    match (class, current, master) {
        (FieldClass::TagProtected, Value::Array(a), Value::Array(b)) => {
            !(a.iter().all(|tag| b.contains(tag)) && b.iter().all(|tag| a.contains(tag)))
        }
        _ => current != master,
    }
}
