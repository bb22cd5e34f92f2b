//! In-memory model of a template index
//!
//! An index file is a JSON array of categories. Each category is an object
//! whose `templates` member lists the templates (entities) it contains;
//! every other member is a category-level field. Templates are keyed by their
//! `name` field.
//!
//! Construction is lenient: structure that is missing or of the wrong shape
//! below the root is treated as absent. Whether that is acceptable is decided
//! by the reconciler, which is strict about the master only.

use serde_json::{Map, Value};

use crate::{Error, Result};

/// Field holding a template's identifier.
pub const ENTITY_ID_FIELD: &str = "name";

/// Category member holding the template list.
pub const ENTITIES_FIELD: &str = "templates";

/// Category fields combined into an identifier when `name` is absent.
pub const CATEGORY_KEY_FIELDS: [&str; 3] = ["moduleName", "category", "type"];

/// Ordered field map of a template or category.
pub type Fields = Map<String, Value>;

/// A single template: an ordered map of field name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    fields: Fields,
}

impl Entity {
    pub fn new(fields: Fields) -> Self {
        Self { fields }
    }

    /// The template name, if present and a string.
    pub fn id(&self) -> Option<&str> {
        self.fields.get(ENTITY_ID_FIELD).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// A category: header fields plus an ordered list of templates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    fields: Fields,
    entities: Vec<Entity>,
}

impl Category {
    /// Build a category. A stray `templates` member in `fields` is discarded.
    pub fn new(mut fields: Fields, entities: Vec<Entity>) -> Self {
        fields.remove(ENTITIES_FIELD);
        Self { fields, entities }
    }

    /// Identifier used to pair this category with its counterpart.
    ///
    /// An explicit string `name` wins. Otherwise the present string values of
    /// `moduleName`, `category` and `type` are joined with `/`. `None` when
    /// none of these exist.
    pub fn key(&self) -> Option<String> {
        if let Some(name) = self.fields.get(ENTITY_ID_FIELD).and_then(Value::as_str) {
            return Some(name.to_string());
        }

        let parts: Vec<&str> = CATEGORY_KEY_FIELDS
            .iter()
            .filter_map(|field| self.fields.get(*field).and_then(Value::as_str))
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Ids of the templates that have one, in order.
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.entities.iter().filter_map(Entity::id)
    }

    fn from_value(index: usize, value: Value) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            tracing::warn!(index, "skipping category that is not an object");
            return None;
        };

        let entities = match fields.remove(ENTITIES_FIELD) {
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .filter_map(|(position, item)| match item {
                    Value::Object(entity) => Some(Entity::new(entity)),
                    _ => {
                        tracing::warn!(
                            category = index,
                            position,
                            "skipping template that is not an object"
                        );
                        None
                    }
                })
                .collect(),
            Some(_) => {
                tracing::warn!(index, "category `templates` is not a list, treating as empty");
                Vec::new()
            }
            None => Vec::new(),
        };

        Some(Self { fields, entities })
    }

    fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        let templates = self
            .entities
            .iter()
            .map(|entity| Value::Object(entity.fields.clone()))
            .collect();
        object.insert(ENTITIES_FIELD.to_string(), Value::Array(templates));
        Value::Object(object)
    }
}

/// A whole index file: categories in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    categories: Vec<Category>,
}

impl Document {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of templates across all categories.
    pub fn template_count(&self) -> usize {
        self.categories.iter().map(|c| c.entities.len()).sum()
    }

    /// Find a template by id anywhere in the document.
    pub fn find_entity(&self, id: &str) -> Option<(&Category, &Entity)> {
        self.categories.iter().find_map(|category| {
            category
                .entities
                .iter()
                .find(|entity| entity.id() == Some(id))
                .map(|entity| (category, entity))
        })
    }

    /// Build a document from a parsed JSON value.
    ///
    /// The root must be an array; anything below it is taken leniently.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(Error::InvalidDocument {
                message: format!("expected a list of categories, found {}", type_name(&value)),
            });
        };

        let categories = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| Category::from_value(index, item))
            .collect();

        Ok(Self { categories })
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.categories.iter().map(Category::to_value).collect())
    }
}

/// JSON type name used in diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
