//! Field classification
//!
//! A fixed lookup from field name to the merge policy the reconciler applies.

use serde::{Deserialize, Serialize};

/// Merge policy for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldClass {
    /// Derived value is always replaced by the master value.
    AlwaysSync,
    /// Translated text; kept unless language fields are force-synced.
    TranslationProtected,
    /// Translated tag list; kept unless tags are force-synced.
    TagProtected,
    /// Anything else; copied only when missing.
    Other,
}

/// Classify a template field.
pub fn classify(field: &str) -> FieldClass {
    match field {
        "models" | "date" | "size" | "mediaType" | "mediaSubtype" | "tutorialUrl"
        | "thumbnailVariant" => FieldClass::AlwaysSync,
        "title" | "description" => FieldClass::TranslationProtected,
        "tags" => FieldClass::TagProtected,
        _ => FieldClass::Other,
    }
}

/// Classify a category header field.
///
/// Only the category title is translated; the rest of the header mirrors
/// the master.
pub fn classify_category_field(field: &str) -> FieldClass {
    match field {
        "title" => FieldClass::TranslationProtected,
        _ => FieldClass::AlwaysSync,
    }
}

impl FieldClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlwaysSync => "always-sync",
            Self::TranslationProtected => "translation-protected",
            Self::TagProtected => "tag-protected",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for FieldClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
