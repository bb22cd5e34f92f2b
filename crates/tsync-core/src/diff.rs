//! Text diffs between a derived file and its reconciled rendering

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// Lines of context around each hunk
const CONTEXT_LINES: usize = 3;

/// What a sync would change in one language file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageDiff {
    pub language: String,
    pub path: String,
    /// Unified diff, empty when nothing would change
    pub unified: String,
    pub added_lines: usize,
    pub removed_lines: usize,
    /// Similarity ratio (0.0 to 1.0)
    pub similarity: f64,
}

impl LanguageDiff {
    /// Diff `current` (empty when the file does not exist) against `updated`.
    pub fn compute(language: &str, path: &str, current: &str, updated: &str) -> Self {
        if current == updated {
            return Self {
                language: language.to_string(),
                path: path.to_string(),
                unified: String::new(),
                added_lines: 0,
                removed_lines: 0,
                similarity: 1.0,
            };
        }

        let old_header = format!("a/{}", path);
        let new_header = format!("b/{}", path);
        let text_diff = TextDiff::from_lines(current, updated);
        let (mut added_lines, mut removed_lines) = (0, 0);
        for change in text_diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => added_lines += 1,
                ChangeTag::Delete => removed_lines += 1,
                ChangeTag::Equal => {}
            }
        }

        let unified = text_diff
            .unified_diff()
            .context_radius(CONTEXT_LINES)
            .header(&old_header, &new_header)
            .to_string();

        Self {
            language: language.to_string(),
            path: path.to_string(),
            unified,
            added_lines,
            removed_lines,
            similarity: text_diff.ratio() as f64,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.unified.is_empty()
    }
}
