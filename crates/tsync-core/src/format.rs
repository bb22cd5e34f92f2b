//! Stable textual rendering of index documents
//!
//! Output is two-space indented JSON with non-ASCII text written as is.
//! Short lists of plain strings (tags, models) are kept on one line so that
//! hand-edited files stay readable and diffs stay small.

use serde_json::Value;

/// Arrays whose one-item-per-line body would reach this many characters are
/// left multi-line.
pub const COMPACT_ARRAY_LIMIT: usize = 200;

const INDENT: &str = "  ";

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub compact_arrays: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            compact_arrays: true,
        }
    }
}

/// Render `value` as text. The result has no trailing newline.
pub fn to_pretty_string(value: &Value, options: FormatOptions) -> serde_json::Result<String> {
    let mut out = String::new();
    write_value(&mut out, value, 0, options)?;
    Ok(out)
}

fn write_value(
    out: &mut String,
    value: &Value,
    depth: usize,
    options: FormatOptions,
) -> serde_json::Result<()> {
    match value {
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(items) => {
            if options.compact_arrays
                && let Some(line) = compact_line(items, depth)?
            {
                out.push_str(&line);
                return Ok(());
            }
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                write_value(out, item, depth + 1, options)?;
            }
            newline(out, depth);
            out.push(']');
        }
        Value::Object(fields) if fields.is_empty() => out.push_str("{}"),
        Value::Object(fields) => {
            out.push('{');
            for (index, (key, item)) in fields.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                newline(out, depth + 1);
                out.push_str(&serde_json::to_string(key)?);
                out.push_str(": ");
                write_value(out, item, depth + 1, options)?;
            }
            newline(out, depth);
            out.push('}');
        }
        scalar => out.push_str(&serde_json::to_string(scalar)?),
    }
    Ok(())
}

/// The single-line form of a string array, when it qualifies.
///
/// Strings containing brackets disqualify the array. Length is measured on
/// the expanded body (items joined by a comma, newline and indentation).
fn compact_line(items: &[Value], depth: usize) -> serde_json::Result<Option<String>> {
    let mut rendered = Vec::with_capacity(items.len());
    for item in items {
        let Value::String(text) = item else {
            return Ok(None);
        };
        if text.contains(['[', ']']) {
            return Ok(None);
        }
        rendered.push(serde_json::to_string(item)?);
    }

    let separator = 2 + INDENT.len() * (depth + 1);
    let expanded: usize = rendered.iter().map(|s| s.chars().count()).sum::<usize>()
        + separator * rendered.len().saturating_sub(1);

    if expanded >= COMPACT_ARRAY_LIMIT {
        return Ok(None);
    }
    Ok(Some(format!("[{}]", rendered.join(", "))))
}

fn newline(out: &mut String, depth: usize) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
