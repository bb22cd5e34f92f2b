//! Derived index files: naming, discovery and selection
//!
//! A derived file sits next to the master and carries the language code
//! between the master's stem and its extension: `index.json` becomes
//! `index.zh-TW.json`.

use std::sync::LazyLock;

use regex::Regex;
use tsync_fs::{NormalizedPath, SyncPath};

use crate::config::SyncSettings;
use crate::{Error, Result};

/// Languages synchronized when settings name none and discovery is off.
pub const DEFAULT_LANGUAGES: [&str; 7] = ["zh", "zh-TW", "ja", "ko", "es", "fr", "ru"];

static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").expect("language code pattern is valid")
});

/// Whether `code` looks like a BCP 47 style language tag.
///
/// Anything accepted here is safe to splice into a file name.
pub fn is_valid_code(code: &str) -> bool {
    CODE_PATTERN.is_match(code)
}

/// A derived index file for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageFile {
    pub code: String,
    pub path: NormalizedPath,
}

impl LanguageFile {
    /// The derived file for `code` next to `master`.
    pub fn for_master(master: &NormalizedPath, code: &str) -> Result<Self> {
        if !is_valid_code(code) {
            return Err(Error::Settings {
                message: format!("invalid language code '{}'", code),
            });
        }
        let file_name = file_name_for(master.file_name().unwrap_or_default(), code);
        let path = match master.parent() {
            Some(dir) => dir.join(&file_name),
            None => NormalizedPath::new(&file_name),
        };
        Ok(Self {
            code: code.to_string(),
            path,
        })
    }
}

/// `index.json` + `ja` -> `index.ja.json`
pub fn file_name_for(master_file_name: &str, code: &str) -> String {
    let stem = master_file_name
        .strip_suffix(".json")
        .unwrap_or(master_file_name);
    format!("{}.{}.json", stem, code)
}

/// Find every derived file next to `master`, sorted by language code.
///
/// Files whose middle segment is not a language code (the JSON schema, for
/// one) are skipped.
pub fn discover(master: &NormalizedPath) -> Result<Vec<LanguageFile>> {
    let dir = master.parent().unwrap_or_else(|| NormalizedPath::new("."));
    let master_name = master.file_name().unwrap_or_default();
    let stem = master_name.strip_suffix(".json").unwrap_or(master_name);

    let pattern = Regex::new(&format!(r"^{}\.(.+)\.json$", regex::escape(stem))).map_err(|e| {
        Error::Settings {
            message: format!("cannot match files for master '{}': {}", master_name, e),
        }
    })?;

    let native = dir.to_native();
    let entries =
        std::fs::read_dir(&native).map_err(|e| Error::from(tsync_fs::Error::io(&native, e)))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::from(tsync_fs::Error::io(&native, e)))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == SyncPath::IndexSchema.as_str() {
            continue;
        }
        let Some(code) = pattern.captures(&name).and_then(|c| c.get(1)) else {
            continue;
        };
        if !is_valid_code(code.as_str()) {
            tracing::debug!(file = %name, "ignoring file that is not a language index");
            continue;
        }
        if !entry.path().is_file() {
            continue;
        }
        found.push(LanguageFile {
            code: code.as_str().to_string(),
            path: dir.join(&name),
        });
    }

    found.sort_by(|a, b| a.code.cmp(&b.code));
    Ok(found)
}

/// The languages a run covers, in the order they will be processed.
///
/// Explicit settings win, then discovery when enabled, then
/// [`DEFAULT_LANGUAGES`].
pub fn resolve(master: &NormalizedPath, settings: &SyncSettings) -> Result<Vec<LanguageFile>> {
    if let Some(codes) = &settings.languages {
        return codes
            .iter()
            .map(|code| LanguageFile::for_master(master, code))
            .collect();
    }
    if settings.discover {
        return discover(master);
    }
    DEFAULT_LANGUAGES
        .iter()
        .map(|code| LanguageFile::for_master(master, code))
        .collect()
}
