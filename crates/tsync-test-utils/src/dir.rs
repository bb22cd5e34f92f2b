//! [`TemplatesDir`] builder for template-sync test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// A temporary templates directory with helpers for setup and assertions.
///
/// # Example
///
/// ```rust,no_run
/// use serde_json::json;
/// use tsync_test_utils::TemplatesDir;
///
/// let dir = TemplatesDir::new();
/// dir.write_master(&json!([{"moduleName": "default", "templates": []}]));
/// dir.write_language("ja", &json!([]));
/// dir.assert_file_exists("index.ja.json");
/// ```
pub struct TemplatesDir {
    temp_dir: TempDir,
}

impl Default for TemplatesDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplatesDir {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `name` inside the directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Write `index.json`, pretty-printed.
    pub fn write_master(&self, value: &Value) {
        self.write_json("index.json", value);
    }

    /// Write `index.<code>.json`, pretty-printed.
    pub fn write_language(&self, code: &str, value: &Value) {
        self.write_json(&format!("index.{code}.json"), value);
    }

    pub fn write_json(&self, name: &str, value: &Value) {
        self.write_file(name, &serde_json::to_string_pretty(value).unwrap());
    }

    /// Write raw text, creating parent directories.
    pub fn write_file(&self, name: &str, content: &str) {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }

    pub fn read_text(&self, name: &str) -> String {
        let path = self.path(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    pub fn read_json(&self, name: &str) -> Value {
        serde_json::from_str(&self.read_text(name)).unwrap()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    /// # Panics
    /// Panics if `name` does not exist.
    pub fn assert_file_exists(&self, name: &str) {
        assert!(
            self.exists(name),
            "Expected file to exist: {}",
            self.path(name).display()
        );
    }

    /// # Panics
    /// Panics if `name` exists.
    pub fn assert_file_not_exists(&self, name: &str) {
        assert!(
            !self.exists(name),
            "Expected file NOT to exist: {}",
            self.path(name).display()
        );
    }

    /// Names of the entries directly under `name`, sorted.
    pub fn list(&self, name: &str) -> Vec<String> {
        let mut entries: Vec<String> = match fs::read_dir(self.path(name)) {
            Ok(read) => read
                .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        entries.sort();
        entries
    }
}
