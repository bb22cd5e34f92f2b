//! Reading and writing index documents

use tsync_fs::{NormalizedPath, io};

use crate::document::Document;
use crate::format::{FormatOptions, to_pretty_string};
use crate::{Error, Result};

/// Persistence for index documents.
///
/// The engine works only through this trait so tests can substitute an
/// in-memory store.
pub trait DocumentStore: Send + Sync {
    /// Parse document text read from `path`.
    fn parse(&self, path: &NormalizedPath, text: &str) -> Result<Document>;

    /// Render a document to the exact text that would be written.
    fn render(&self, document: &Document) -> Result<String>;

    /// Read the raw text at `path`.
    fn read(&self, path: &NormalizedPath) -> Result<String> {
        Ok(io::read_text(path)?)
    }

    /// Persist already-rendered text.
    fn write_rendered(&self, path: &NormalizedPath, text: &str) -> Result<()>;

    /// Read and parse the document at `path`.
    fn load(&self, path: &NormalizedPath) -> Result<Document> {
        let text = self.read(path)?;
        self.parse(path, &text)
    }

    /// Render and persist a document.
    fn write(&self, path: &NormalizedPath, document: &Document) -> Result<()> {
        let text = self.render(document)?;
        self.write_rendered(path, &text)
    }
}

/// Documents stored as JSON files on disk.
#[derive(Debug, Clone, Default)]
pub struct JsonDocumentStore {
    options: FormatOptions,
}

impl JsonDocumentStore {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }
}

impl DocumentStore for JsonDocumentStore {
    fn parse(&self, path: &NormalizedPath, text: &str) -> Result<Document> {
        let value: serde_json::Value = serde_json::from_str(text).map_err(|e| Error::Parse {
            path: path.to_native(),
            message: e.to_string(),
        })?;
        Document::from_value(value).map_err(|e| match e {
            Error::InvalidDocument { message } => Error::Parse {
                path: path.to_native(),
                message,
            },
            other => other,
        })
    }

    fn render(&self, document: &Document) -> Result<String> {
        Ok(to_pretty_string(&document.to_value(), self.options)?)
    }

    fn write_rendered(&self, path: &NormalizedPath, text: &str) -> Result<()> {
        io::write_text(path, text)?;
        tracing::info!(path = %path, "saved index");
        Ok(())
    }
}
