//! Bundled static content document (JSON or JSONC).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{error, info};

use super::error::{ConfigError, Origin};
use super::jsonc::strip_jsonc;

/// The static fallback document at a fixed path.
#[derive(Debug, Clone)]
pub struct StaticDocument {
    path: PathBuf,
}

impl StaticDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the document. Both failures are fatal to resolution.
    pub async fn load(&self) -> Result<Value, ConfigError> {
        let shown = self.path.display().to_string();

        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            error!(path = %shown, error = %e, "static_document_read_failed");
            match e.kind() {
                ErrorKind::NotFound => {
                    ConfigError::Unavailable(format!("static document {shown} not found"))
                }
                _ => ConfigError::Unavailable(format!("static document {shown} unreadable: {e}")),
            }
        })?;

        let value = parse_document(&text)?;
        info!(path = %shown, length = text.len(), "static_document_loaded");
        Ok(value)
    }
}

/// Parse JSON or JSONC text into a raw document.
pub fn parse_document(text: &str) -> Result<Value, ConfigError> {
    serde_json::from_str(&strip_jsonc(text)).map_err(|e| {
        error!(error = %e, "static_document_parse_failed");
        ConfigError::Malformed {
            origin: Origin::StaticDocument,
            message: format!("invalid JSON: {e}"),
        }
    })
}
