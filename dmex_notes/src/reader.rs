use async_trait::async_trait;
use dmex_core::NoteSource;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::error::{NoteError, Result};

/// Used when the note file is missing, blank or unreadable as text.
pub const FALLBACK_NOTE: &str =
    "Patient needs a CPAP with full face mask and humidifier. AHI > 20. Ordered by Dr. Cameron.";

/// Keys checked, in order, when a note arrives wrapped in a JSON object.
const WRAPPER_KEYS: [&str; 3] = ["data", "note", "content"];

/// Reads a physician note from disk, plain text or JSON-wrapped.
#[derive(Debug, Clone)]
pub struct FileNoteReader {
    path: PathBuf,
    fallback: String,
}

impl FileNoteReader {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback: FALLBACK_NOTE.to_string(),
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the note, substituting the fallback where the file cannot serve one.
    pub async fn read(&self) -> Result<String> {
        let path = self.path.display();

        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Physician note file not found at path: {path}. Using fallback content.");
                return Ok(self.fallback.clone());
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Physician note at {path} is not valid UTF-8: {e}. Using fallback content.");
                return Ok(self.fallback.clone());
            }
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                error!("Access denied when reading physician note file: {path}");
                return Err(NoteError::AccessDenied {
                    path: self.path.clone(),
                });
            }
            Err(e) => {
                error!("IO error when reading physician note file: {path}: {e}");
                return Err(NoteError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        info!("Read physician note from file: {path}");

        if content.trim().is_empty() {
            warn!("Physician note file is empty. Using fallback content.");
            return Ok(self.fallback.clone());
        }

        Ok(unwrap_json_note(content))
    }
}

/// Pull the note out of a JSON wrapper such as `{"data": "..."}`.
///
/// Plain text, JSON that is not an object, and objects without a known key
/// come back unchanged.
#[must_use]
pub fn unwrap_json_note(content: String) -> String {
    let Ok(serde_json::Value::Object(mut object)) = serde_json::from_str(&content) else {
        debug!("Content is plain text format");
        return content;
    };

    for key in WRAPPER_KEYS {
        if let Some(value) = object.remove(key) {
            debug!("Found JSON-wrapped note with '{key}' property");
            return match value {
                serde_json::Value::String(text) => text,
                other => other.to_string(),
            };
        }
    }

    debug!("JSON detected but no recognized note property found. Using raw JSON.");
    content
}

#[async_trait]
impl NoteSource for FileNoteReader {
    async fn read_note(&self) -> anyhow::Result<String> {
        Ok(self.read().await?)
    }
}
