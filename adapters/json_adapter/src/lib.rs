use sales_core::error::LoadError;
use sales_core::ports::SourceLoader;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// JSON file implementation of the SourceLoader trait
/// Source identifiers are file paths, read as UTF-8
#[derive(Debug, Default, Clone)]
pub struct JsonFileLoader;

impl JsonFileLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parses already-read text; split out so the parse path can be tested on its own
    pub fn parse(source_id: &str, content: &str) -> Result<Value, LoadError> {
        serde_json::from_str(content).map_err(|e| LoadError::Malformed {
            source_id: source_id.to_string(),
            reason: e.to_string(),
        })
    }
}

impl SourceLoader for JsonFileLoader {
    fn load(&self, source_id: &str) -> Result<Value, LoadError> {
        let path = Path::new(source_id);
        debug!(path = %path.display(), "Reading JSON source");

        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::NotFound {
                source_id: source_id.to_string(),
            },
            _ => LoadError::Unreadable {
                source_id: source_id.to_string(),
                reason: e.to_string(),
            },
        })?;

        let value = Self::parse(source_id, &content)?;
        info!(path = %path.display(), bytes = content.len(), "JSON source loaded");
        Ok(value)
    }
}
