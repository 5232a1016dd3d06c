// src/document/io.rs
// =============================================================================
// Reads and writes documents.
//
// The format is picked from the file extension:
//   .yaml / .yml -> YAML
//   anything else -> JSON
//
// Both formats are loaded into the same serde_json::Value, so the checker
// never needs to know which one it is working on. JSON objects only have
// string keys: a YAML key like `2024:` comes back out as `'2024':`.
// =============================================================================

use super::Document;
use crate::error::{CheckError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Format::Yaml,
            _ => Format::Json,
        }
    }

    pub fn parse(self, raw: &str) -> Result<Document> {
        Ok(match self {
            Format::Json => serde_json::from_str(raw)?,
            Format::Yaml => serde_yaml::from_str(raw)?,
        })
    }

    pub fn render(self, document: &Document) -> Result<String> {
        Ok(match self {
            Format::Json => serde_json::to_string_pretty(document)?,
            Format::Yaml => serde_yaml::to_string(document)?,
        })
    }
}

pub fn load(path: &Path) -> Result<Document> {
    let raw = std::fs::read_to_string(path).map_err(|e| CheckError::io(path, e))?;
    Format::from_path(path).parse(&raw)
}

pub fn save(path: &Path, document: &Document) -> Result<()> {
    let rendered = Format::from_path(path).render(document)?;
    std::fs::write(path, rendered).map_err(|e| CheckError::io(path, e))
}
