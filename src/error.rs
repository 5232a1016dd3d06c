// src/error.rs
// =============================================================================
// Error type shared by the checking modules.
//
// Only "whole run" failures live here. A single link that cannot be reached
// is NOT an error: it becomes a failing Verdict (see checker::verdict).
//
// Rust concepts:
// - thiserror: derive Display/Error for an enum of failure cases
// - #[from]: lets the ? operator convert library errors automatically
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    /// The document does not have the region/site shape at the top level
    #[error("malformed document: {0}")]
    Structure(String),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// The shared HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("concurrency limiter was closed")]
    LimiterClosed,
}

impl CheckError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CheckError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
