//! Checklist store error taxonomy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChecklistError {
    #[error("no checklist file found for region {region} (searched: {searched:?})")]
    NotFound { region: String, searched: Vec<String> },

    #[error("failed to read checklist file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse checklist JSON at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("checklist at {path} has duplicate check id '{id}'")]
    DuplicateCheckId { path: String, id: String },

    #[error("checklist region '{declared}' does not match requested region '{requested}'")]
    RegionMismatch { declared: String, requested: String },

    #[error("failed to write checklist file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}
