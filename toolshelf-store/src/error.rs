use thiserror::Error;
use toolshelf_catalog::JsonError;
use toolshelf_import::ImportError;

use crate::source::SourceError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
    #[error("No tool with id '{0}'")]
    NotFound(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Document source error: {0}")]
    Source(#[from] SourceError),
    #[error("Invalid store key '{0}'")]
    InvalidKey(String),
    #[error("An import is already running")]
    ImportInProgress,
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl From<JsonError> for StoreError {
    fn from(e: JsonError) -> Self {
        Self::Import(ImportError::from(e))
    }
}
