use thiserror::Error;
use toolshelf_catalog::JsonError;

/// Failures that abort an import as a whole.
///
/// Individual bad records never produce an error; they are counted as
/// rejected in [`ImportStats`](crate::ImportStats).
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid JSON format: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("JSON must be an array of tools")]
    NotAnArray,

    #[error("Invalid file type: {0} (please select a .json file)")]
    InvalidFileType(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl From<JsonError> for ImportError {
    fn from(err: JsonError) -> Self {
        match err {
            JsonError::Io { path, source } => Self::Io { path, source },
            JsonError::Parse(e) => Self::Parse(e),
            JsonError::NotAnArray => Self::NotAnArray,
            JsonError::InvalidFileType(name) => Self::InvalidFileType(name),
        }
    }
}
