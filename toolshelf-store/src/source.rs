//! Where the shipped catalog document comes from.
//!
//! The document is a JSON array of raw records, served either from a local
//! path or over HTTP. A failed fetch is not fatal to the store; it falls
//! through to the built-in defaults.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde_json::Value;
use thiserror::Error;
use toolshelf_catalog::{JsonError, parse_tool_array};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Document is not a JSON array")]
    NotAnArray,
}

impl From<JsonError> for SourceError {
    fn from(err: JsonError) -> Self {
        match err {
            JsonError::Io { path, source } => Self::Io { path, source },
            JsonError::Parse(e) => Self::Json(e),
            JsonError::NotAnArray | JsonError::InvalidFileType(_) => Self::NotAnArray,
        }
    }
}

/// Supplies the raw records of the shipped catalog document.
pub trait DocumentSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<Value>, SourceError>;

    /// Human-readable location, for logs and `config show`.
    fn describe(&self) -> String;
}

/// A document on the local filesystem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for FileSource {
    fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        let text = std::fs::read_to_string(&self.path).map_err(|e| SourceError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;
        Ok(parse_tool_array(&text)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A document fetched over HTTP, bypassing intermediate caches.
pub struct HttpSource {
    url: String,
    http: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        let response = self
            .http
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()?
            .error_for_status()?;
        let text = response.text()?;
        Ok(parse_tool_array(&text)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Pick a source for `location`: `http://` and `https://` go over the
/// network, anything else is a path.
pub fn source_for(location: &str) -> Result<Box<dyn DocumentSource>, SourceError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}
