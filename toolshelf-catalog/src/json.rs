//! JSON text handling for catalog documents.
//!
//! Pasted text and uploaded files go through [`sanitize_json_text`] before
//! parsing: copy/paste from web pages and some editors leaves a byte-order
//! mark or zero-width characters behind that `serde_json` rejects.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::types::Tool;

/// Default file name offered for exports.
pub const EXPORT_FILE_NAME: &str = "tools-export.json";

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("JSON must be an array of tools")]
    NotAnArray,
    #[error("Invalid file type: {0} (expected a .json file)")]
    InvalidFileType(String),
}

/// Remove a leading BOM and every zero-width character, then trim.
pub fn sanitize_json_text(text: &str) -> String {
    text.strip_prefix('\u{FEFF}')
        .unwrap_or(text)
        .chars()
        .filter(|c| !matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Sanitize and parse text that must hold a JSON array of records.
pub fn parse_tool_array(text: &str) -> Result<Vec<Value>, JsonError> {
    let cleaned = sanitize_json_text(text);
    match serde_json::from_str(&cleaned)? {
        Value::Array(items) => Ok(items),
        _ => Err(JsonError::NotAnArray),
    }
}

/// Reject anything without a `.json` extension (case-insensitive).
pub fn ensure_json_extension(path: &Path) -> Result<(), JsonError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(())
    } else {
        Err(JsonError::InvalidFileType(path.display().to_string()))
    }
}

/// Read a `.json` file holding an array of records.
pub fn read_tool_file(path: &Path) -> Result<Vec<Value>, JsonError> {
    ensure_json_extension(path)?;
    let contents = std::fs::read_to_string(path).map_err(|e| JsonError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let items = parse_tool_array(&contents)?;
    log::debug!("Read {} records from {}", items.len(), path.display());
    Ok(items)
}

/// Serialize a collection as indented JSON.
pub fn export_json(tools: &[Tool]) -> Result<String, JsonError> {
    Ok(serde_json::to_string_pretty(tools)?)
}
