//! User settings: where the store lives and which catalog document to load.
//!
//! Settings are kept in `~/.config/toolshelf/settings.toml`:
//!
//! ```toml
//! [store]
//! dir = "/home/me/.local/share/toolshelf"
//!
//! [source]
//! document = "https://example.com/tools.json"
//! ```
//!
//! Each value resolves through the same chain: command-line override, then
//! the settings file, then a built-in default.

use std::io;
use std::path::{Path, PathBuf};

/// Document loaded when nothing else is configured.
pub const DEFAULT_DOCUMENT: &str = "tools.json";

/// Settings keys accepted by [`save_setting`], as `section.key`.
pub const KNOWN_SETTINGS: &[&str] = &["store.dir", "source.document"];

/// Canonical path to the settings file: `~/.config/toolshelf/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("toolshelf").join("settings.toml")
}

/// Default store directory: `~/.local/share/toolshelf` on Linux.
pub fn default_store_dir() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("toolshelf")
}

/// Resolve the store directory:
///
/// 1. CLI override (if `Some`)
/// 2. Saved `store.dir`
/// 3. [`default_store_dir`]
pub fn resolve_store_dir(cli_override: Option<PathBuf>) -> PathBuf {
    resolve_store_dir_in(&settings_path(), cli_override)
}

pub fn resolve_store_dir_in(settings: &Path, cli_override: Option<PathBuf>) -> PathBuf {
    cli_override
        .or_else(|| read_setting(settings, "store", "dir").map(PathBuf::from))
        .unwrap_or_else(default_store_dir)
}

/// Resolve the document location (path or URL) with the same chain.
pub fn resolve_document(cli_override: Option<String>) -> String {
    resolve_document_in(&settings_path(), cli_override)
}

pub fn resolve_document_in(settings: &Path, cli_override: Option<String>) -> String {
    cli_override
        .or_else(|| read_setting(settings, "source", "document"))
        .unwrap_or_else(|| DEFAULT_DOCUMENT.to_string())
}

/// Read `[section] key` as a non-empty string.
pub fn read_setting(settings: &Path, section: &str, key: &str) -> Option<String> {
    let contents = std::fs::read_to_string(settings).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    let value = doc.get(section)?.get(key)?.as_str()?;
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Save (or clear, with `None`) a `section.key` setting in the settings file.
pub fn save_setting(name: &str, value: Option<&str>) -> io::Result<()> {
    save_setting_in(&settings_path(), name, value)
}

/// Save (or clear) a setting in `settings`.
///
/// Uses `toml::Value` for a surgical update so unrelated entries are
/// preserved, and writes through a temporary file.
pub fn save_setting_in(settings: &Path, name: &str, value: Option<&str>) -> io::Result<()> {
    if !KNOWN_SETTINGS.contains(&name) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unknown setting '{name}' (expected one of {})", KNOWN_SETTINGS.join(", ")),
        ));
    }
    let Some((section, key)) = name.split_once('.') else {
        return Err(io::Error::other(format!("malformed setting name '{name}'")));
    };

    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(settings) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let section_value = table
        .entry(section)
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let section_table = section_value
        .as_table_mut()
        .ok_or_else(|| io::Error::other(format!("[{section}] is not a table")))?;

    match value {
        Some(v) => {
            section_table.insert(key.to_string(), toml::Value::String(v.to_string()));
        }
        None => {
            section_table.remove(key);
        }
    }

    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, settings)?;

    log::debug!("Saved {} in {}", name, settings.display());
    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}
