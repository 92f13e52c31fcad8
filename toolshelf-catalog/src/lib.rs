//! Tool catalog data model, field normalization and filtering.
//!
//! This crate has no storage or I/O policy of its own beyond reading a JSON
//! file on request. Consumers normalize raw records into [`Tool`]s here and
//! hand them to `toolshelf-import` or `toolshelf-store`.

pub mod defaults;
pub mod filter;
pub mod json;
pub mod normalize;
pub mod types;
pub mod views;

pub use defaults::builtin_tools;
pub use filter::{ALL_CATEGORIES, AdminFilter, FEATURED_LIMIT, FilterState, apply, featured};
pub use json::{
    EXPORT_FILE_NAME, JsonError, ensure_json_extension, export_json, parse_tool_array,
    read_tool_file, sanitize_json_text,
};
pub use normalize::{normalize, normalize_all, normalize_url};
pub use types::*;
pub use views::{CatalogStats, CategorySection, catalog_stats, category_sections, known_categories};
