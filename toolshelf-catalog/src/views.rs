//! Derived views over a collection: category lists, per-category sections
//! and dashboard counters.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::filter::ALL_CATEGORIES;
use crate::types::Tool;

/// Categories that are always offered, even before any data mentions them.
pub const BASE_CATEGORIES: &[&str] = &[
    ALL_CATEGORIES,
    "AI Writing",
    "Image",
    "Video",
    "Coding",
    "Marketing",
];

/// Number of records shown in the dashboard's "latest" list.
pub const LATEST_COUNT: usize = 5;

/// The built-in categories followed by any new ones found in `tools`,
/// in first-seen order.
pub fn known_categories(tools: &[Tool]) -> Vec<String> {
    let mut seen = HashSet::new();
    BASE_CATEGORIES
        .iter()
        .map(|c| c.to_string())
        .chain(tools.iter().map(|t| t.category.clone()))
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

/// One category's block in the sectioned listing.
#[derive(Debug, Clone)]
pub struct CategorySection<'a> {
    pub category: &'a str,
    pub tools: Vec<&'a Tool>,
}

/// Group records by category. Categories and the records inside each are
/// sorted by name, case-insensitively.
pub fn category_sections(tools: &[Tool]) -> Vec<CategorySection<'_>> {
    let mut categories: Vec<&str> = tools
        .iter()
        .map(|t| t.category.as_str())
        .filter(|c| !c.is_empty())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    categories.sort_by(|a, b| display_order(a, b));

    categories
        .into_iter()
        .map(|category| {
            let mut members: Vec<&Tool> =
                tools.iter().filter(|t| t.category == category).collect();
            members.sort_by(|a, b| display_order(&a.name, &b.name));
            CategorySection {
                category,
                tools: members,
            }
        })
        .collect()
}

/// Dashboard counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub total: usize,
    pub featured: usize,
    pub categories: usize,
    /// Names of the newest records (the head of the collection).
    pub latest: Vec<String>,
}

pub fn catalog_stats(tools: &[Tool]) -> CatalogStats {
    CatalogStats {
        total: tools.len(),
        featured: tools.iter().filter(|t| t.featured).count(),
        categories: tools
            .iter()
            .map(|t| t.category.as_str())
            .collect::<HashSet<_>>()
            .len(),
        latest: tools
            .iter()
            .take(LATEST_COUNT)
            .map(|t| t.name.clone())
            .collect(),
    }
}

fn display_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
