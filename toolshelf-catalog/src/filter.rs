//! Composable filter predicates over a normalized collection.
//!
//! Every browsing surface (the main listing, the featured strip, the
//! category chips) shares one [`FilterState`] and runs it through [`apply`].
//! Predicates are independent and all must pass, so each surface can change
//! its own piece of the state without caring about the others.

use url::form_urlencoded;

use crate::types::{PricingTier, Tool};

/// Category value that disables the category predicate.
pub const ALL_CATEGORIES: &str = "All";

/// Most records shown in the featured strip.
pub const FEATURED_LIMIT: usize = 24;

/// Current predicate selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Exact category to match; empty or `"All"` matches everything.
    pub category: String,
    /// Free-text query matched against name, description and category.
    pub query: String,
    pub verified_only: bool,
    pub pricing: Option<PricingTier>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn verified_only(mut self, verified_only: bool) -> Self {
        self.verified_only = verified_only;
        self
    }

    pub fn with_pricing(mut self, pricing: Option<PricingTier>) -> Self {
        self.pricing = pricing;
        self
    }

    /// Whether the category predicate is active.
    pub fn has_category(&self) -> bool {
        !self.category.is_empty() && self.category != ALL_CATEGORIES
    }

    /// Read `category` and `q` from a query string such as `category=Coding&q=copilot`.
    ///
    /// A leading `?` is accepted. Unknown parameters are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut state = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "category" if !value.is_empty() => state.category = value.into_owned(),
                "q" if !value.is_empty() => state.query = value.into_owned(),
                _ => {}
            }
        }
        state
    }

    /// Render the shareable part of the state back to a query string.
    ///
    /// Only `category` and `q` are shareable; `"All"` and blank values are
    /// left out rather than written as empty parameters.
    pub fn to_query(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if self.has_category() {
            out.append_pair("category", &self.category);
        }
        let q = self.query.trim();
        if !q.is_empty() {
            out.append_pair("q", q);
        }
        out.finish()
    }

    /// Check a single record against every active predicate.
    pub fn matches(&self, tool: &Tool) -> bool {
        self.matches_category(tool)
            && matches_query(tool, &self.query.trim().to_lowercase())
            && (!self.verified_only || tool.verified)
            && self
                .pricing
                .is_none_or(|tier| tool.pricing_tier() == Some(tier))
    }

    fn matches_category(&self, tool: &Tool) -> bool {
        !self.has_category() || tool.category == self.category
    }
}

fn matches_query(tool: &Tool, needle: &str) -> bool {
    needle.is_empty()
        || tool.name.to_lowercase().contains(needle)
        || tool.description.to_lowercase().contains(needle)
        || tool.category.to_lowercase().contains(needle)
}

/// Return the records matching `state`, in collection order.
pub fn apply<'a>(tools: &'a [Tool], state: &FilterState) -> Vec<&'a Tool> {
    tools.iter().filter(|t| state.matches(t)).collect()
}

/// Featured records matching `state`, at most `limit` of them.
pub fn featured<'a>(tools: &'a [Tool], state: &FilterState, limit: usize) -> Vec<&'a Tool> {
    tools
        .iter()
        .filter(|t| t.featured && state.matches(t))
        .take(limit)
        .collect()
}

/// Substring filter used by the admin table.
///
/// Unlike [`FilterState`], every field here is a case-insensitive substring
/// match, so an admin can type a partial category or section.
#[derive(Debug, Clone, Default)]
pub struct AdminFilter {
    pub name: String,
    pub category: String,
    pub section: String,
}

impl AdminFilter {
    pub fn matches(&self, tool: &Tool) -> bool {
        contains_ci(&tool.name, &self.name)
            && contains_ci(&tool.category, &self.category)
            && contains_ci(&tool.section, &self.section)
    }

    pub fn apply<'a>(&self, tools: &'a [Tool]) -> Vec<&'a Tool> {
        tools.iter().filter(|t| self.matches(t)).collect()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
