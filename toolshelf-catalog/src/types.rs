//! Data model types for the tool catalog.
//!
//! These types represent the canonical shape every record takes after
//! normalization, plus the small value types that hang off it (identifiers,
//! pricing tiers) and the admin-side input types used to create or edit
//! records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Identifier ──────────────────────────────────────────────────────────────

/// Opaque record identifier. Source data uses both numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl ToolId {
    /// Compare ids by their textual form, so `7` and `"7"` name the same
    /// record.
    pub fn same_as(&self, other: &ToolId) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl FromStr for ToolId {
    type Err = std::convert::Infallible;

    /// Numeric strings become [`ToolId::Int`] so ids typed on a command line
    /// match ids that were stored as JSON numbers.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Text(s.to_string()),
        })
    }
}

// ── Tool ────────────────────────────────────────────────────────────────────

/// A canonical catalog entry.
///
/// Every field is present and typed; build one with
/// [`normalize`](crate::normalize::normalize) rather than by hand so the
/// derived fields (logo, fallback name and description) stay consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: ToolId,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Normalized absolute address, or empty when the source had none.
    pub url: String,
    pub logo: String,
    pub upvotes: u64,
    pub featured: bool,
    pub top: bool,
    pub verified: bool,
    pub pricing_text: String,
    pub section: String,
    pub status: String,
    pub order_index: i64,
    /// Source keys the catalog does not model, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tool {
    /// Pricing tier derived from an explicit `pricing_type` field when the
    /// record carries one, else from the free-form pricing text.
    pub fn pricing_tier(&self) -> Option<PricingTier> {
        let explicit = self
            .extra
            .get("pricing_type")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty());
        PricingTier::from_text(explicit.unwrap_or(&self.pricing_text))
    }

    /// True when the record carries everything an import requires.
    pub fn is_importable(&self) -> bool {
        !self.name.is_empty() && !self.url.is_empty() && !self.category.is_empty()
    }
}

// ── Pricing ─────────────────────────────────────────────────────────────────

/// Coarse pricing bucket used by the pricing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricingTier {
    Free,
    Trial,
    Freemium,
    Paid,
}

impl PricingTier {
    pub const ALL: [PricingTier; 4] = [Self::Free, Self::Trial, Self::Freemium, Self::Paid];

    /// Classify free-form pricing text.
    ///
    /// Checks run in a fixed order because the keywords overlap: "freemium"
    /// contains "free", and "free trial" should read as a trial.
    pub fn from_text(text: &str) -> Option<Self> {
        let p = text.to_lowercase();
        if p.is_empty() {
            None
        } else if p.contains("freemium") {
            Some(Self::Freemium)
        } else if p.contains("trial") {
            Some(Self::Trial)
        } else if p.contains("free") {
            Some(Self::Free)
        } else if p.contains('$') || p.contains("paid") || p.contains("from") {
            Some(Self::Paid)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Trial => "Trial",
            Self::Freemium => "Freemium",
            Self::Paid => "Paid",
        }
    }
}

impl fmt::Display for PricingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "trial" => Ok(Self::Trial),
            "freemium" => Ok(Self::Freemium),
            "paid" => Ok(Self::Paid),
            other => {
                let expected: Vec<String> =
                    Self::ALL.iter().map(|t| t.as_str().to_lowercase()).collect();
                Err(format!(
                    "unknown pricing tier '{other}' (expected one of {})",
                    expected.join(", ")
                ))
            }
        }
    }
}

// ── Admin input ─────────────────────────────────────────────────────────────

/// Fields an administrator supplies when adding a record by hand.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTool {
    pub name: String,
    pub description: String,
    pub category: String,
    pub section: String,
    pub url: String,
    pub pricing_text: String,
    pub featured: bool,
    pub top: bool,
    pub verified: bool,
}

/// A partial update. `None` leaves the field as it was.
#[derive(Debug, Clone, Default)]
pub struct ToolEdit {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub section: Option<String>,
    pub url: Option<String>,
    pub pricing_text: Option<String>,
    pub featured: Option<bool>,
    pub top: Option<bool>,
    pub verified: Option<bool>,
}

impl ToolEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.section.is_none()
            && self.url.is_none()
            && self.pricing_text.is_none()
            && self.featured.is_none()
            && self.top.is_none()
            && self.verified.is_none()
    }
}
