//! Field normalization for loosely-shaped catalog records.
//!
//! Source data arrives from hand-edited JSON files, pasted blobs and older
//! exports, so the same concept shows up under different keys and types:
//! ```text
//! { "website": "https://www.tabnine.com/", "pricing": "From $12", "verified": "yes" }
//! { "url": "https://tabnine.com#pricing", "name": "`Tabnine`", "upvotes": "41" }
//! ```
//! [`normalize`] folds all of these into a canonical [`Tool`]. It is total:
//! any JSON value produces a record, and normalizing that record's JSON form
//! again yields the same record.

use rand::Rng;
use serde_json::{Map, Value};
use url::Url;

use crate::types::{Tool, ToolId};

/// Category assigned when a record has none.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Status assigned when a record has none.
pub const DEFAULT_STATUS: &str = "Active";

/// Image used when no logo is given and no host can be derived.
pub const PLACEHOLDER_LOGO: &str = "https://placehold.co/56x56/eeeeee/666666?text=AI";

const LOGO_SERVICE: &str = "https://logo.clearbit.com/";

/// Keys with a canonical meaning. Anything else is kept in [`Tool::extra`].
const KNOWN_KEYS: &[&str] = &[
    "id",
    "name",
    "description",
    "category",
    "url",
    "website",
    "link",
    "logo",
    "upvotes",
    "featured",
    "top",
    "verified",
    "pricing_text",
    "pricing",
    "section",
    "status",
    "order_index",
];

/// Key variants for the address field, most specific first.
const URL_KEYS: &[&str] = &["website", "url", "link"];

/// Key variants for the pricing text.
const PRICING_KEYS: &[&str] = &["pricing_text", "pricing"];

/// Normalize a raw record into a canonical [`Tool`].
///
/// Non-object input is treated as an empty object, which yields a record
/// with an empty name and url (callers that import data reject those).
pub fn normalize(raw: &Value) -> Tool {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let url = normalize_url(&first_string(obj, URL_KEYS));
    let category = non_empty_or(string_field(obj, "category"), DEFAULT_CATEGORY);

    let mut name = string_field(obj, "name");
    if name.is_empty() {
        name = name_from_url(&url);
    }

    let mut description = string_field(obj, "description");
    if description.is_empty() {
        description = default_description(&category);
    }

    let logo = derive_logo(&url, &string_field(obj, "logo"));

    let extra = obj
        .iter()
        .filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Tool {
        id: id_field(obj.get("id")).unwrap_or_else(generate_id),
        name,
        description,
        category,
        url,
        logo,
        upvotes: count_field(obj.get("upvotes")),
        featured: flag_field(obj.get("featured")),
        top: flag_field(obj.get("top")),
        verified: flag_field(obj.get("verified")),
        pricing_text: first_string(obj, PRICING_KEYS),
        section: string_field(obj, "section"),
        status: non_empty_or(string_field(obj, "status"), DEFAULT_STATUS),
        order_index: index_field(obj.get("order_index")),
        extra,
    }
}

/// Normalize every record in a slice, preserving order.
pub fn normalize_all(raw: &[Value]) -> Vec<Tool> {
    raw.iter().map(normalize).collect()
}

/// Strip backticks and surrounding whitespace.
///
/// Older exports wrapped values in markdown code ticks; they never belong in
/// display text.
pub fn clean(s: &str) -> String {
    s.replace('`', "").trim().to_string()
}

/// Normalize a web address: drop the fragment and any trailing slashes.
///
/// Returns an empty string when the input does not parse as an absolute URL.
///
/// ```
/// use toolshelf_catalog::normalize::normalize_url;
///
/// assert_eq!(normalize_url("https://a.com/x/#frag"), "https://a.com/x");
/// assert_eq!(normalize_url("https://a.com/"), "https://a.com");
/// assert_eq!(normalize_url("not a url"), "");
/// ```
pub fn normalize_url(raw: &str) -> String {
    let raw = clean(raw);
    if raw.is_empty() {
        return String::new();
    }
    let Ok(mut url) = Url::parse(&raw) else {
        return String::new();
    };

    url.set_fragment(None);
    let path = url.path().trim_end_matches('/').to_string();
    url.set_path(&path);

    // Special schemes always render a root path as "/"; drop it so the bare
    // host and the host with a slash compare equal.
    let rendered = url.as_str();
    if url.path() == "/" && url.query().is_none() {
        rendered
            .strip_suffix('/')
            .unwrap_or(rendered)
            .to_string()
    } else {
        rendered.to_string()
    }
}

/// Host portion of an address, or empty when it has none.
pub fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

/// Derive a display name from an address.
///
/// `https://www.tabnine.com` becomes `tabnine`; a meaningful final path
/// segment is appended, so `https://github.com/features/copilot` becomes
/// `github/copilot`.
pub fn name_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    let Some(host) = parsed.host_str() else {
        return String::new();
    };

    let host = host.strip_prefix("www.").unwrap_or(host);
    let label = match host.rfind('.') {
        Some(dot) => &host[..dot],
        None => host,
    };
    if label.is_empty() {
        return String::new();
    }

    let last_segment = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last());

    match last_segment {
        Some(segment) if segment.chars().count() > 1 => format!("{label}/{segment}"),
        _ => label.to_string(),
    }
}

/// Pick the logo to display for a record.
pub fn derive_logo(url: &str, provided: &str) -> String {
    let provided = clean(provided);
    if provided.starts_with("http://") || provided.starts_with("https://") {
        return provided;
    }
    let host = host_of(url);
    if host.is_empty() {
        PLACEHOLDER_LOGO.to_string()
    } else {
        format!("{LOGO_SERVICE}{host}")
    }
}

/// Description used when a record has none.
pub fn default_description(category: &str) -> String {
    format!("Professional {category} tool for enhanced productivity.")
}

/// Generate a fresh identifier: epoch milliseconds plus a small random offset.
///
/// Good enough to separate records created in the same millisecond within
/// one session; it is not a globally unique id.
pub fn generate_id() -> ToolId {
    let millis = chrono::Utc::now().timestamp_millis();
    let jitter: i64 = rand::thread_rng().gen_range(0..1000);
    ToolId::Int(millis + jitter)
}

// ── Field coercion ──────────────────────────────────────────────────────────

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(clean)
        .unwrap_or_default()
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .map(|k| string_field(obj, k))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn id_field(value: Option<&Value>) -> Option<ToolId> {
    match value? {
        Value::Number(n) => Some(match n.as_i64() {
            Some(i) => ToolId::Int(i),
            None => ToolId::Text(n.to_string()),
        }),
        Value::String(s) => {
            let s = clean(s);
            (!s.is_empty()).then_some(ToolId::Text(s))
        }
        _ => None,
    }
}

fn flag_field(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Bool(true)))
}

fn numeric(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn count_field(value: Option<&Value>) -> u64 {
    if let Some(n) = value.and_then(Value::as_u64) {
        return n;
    }
    match numeric(value) {
        Some(n) if n >= 0.0 => n as u64,
        _ => 0,
    }
}

fn index_field(value: Option<&Value>) -> i64 {
    if let Some(n) = value.and_then(Value::as_i64) {
        return n;
    }
    numeric(value).map(|n| n as i64).unwrap_or(0)
}
