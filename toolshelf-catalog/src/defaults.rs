//! Built-in collection used when neither the override nor the static
//! document yields any records.

use serde_json::{Value, json};

use crate::normalize::normalize_all;
use crate::types::Tool;

/// The built-in records in raw form. Ids are fixed so the fallback list is
/// stable across runs.
#[rustfmt::skip]
pub fn builtin_raw() -> Vec<Value> {
    vec![
        entry(1, "ChatGPT", "AI chatbot for writing, coding, and problem solving.", "AI Writing", "https://chat.openai.com", None),
        entry(2, "Claude", "Helpful, honest AI assistant for writing and research.", "AI Writing", "https://claude.ai/", Some("https://logo.clearbit.com/anthropic.com")),
        entry(3, "Midjourney", "AI image generation tool using text prompts.", "Image", "https://www.midjourney.com", None),
        entry(4, "Stable Diffusion", "Open-source image generation for creative workflows.", "Image", "https://stability.ai/", Some("https://logo.clearbit.com/stability.ai")),
        entry(5, "Runway", "AI video editing and generation platform.", "Video", "https://runwayml.com", None),
        entry(6, "Descript", "Edit video like a doc with AI-powered features.", "Video", "https://www.descript.com/", Some("https://logo.clearbit.com/descript.com")),
        entry(7, "GitHub Copilot", "AI pair programmer that helps you write code faster.", "Coding", "https://github.com/features/copilot", Some("https://logo.clearbit.com/github.com")),
        entry(8, "Tabnine", "AI code completions for multiple languages and IDEs.", "Coding", "https://www.tabnine.com/", Some("https://logo.clearbit.com/tabnine.com")),
        entry(9, "Jasper", "AI content platform for marketing and copywriting.", "Marketing", "https://www.jasper.ai/", Some("https://logo.clearbit.com/jasper.ai")),
        entry(10, "Notion AI", "AI-powered writing and organization inside Notion.", "AI Writing", "https://www.notion.so/product/ai", Some("https://logo.clearbit.com/notion.so")),
        entry(11, "Canva Magic Write", "Generate text and design with AI in Canva.", "Marketing", "https://www.canva.com/features/ai/", Some("https://logo.clearbit.com/canva.com")),
        entry(12, "Cursor", "AI code editor with chat and inline assistance.", "Coding", "https://cursor.com/", Some("https://logo.clearbit.com/cursor.com")),
    ]
}

/// The built-in records, normalized.
pub fn builtin_tools() -> Vec<Tool> {
    normalize_all(&builtin_raw())
}

fn entry(
    id: i64,
    name: &str,
    description: &str,
    category: &str,
    url: &str,
    logo: Option<&str>,
) -> Value {
    let mut value = json!({
        "id": id,
        "name": name,
        "description": description,
        "category": category,
        "url": url,
    });
    if let Some(logo) = logo {
        value["logo"] = json!(logo);
    }
    value
}
