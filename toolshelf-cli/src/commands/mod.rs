pub(crate) mod admin;
pub(crate) mod browse;
pub(crate) mod config;
pub(crate) mod transfer;
pub(crate) mod watch;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use toolshelf_catalog::Tool;

/// Truncate a string to at most `max` characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max).collect()
    }
}

/// Print one tool as a two-line entry.
pub(crate) fn log_tool(tool: &Tool) {
    let mut badges = Vec::new();
    if tool.featured {
        badges.push(format!("{}", "featured".if_supports_color(Stdout, |t| t.magenta())));
    }
    if tool.top {
        badges.push(format!("{}", "top".if_supports_color(Stdout, |t| t.blue())));
    }
    if tool.verified {
        badges.push(format!("{}", "\u{2714} verified".if_supports_color(Stdout, |t| t.green())));
    }
    if !tool.pricing_text.is_empty() {
        badges.push(tool.pricing_text.clone());
    }

    log::info!(
        "  {} [{}] {}{}",
        tool.name.if_supports_color(Stdout, |t| t.bold()),
        tool.category.if_supports_color(Stdout, |t| t.cyan()),
        format!("#{}", tool.id).if_supports_color(Stdout, |t| t.dimmed()),
        if badges.is_empty() {
            String::new()
        } else {
            format!("  {}", badges.join(", "))
        },
    );
    log::info!(
        "      {}  {}",
        tool.url.if_supports_color(Stdout, |t| t.underline()),
        truncate_str(&tool.description, 72).if_supports_color(Stdout, |t| t.dimmed()),
    );
}
