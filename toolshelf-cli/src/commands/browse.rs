use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use toolshelf_catalog::{
    AdminFilter, FilterState, Tool, apply, category_sections, export_json, featured,
    known_categories,
};
use toolshelf_store::LoadOrigin;

use super::log_tool;
use crate::{CliError, Context};

fn describe_filter(state: &FilterState) -> String {
    let mut parts = Vec::new();
    let query = state.to_query();
    if !query.is_empty() {
        parts.push(query);
    }
    if state.verified_only {
        parts.push("verified".to_string());
    }
    if let Some(tier) = state.pricing {
        parts.push(format!("pricing={tier}"));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

/// List tools matching the browsing filters and the admin substring filter.
pub(crate) fn run_list(
    ctx: &Context,
    state: &FilterState,
    admin: &AdminFilter,
    limit: Option<usize>,
    json: bool,
) -> Result<(), CliError> {
    let (store, _) = ctx.open()?;
    let tools = store.current();

    let matched: Vec<&Tool> = apply(&tools, state)
        .into_iter()
        .filter(|t| admin.matches(t))
        .collect();
    let shown = limit.unwrap_or(matched.len()).min(matched.len());

    if json {
        let subset: Vec<Tool> = matched[..shown].iter().map(|t| (*t).clone()).collect();
        let text = export_json(&subset).map_err(toolshelf_store::StoreError::from)?;
        println!("{text}");
        return Ok(());
    }

    if matched.is_empty() {
        log::info!("No tools found{}.", describe_filter(state));
        return Ok(());
    }

    for tool in &matched[..shown] {
        log_tool(tool);
    }
    crate::log_blank();
    log::info!(
        "Showing {} of {} tools{}",
        shown,
        tools.len(),
        describe_filter(state),
    );
    Ok(())
}

pub(crate) fn run_featured(ctx: &Context, state: &FilterState, limit: usize) -> Result<(), CliError> {
    let (store, _) = ctx.open()?;
    let tools = store.current();
    let picks = featured(&tools, state, limit);

    log::info!("{}", "Featured".if_supports_color(Stdout, |t| t.bold()));
    if picks.is_empty() {
        log::info!("  No featured tools{}.", describe_filter(state));
        return Ok(());
    }
    for tool in picks {
        log_tool(tool);
    }
    Ok(())
}

/// Category chips: the base categories plus any found in the data.
pub(crate) fn run_categories(ctx: &Context) -> Result<(), CliError> {
    let (store, _) = ctx.open()?;
    let tools = store.current();

    for category in known_categories(&tools) {
        let state = FilterState::new().with_category(category.as_str());
        let count = apply(&tools, &state).len();
        log::info!(
            "  {} {:>5}",
            format!("{category:<24}").if_supports_color(Stdout, |t| t.bold()),
            count,
        );
    }
    Ok(())
}

pub(crate) fn run_sections(ctx: &Context) -> Result<(), CliError> {
    let (store, _) = ctx.open()?;
    let tools = store.current();

    for (i, section) in category_sections(&tools).into_iter().enumerate() {
        if i > 0 {
            crate::log_blank();
        }
        log::info!(
            "{} ({})",
            section.category.if_supports_color(Stdout, |t| t.bold()),
            section.tools.len(),
        );
        for tool in section.tools {
            log_tool(tool);
        }
    }
    Ok(())
}

pub(crate) fn run_stats(ctx: &Context) -> Result<(), CliError> {
    let (store, _) = ctx.open()?;
    let stats = store.stats();

    let origin = match store.origin() {
        LoadOrigin::Override => "saved tool list".to_string(),
        LoadOrigin::Document => store
            .source_description()
            .unwrap_or_else(|| "catalog document".to_string()),
        LoadOrigin::Builtin => "built-in defaults".to_string(),
    };

    log::info!(
        "{}",
        "Catalog Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Store:       {}", ctx.store_dir.display());
    log::info!("  Loaded from: {}", origin);
    crate::log_blank();
    log::info!("  Tools:      {:>6}", stats.total);
    log::info!("  Featured:   {:>6}", stats.featured);
    log::info!("  Categories: {:>6}", stats.categories);
    if !stats.latest.is_empty() {
        crate::log_blank();
        log::info!("  Latest:");
        for name in &stats.latest {
            log::info!("    {}", name);
        }
    }
    Ok(())
}
