use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use toolshelf_catalog::{NewTool, ToolEdit, ToolId};

use super::log_tool;
use crate::{CliError, Context};

pub(crate) fn run_add(ctx: &Context, new: NewTool) -> Result<(), CliError> {
    let (store, _) = ctx.open()?;
    let tool = store.add(new)?;
    log::info!(
        "{} Added {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        tool.name.if_supports_color(Stdout, |t| t.bold()),
    );
    log_tool(&tool);
    Ok(())
}

pub(crate) fn run_edit(ctx: &Context, id: &ToolId, edit: ToolEdit) -> Result<(), CliError> {
    if edit.is_empty() {
        return Err(CliError::invalid_argument(
            "nothing to change; pass at least one field (e.g. --name, --url)",
        ));
    }
    let (store, _) = ctx.open()?;
    let tool = store.update(id, edit)?;
    log::info!(
        "{} Updated {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        tool.name.if_supports_color(Stdout, |t| t.bold()),
    );
    log_tool(&tool);
    Ok(())
}

/// Delete one tool. Without `--confirm` only shows what would go.
pub(crate) fn run_delete(ctx: &Context, id: &ToolId, confirm: bool) -> Result<(), CliError> {
    let (store, _) = ctx.open()?;

    if !confirm {
        let tools = store.current();
        let Some(tool) = tools.iter().find(|t| t.id.same_as(id)) else {
            return Err(toolshelf_store::StoreError::NotFound(id.to_string()).into());
        };
        log::warn!("This will delete:");
        log_tool(tool);
        log::info!("Re-run with --confirm to proceed:");
        log::info!("  toolshelf delete {} --confirm", id);
        return Ok(());
    }

    let removed = store.remove(id)?;
    log::info!(
        "{} Deleted {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        removed.name.if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}

/// Drop the saved tool list.
pub(crate) fn run_reset(ctx: &Context, confirm: bool) -> Result<(), CliError> {
    if !confirm {
        log::warn!(
            "This will discard every change saved in:\n  {}",
            ctx.store_dir.display(),
        );
        log::info!("Re-run with --confirm to proceed:");
        log::info!("  toolshelf reset --confirm");
        return Ok(());
    }

    let (store, _) = ctx.open()?;
    let tools = store.reset()?;
    log::info!(
        "{}",
        "Saved tool list cleared.".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Now showing {} tools from {}", tools.len(), ctx.document);
    Ok(())
}
