use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use toolshelf_store::settings::{
    self, DEFAULT_DOCUMENT, KNOWN_SETTINGS, default_store_dir, load_settings_string,
    settings_path,
};

use crate::{CliError, Context};

/// Show resolved settings and where each value came from.
pub(crate) fn run_config_show(ctx: &Context) -> Result<(), CliError> {
    let path = settings_path();

    log::info!(
        "{}",
        "toolshelf Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let store_source = if ctx.store_dir == default_store_dir() {
        "default"
    } else {
        "flag or settings"
    };
    let document_source = if ctx.document == DEFAULT_DOCUMENT {
        "default"
    } else {
        "flag or settings"
    };
    log::info!(
        "  {:<16} {} {}",
        "store.dir",
        ctx.store_dir.display(),
        format!("({store_source})").if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!(
        "  {:<16} {} {}",
        "source.document",
        ctx.document,
        format!("({document_source})").if_supports_color(Stdout, |t| t.dimmed()),
    );

    if let Some(contents) = load_settings_string() {
        crate::log_blank();
        log::info!("{}", "Settings file contents:".if_supports_color(Stdout, |t| t.bold()));
        for line in contents.lines() {
            log::info!("  {}", line);
        }
    }
    Ok(())
}

pub(crate) fn run_config_path() -> Result<(), CliError> {
    log::info!("{}", settings_path().display());
    Ok(())
}

/// Set or clear one setting.
pub(crate) fn run_config_set(key: &str, value: Option<&str>) -> Result<(), CliError> {
    if !KNOWN_SETTINGS.contains(&key) {
        return Err(CliError::config(format!(
            "unknown setting '{key}' (expected one of {})",
            KNOWN_SETTINGS.join(", ")
        )));
    }
    settings::save_setting(key, value)
        .map_err(|e| CliError::config(format!("failed to save {}: {e}", settings_path().display())))?;

    match value {
        Some(v) => log::info!(
            "{} {} = {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            key,
            v.if_supports_color(Stdout, |t| t.cyan()),
        ),
        None => log::info!(
            "{} {} cleared",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            key,
        ),
    }
    Ok(())
}
