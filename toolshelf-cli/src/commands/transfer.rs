use std::io::Read;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::sync::mpsc;

use toolshelf_catalog::{EXPORT_FILE_NAME, parse_tool_array, read_tool_file};
use toolshelf_import::{ImportEvent, ImportOptions, import_records_async, run_with_events};
use toolshelf_store::StoreError;

use crate::{CliError, Context};

/// Import a `.json` file, or pasted JSON from stdin when `file` is `-`.
///
/// The whole batch is merged before anything is saved; the progress bar
/// follows the importer's chunk events.
pub(crate) fn run_import(
    ctx: &Context,
    file: &Path,
    batch_size: usize,
    quiet: bool,
) -> Result<(), CliError> {
    let candidates = if file == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        parse_tool_array(&text).map_err(StoreError::from)?
    } else {
        read_tool_file(file).map_err(StoreError::from)?
    };

    let (store, _) = ctx.open()?;
    let guard = store.begin_import()?;
    // Resolve the collection before entering the runtime; the document
    // source may block on HTTP.
    let existing = guard.existing();
    let options = ImportOptions::default().batch_size(batch_size);

    let pb = if quiet {
        ProgressBar::with_draw_target(Some(candidates.len() as u64), ProgressDrawTarget::hidden())
    } else {
        ProgressBar::new(candidates.len() as u64)
    };
    pb.set_style(
        ProgressStyle::with_template("  {bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("static pattern")
            .progress_chars("=> "),
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {e}")))?;

    let outcome = rt.block_on(async {
        let (event_tx, event_rx) = mpsc::unbounded_channel::<ImportEvent>();
        let import_future = import_records_async(candidates, existing, options, event_tx);
        run_with_events(import_future, event_rx, |e| match e {
            ImportEvent::Started { total } => {
                pb.set_length(total as u64);
                pb.set_message("Importing…");
            }
            ImportEvent::Batch { processed, .. } => {
                pb.set_position(processed as u64);
            }
            ImportEvent::Finished(_) => {
                pb.finish_and_clear();
            }
        })
        .await
    });
    drop(rt);

    guard.commit(&outcome)?;

    for dup in &outcome.duplicates {
        log::debug!("  duplicate: {} ({})", dup.name, dup.url);
    }
    for raw in &outcome.rejected {
        log::debug!("  rejected: {}", raw);
    }

    let stats = &outcome.stats;
    log::info!(
        "{} {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        "Import complete".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Added:      {:>6}", stats.added);
    log::info!("  Duplicates: {:>6}", stats.duplicates);
    log::info!("  Skipped:    {:>6} (missing name, url or category)", stats.rejected);
    if stats.added > 0 {
        log::info!("  Collection: {:>6} tools", outcome.collection.len());
    }
    Ok(())
}

/// Export the current collection to a file (default `tools-export.json`)
/// or stdout.
pub(crate) fn run_export(
    ctx: &Context,
    output: Option<PathBuf>,
    stdout: bool,
) -> Result<(), CliError> {
    let (store, _) = ctx.open()?;

    if stdout {
        println!("{}", store.export_json()?);
        return Ok(());
    }

    let path = output.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
    let count = store.export_to(&path)?;
    log::info!(
        "{} Exported {} tools to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        count,
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
