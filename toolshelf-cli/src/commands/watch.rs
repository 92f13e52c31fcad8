use std::time::Duration;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::sync::broadcast::error::TryRecvError;

use toolshelf_store::ChangeKind;

use crate::{CliError, Context};

/// Poll the store directory and report whenever another process changes the
/// saved tool list. Runs until interrupted.
pub(crate) fn run_watch(ctx: &Context, interval: u64) -> Result<(), CliError> {
    let (store, kv) = ctx.open()?;
    let mut events = store.subscribe();
    let interval = Duration::from_secs(interval.max(1));

    log::info!(
        "Watching {} ({} tools). Press Ctrl-C to stop.",
        kv.dir().display().if_supports_color(Stdout, |t| t.cyan()),
        store.current().len(),
    );

    loop {
        std::thread::sleep(interval);
        kv.poll()?;

        loop {
            match events.try_recv() {
                Ok(event) => {
                    let Some(tools) = store.reload_if_changed(&event) else {
                        continue;
                    };
                    let what = match event.kind {
                        ChangeKind::Set => "updated",
                        ChangeKind::Removed => "cleared",
                    };
                    log::info!(
                        "{} Saved tool list {}: {} tools",
                        "\u{21BB}".if_supports_color(Stdout, |t| t.yellow()),
                        what,
                        tools.len(),
                    );
                }
                Err(TryRecvError::Lagged(missed)) => {
                    log::warn!("Missed {} change events, reloading", missed);
                    store.load();
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Closed) => return Ok(()),
            }
        }
    }
}
