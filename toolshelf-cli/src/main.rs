//! toolshelf CLI
//!
//! Browse, filter and curate a catalog of AI tools from the command line.

mod cli_types;
mod commands;
mod error;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use toolshelf_catalog::ToolId;
use toolshelf_store::settings::{resolve_document, resolve_store_dir};
use toolshelf_store::{CatalogStore, FileStore};

use cli_types::{Cli, Commands, ConfigAction, admin_filter};
pub(crate) use error::CliError;

/// Log an empty line (keeps blank-line spacing under `--quiet` consistent).
pub(crate) fn log_blank() {
    log::info!("");
}

/// Store locations resolved from flags and settings.
pub(crate) struct Context {
    pub store_dir: PathBuf,
    pub document: String,
}

impl Context {
    fn resolve(store: Option<PathBuf>, document: Option<String>) -> Self {
        Self {
            store_dir: resolve_store_dir(store),
            document: resolve_document(document),
        }
    }

    pub(crate) fn open(&self) -> Result<(CatalogStore, Arc<FileStore>), CliError> {
        log::debug!(
            "Opening store at {} (document: {})",
            self.store_dir.display(),
            self.document
        );
        Ok(toolshelf_store::open_store(&self.store_dir, &self.document)?)
    }
}

fn parse_id(id: &str) -> ToolId {
    match id.parse::<ToolId>() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let ctx = Context::resolve(cli.store, cli.document);

    let result = match cli.command {
        Commands::List {
            filter,
            name,
            section,
            limit,
            json,
        } => commands::browse::run_list(
            &ctx,
            &filter.to_state(),
            &admin_filter(name, section),
            limit,
            json,
        ),
        Commands::Featured { filter, limit } => {
            commands::browse::run_featured(&ctx, &filter.to_state(), limit)
        }
        Commands::Categories => commands::browse::run_categories(&ctx),
        Commands::Sections => commands::browse::run_sections(&ctx),
        Commands::Stats => commands::browse::run_stats(&ctx),
        Commands::Import { file, batch_size } => {
            commands::transfer::run_import(&ctx, &file, batch_size, cli.quiet)
        }
        Commands::Export { output, stdout } => commands::transfer::run_export(&ctx, output, stdout),
        Commands::Add(args) => commands::admin::run_add(&ctx, args.into()),
        Commands::Edit { id, changes } => {
            commands::admin::run_edit(&ctx, &parse_id(&id), changes.into())
        }
        Commands::Delete { id, confirm } => {
            commands::admin::run_delete(&ctx, &parse_id(&id), confirm)
        }
        Commands::Reset { confirm } => commands::admin::run_reset(&ctx, confirm),
        Commands::Watch { interval } => commands::watch::run_watch(&ctx, interval),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&ctx),
            ConfigAction::Path => commands::config::run_config_path(),
            ConfigAction::Set { key, value } => {
                commands::config::run_config_set(&key, value.as_deref())
            }
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
