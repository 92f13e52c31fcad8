//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use toolshelf_catalog::{AdminFilter, FEATURED_LIMIT, FilterState, NewTool, PricingTier, ToolEdit};
use toolshelf_import::DEFAULT_BATCH_SIZE;

#[derive(Parser)]
#[command(name = "toolshelf")]
#[command(about = "Browse and curate a catalog of AI tools", long_about = None)]
pub(crate) struct Cli {
    /// Directory holding the saved tool list (defaults to the data directory)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Catalog document to fall back on: a path or an http(s) URL
    #[arg(long, global = true)]
    pub document: Option<String>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Browsing filters shared by `list` and `featured`.
#[derive(Args, Clone)]
pub(crate) struct FilterArgs {
    /// Exact category ("All" matches everything)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Text to look for in name, description or category
    #[arg(short, long)]
    pub query: Option<String>,

    /// Only verified tools
    #[arg(long)]
    pub verified: bool,

    /// Pricing tier: free, trial, freemium or paid
    #[arg(long)]
    pub pricing: Option<PricingTier>,

    /// Start from a shared query string (e.g. "category=Coding&q=copilot")
    #[arg(long, value_name = "QUERY")]
    pub from_query: Option<String>,
}

impl FilterArgs {
    pub(crate) fn to_state(&self) -> FilterState {
        let mut state = self
            .from_query
            .as_deref()
            .map(FilterState::from_query)
            .unwrap_or_default();
        if let Some(category) = &self.category {
            state.category = category.clone();
        }
        if let Some(query) = &self.query {
            state.query = query.clone();
        }
        state.verified_only(self.verified).with_pricing(self.pricing)
    }
}

/// Record fields for `add`.
#[derive(Args, Clone)]
pub(crate) struct AddArgs {
    /// Display name
    pub name: String,

    /// Website address; "https://" is assumed when missing
    #[arg(long)]
    pub url: String,

    #[arg(long, default_value = "Other")]
    pub category: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub section: String,

    /// Free-form pricing text (e.g. "Freemium", "From $10/mo")
    #[arg(long, default_value = "")]
    pub pricing: String,

    #[arg(long)]
    pub featured: bool,

    #[arg(long)]
    pub top: bool,

    #[arg(long)]
    pub verified: bool,
}

impl From<AddArgs> for NewTool {
    fn from(a: AddArgs) -> Self {
        NewTool {
            name: a.name,
            description: a.description,
            category: a.category,
            section: a.section,
            url: a.url,
            pricing_text: a.pricing,
            featured: a.featured,
            top: a.top,
            verified: a.verified,
        }
    }
}

/// Field changes for `edit`. Omitted fields are left alone.
#[derive(Args, Clone)]
pub(crate) struct EditArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub section: Option<String>,

    #[arg(long)]
    pub pricing: Option<String>,

    #[arg(long)]
    pub featured: Option<bool>,

    #[arg(long)]
    pub top: Option<bool>,

    #[arg(long)]
    pub verified: Option<bool>,
}

impl From<EditArgs> for ToolEdit {
    fn from(a: EditArgs) -> Self {
        ToolEdit {
            name: a.name,
            description: a.description,
            category: a.category,
            section: a.section,
            url: a.url,
            pricing_text: a.pricing,
            featured: a.featured,
            top: a.top,
            verified: a.verified,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List tools matching the filters
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Substring match on name (admin view)
        #[arg(long)]
        name: Option<String>,

        /// Substring match on section (admin view)
        #[arg(long)]
        section: Option<String>,

        /// Maximum number of tools to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print matching records as JSON
        #[arg(long)]
        json: bool,
    },

    /// List featured tools matching the filters
    Featured {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(short, long, default_value_t = FEATURED_LIMIT)]
        limit: usize,
    },

    /// List known categories with their tool counts
    Categories,

    /// Show tools grouped by category
    Sections,

    /// Show collection statistics
    Stats,

    /// Import tools from a JSON file ("-" reads pasted JSON from stdin)
    Import {
        file: PathBuf,

        /// Records classified between progress updates
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Export the collection as JSON
    Export {
        /// Output file (default: tools-export.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Add a tool to the top of the collection
    Add(AddArgs),

    /// Change fields of an existing tool
    Edit {
        /// Tool id
        id: String,

        #[command(flatten)]
        changes: EditArgs,
    },

    /// Delete a tool
    Delete {
        /// Tool id
        id: String,

        /// Actually delete (otherwise just show what would be deleted)
        #[arg(long)]
        confirm: bool,
    },

    /// Discard the saved tool list and go back to the catalog document
    Reset {
        /// Confirm the reset
        #[arg(long)]
        confirm: bool,
    },

    /// Follow changes made to the store by other processes
    Watch {
        /// Seconds between checks
        #[arg(long, default_value_t = 2)]
        interval: u64,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show resolved settings and their sources
    Show,

    /// Print the settings file path
    Path,

    /// Set a setting (store.dir, source.document); omit the value to clear it
    Set { key: String, value: Option<String> },
}

/// Admin substring filter from the `list` flags.
pub(crate) fn admin_filter(name: Option<String>, section: Option<String>) -> AdminFilter {
    AdminFilter {
        name: name.unwrap_or_default(),
        category: String::new(),
        section: section.unwrap_or_default(),
    }
}
