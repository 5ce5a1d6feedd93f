//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod helpers;
mod records;
mod reference;
mod transfer;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use leadunit::config::Config;
use leadunit::models::SearchPayload;

#[derive(Parser)]
#[command(name = "leadunit")]
#[command(about = "Manage risk focal units (lead units) through the backend API")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the lead unit API (overrides config and LEADUNIT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Base URL of the organization directory (overrides config and LEADUNIT_ADMIN_URL)
    #[arg(long, global = true)]
    admin_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Search lead units
    Search {
        /// Free-text filter
        #[arg(short, long, default_value = "")]
        search: String,
        /// Status filter (omitted when not given)
        #[arg(long)]
        status: Option<i32>,
        /// Page size
        #[arg(long, default_value = "10")]
        size: u32,
        /// Zero-based page index
        #[arg(short, long, default_value = "0")]
        page: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one lead unit with its organization links
    Detail {
        /// Record ID
        id: String,
    },

    /// Delete a lead unit
    Delete {
        /// Record ID
        id: String,
    },

    /// Create or update a lead unit from a JSON form
    Save {
        /// JSON file with the form fields (startDate, endDate, ...)
        #[arg(short, long)]
        form: PathBuf,
        /// Update this record instead of creating a new one
        #[arg(long)]
        id: Option<String>,
        /// Organization IDs to link (repeatable)
        #[arg(short, long = "select")]
        select: Vec<String>,
        /// Print the request body instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the data the edit screen loads (organizations, budgets, record)
    EditData {
        /// Record ID (omit for a new record)
        id: Option<String>,
    },

    /// Upload parsed spreadsheet rows for validation
    Import {
        /// JSON file with the rows
        file: PathBuf,
        /// Commit the import right after validation
        #[arg(long)]
        confirm: bool,
    },

    /// Commit a validated import
    Confirm {
        /// Import key returned by `import`
        key: String,
    },

    /// Download the spreadsheet export
    Export {
        /// Free-text filter
        #[arg(short, long, default_value = "")]
        search: String,
        /// Status filter
        #[arg(long)]
        status: Option<i32>,
        /// Output directory (defaults to the configured export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List level-1 organizations
    Units {
        /// Free-text filter
        #[arg(short, long, default_value = "")]
        search: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List budget categories
    Budgets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save a Base64 import-error workbook to disk
    DecodeErrors {
        /// File holding the Base64 text (`-` for stdin)
        input: PathBuf,
        /// Output directory (defaults to the configured export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };
    if let Some(url) = cli.api_url {
        config.api_url = Some(url);
    }
    if let Some(url) = cli.admin_url {
        config.admin_url = Some(url);
    }

    // Only commands that talk to the API need a client
    let service = || helpers::build_service(&config);

    match cli.command {
        Commands::Search {
            search,
            status,
            size,
            page,
            json,
        } => {
            let params = SearchPayload {
                search,
                status,
                size,
                page,
            };
            records::cmd_search(&service()?, params, json).await
        }
        Commands::Detail { id } => records::cmd_detail(&service()?, &id).await,
        Commands::Delete { id } => records::cmd_delete(&service()?, &id).await,
        Commands::Save {
            form,
            id,
            select,
            dry_run,
        } => records::cmd_save(&service()?, &form, id.as_deref(), &select, dry_run).await,
        Commands::EditData { id } => records::cmd_edit_data(&service()?, id.as_deref()).await,
        Commands::Import { file, confirm } => {
            transfer::cmd_import(&service()?, &file, confirm).await
        }
        Commands::Confirm { key } => transfer::cmd_confirm(&service()?, &key).await,
        Commands::Export {
            search,
            status,
            output,
        } => {
            let output = output.unwrap_or_else(|| config.export_dir());
            transfer::cmd_export(&service()?, &search, status, output).await
        }
        Commands::Units { search, json } => {
            reference::cmd_units(&service()?, &search, json).await
        }
        Commands::Budgets { json } => reference::cmd_budgets(&service()?, json).await,
        Commands::DecodeErrors { input, output } => {
            let output = output.unwrap_or_else(|| config.export_dir());
            transfer::cmd_decode_errors(&input, output).await
        }
    }
}
