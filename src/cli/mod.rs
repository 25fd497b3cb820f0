//! Command-line interface - argument parsing and the per-invocation session.
//!
//! Each invocation is one session: load the store from the database, run a single
//! command against it, save it back if the command changed anything, and return
//! the text to print.

/// Command handlers
pub mod commands;
/// Plain-text rendering of products, imports and the dashboard
pub mod render;

use crate::{
    config::{self, database},
    errors::Result,
};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::debug;

/// Top-level arguments.
#[derive(Parser, Debug)]
#[command(
    name = "stockroom",
    version,
    about = "Inventory records with spreadsheet import/export, PDF reports and a dashboard"
)]
pub struct Cli {
    /// Path to a TOML configuration file. Defaults to ./config.toml when present.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Every operation the CLI exposes.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a new product
    Add(AddArgs),
    /// Change fields of an existing product
    Update(UpdateArgs),
    /// Remove a product
    Delete {
        /// Product id
        id: String,
    },
    /// Show one product
    Get {
        /// Product id
        id: String,
    },
    /// List all products in insertion order
    List,
    /// Load products from a CSV or Excel file
    Import {
        /// File to read (.csv, .xlsx, .xls, .xlsm, .xlsb or .ods)
        file: PathBuf,
        /// Replace the whole inventory instead of appending
        #[arg(long)]
        replace: bool,
    },
    /// Write all products to a CSV or Excel file
    Export {
        /// Destination file (.csv or .xlsx)
        file: PathBuf,
    },
    /// Render a PDF inventory report
    Report {
        /// Destination PDF file
        file: PathBuf,
        /// Report heading (overrides the configured title)
        #[arg(long)]
        title: Option<String>,
    },
    /// Show totals, category distribution, top products and low stock
    Dashboard {
        /// Number of products in the "most stocked" ranking
        #[arg(long)]
        top: Option<usize>,
        /// Quantity at or below which a product is low on stock
        #[arg(long)]
        low_stock: Option<u32>,
    },
    /// Delete every product
    Clear {
        /// Confirm that all records should be removed
        #[arg(long)]
        yes: bool,
    },
}

/// Arguments for `add`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    /// Product id; generated when omitted
    #[arg(long)]
    pub id: Option<String>,
    /// Product name
    #[arg(long)]
    pub name: String,
    /// Units in stock
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub quantity: i64,
    /// Price per unit
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub price: Decimal,
    /// Category label
    #[arg(long)]
    pub category: Option<String>,
    /// Warehouse location
    #[arg(long)]
    pub location: Option<String>,
}

/// Arguments for `update`. Pass an empty string to clear category or location.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct UpdateArgs {
    /// Product id
    pub id: String,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New stock level
    #[arg(long, allow_negative_numbers = true)]
    pub quantity: Option<i64>,
    /// New price per unit
    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<Decimal>,
    /// New category
    #[arg(long)]
    pub category: Option<String>,
    /// New warehouse location
    #[arg(long)]
    pub location: Option<String>,
}

/// Runs one CLI session and returns the text to print.
///
/// # Errors
/// Returns an error if configuration, the database or the command itself fails.
pub async fn run(cli: Cli) -> Result<String> {
    let app_config = config::load_app_configuration(cli.config.as_deref())?;
    let url = app_config.database_url();
    debug!(%url, "Using database");
    let db = database::create_connection(&url).await?;
    commands::execute(cli.command, &app_config, &db, Utc::now()).await
}
