//! Command handlers.
//!
//! Handlers are framework-agnostic glue: they translate parsed arguments into
//! record store, spreadsheet, report and dashboard calls, persist the store when
//! it changed, and hand back the message to show the user.

use crate::{
    cli::{AddArgs, Command, UpdateArgs, render},
    config::AppConfig,
    core::{
        dashboard::{DashboardOptions, build_dashboard},
        persistence::{load_store, save_store},
        product::{NewProduct, ProductUpdate},
        report::{self, ReportOptions},
        spreadsheet::{self, ImportMode},
        store::RecordStore,
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument};

/// Runs `command` against the persisted inventory.
///
/// `now` is the timestamp stamped on generated reports.
///
/// # Errors
/// Returns user-correctable errors (validation, not found, malformed file) as well as
/// database and I/O failures. The database is only written when the command succeeds.
#[instrument(skip_all)]
pub async fn execute(
    command: Command,
    app_config: &AppConfig,
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<String> {
    let mut store = load_store(db, &app_config.inventory.id_prefix).await?;
    let currency = app_config.report.currency_symbol.as_str();

    let (output, changed) = match command {
        Command::Add(args) => (add(&mut store, args)?, true),
        Command::Update(args) => (update(&mut store, args, currency)?, true),
        Command::Delete { id } => {
            let removed = store.delete(&id)?;
            (
                format!("🗑️ Deleted product {} ({}).", removed.id(), removed.name()),
                true,
            )
        }
        Command::Get { id } => (render::product_detail(store.get(&id)?, currency), false),
        Command::List => (render::product_table(store.list(), currency), false),
        Command::Import { file, replace } => {
            let mode = if replace {
                ImportMode::Replace
            } else {
                ImportMode::Merge
            };
            let outcome = spreadsheet::import_file(&mut store, &file, mode)?;
            info!(file = %file.display(), added = outcome.count(), "Imported file");
            (render::import_summary(&outcome), true)
        }
        Command::Export { file } => {
            spreadsheet::export_file(&store.snapshot(), &file, currency)?;
            (
                format!("📥 Exported {} product(s) to {}.", store.len(), file.display()),
                false,
            )
        }
        Command::Report { file, title } => {
            let options = ReportOptions {
                title: title.unwrap_or_else(|| app_config.report.title.clone()),
                generated_at: now,
                currency_symbol: app_config.report.currency_symbol.clone(),
            };
            let bytes = report::generate(&store.snapshot(), &options);
            std::fs::write(&file, &bytes)?;
            (
                format!("📄 Wrote report for {} product(s) to {}.", store.len(), file.display()),
                false,
            )
        }
        Command::Dashboard { top, low_stock } => {
            let defaults = app_config.dashboard.options();
            let options = DashboardOptions {
                top_n: top.unwrap_or(defaults.top_n),
                low_stock_threshold: low_stock.unwrap_or(defaults.low_stock_threshold),
            };
            let dashboard = build_dashboard(&store.snapshot(), &options);
            (
                render::dashboard_text(&dashboard, currency, options.low_stock_threshold),
                false,
            )
        }
        Command::Clear { yes } => {
            if !yes {
                return Err(Error::validation(
                    "confirmation",
                    format!(
                        "Refusing to delete all {} product(s) without --yes",
                        store.len()
                    ),
                ));
            }
            let removed = store.clear();
            (format!("🧹 Removed {removed} product(s)."), true)
        }
    };

    if changed {
        save_store(db, &store.snapshot()).await?;
    }
    Ok(output)
}

fn add(store: &mut RecordStore, args: AddArgs) -> Result<String> {
    let input = NewProduct {
        id: args.id,
        name: args.name,
        quantity: args.quantity,
        unit_price: args.price,
        category: args.category,
        location: args.location,
    };
    let id = store.add(input)?;
    let product = store.get(&id)?;
    Ok(format!("✅ Product {id} ({}) added.", product.name()))
}

fn update(store: &mut RecordStore, args: UpdateArgs, currency: &str) -> Result<String> {
    let update = ProductUpdate {
        name: args.name,
        quantity: args.quantity,
        unit_price: args.price,
        category: args.category.map(Some),
        location: args.location.map(Some),
    };
    if update.is_empty() {
        return Err(Error::validation(
            "update",
            "Nothing to change; pass at least one field to update",
        ));
    }
    let product = store.update(&args.id, update)?;
    Ok(format!(
        "✅ Product updated.\n{}",
        render::product_detail(product, currency)
    ))
}
