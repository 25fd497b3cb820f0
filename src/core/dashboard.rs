//! Dashboard aggregation.
//!
//! Pure, read-only summaries over a [`Snapshot`]: totals, per-category counts,
//! the most stocked products and the ones running low. Rendering helpers turn
//! the numbers into text charts for the terminal.

use crate::core::{product::Product, store::Snapshot};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Label used for products without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Headline numbers for an inventory snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySummary {
    /// Number of distinct products
    pub total_items: usize,
    /// Sum of all quantities
    pub total_units: u64,
    /// Sum of `quantity * unit_price`
    pub total_value: Decimal,
    /// Number of distinct categories (uncategorized products not counted)
    pub category_count: usize,
    /// Products per category, sorted by category name
    pub counts_by_category: BTreeMap<String, usize>,
}

/// A product line in a ranking, with its stock value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLine {
    /// Product id
    pub id: String,
    /// Product name
    pub name: String,
    /// Units in stock
    pub quantity: u32,
    /// Price per unit
    pub unit_price: Decimal,
    /// `quantity * unit_price`
    pub total_value: Decimal,
    /// Warehouse location, if any
    pub location: Option<String>,
}

impl From<&Product> for StockLine {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id().to_string(),
            name: product.name().to_string(),
            quantity: product.quantity(),
            unit_price: product.unit_price(),
            total_value: product.line_value(),
            location: product.location().map(str::to_string),
        }
    }
}

/// Knobs for [`build_dashboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    /// How many products to list in the "most stocked" ranking
    pub top_n: usize,
    /// Products at or below this quantity are reported as low stock
    pub low_stock_threshold: u32,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            low_stock_threshold: 5,
        }
    }
}

/// Everything the dashboard shows, computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    /// Headline totals
    pub summary: InventorySummary,
    /// Most stocked products
    pub top_products: Vec<StockLine>,
    /// Products at or below the low-stock threshold
    pub low_stock: Vec<StockLine>,
}

/// Computes totals and per-category counts.
#[must_use]
pub fn aggregate(snapshot: &Snapshot) -> InventorySummary {
    let mut counts_by_category: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_units = 0_u64;
    let mut total_value = Decimal::ZERO;

    for product in snapshot {
        total_units += u64::from(product.quantity());
        total_value += product.line_value();
        let category = product.category().unwrap_or(UNCATEGORIZED);
        *counts_by_category.entry(category.to_string()).or_default() += 1;
    }

    let category_count = snapshot
        .iter()
        .filter_map(Product::category)
        .collect::<std::collections::BTreeSet<_>>()
        .len();

    InventorySummary {
        total_items: snapshot.len(),
        total_units,
        total_value,
        category_count,
        counts_by_category,
    }
}

/// The `n` products with the highest quantity. Ties keep store order.
#[must_use]
pub fn top_by_quantity(snapshot: &Snapshot, n: usize) -> Vec<StockLine> {
    let mut products: Vec<&Product> = snapshot.iter().collect();
    // sort_by is stable, so equal quantities stay in store order
    products.sort_by(|a, b| b.quantity().cmp(&a.quantity()));
    products.into_iter().take(n).map(StockLine::from).collect()
}

/// Products with `quantity <= threshold`, lowest first.
#[must_use]
pub fn low_stock(snapshot: &Snapshot, threshold: u32) -> Vec<StockLine> {
    let mut products: Vec<&Product> = snapshot
        .iter()
        .filter(|product| product.quantity() <= threshold)
        .collect();
    products.sort_by_key(|product| product.quantity());
    products.into_iter().map(StockLine::from).collect()
}

/// Computes every dashboard panel from a single snapshot.
#[must_use]
pub fn build_dashboard(snapshot: &Snapshot, options: &DashboardOptions) -> Dashboard {
    Dashboard {
        summary: aggregate(snapshot),
        top_products: top_by_quantity(snapshot, options.top_n),
        low_stock: low_stock(snapshot, options.low_stock_threshold),
    }
}

/// Generates a bar string like `[████░░░░░░] 4`, scaled against `max`.
///
/// # Arguments
/// * `value` - The value to draw
/// * `max` - The value that fills the whole bar
/// * `bar_length` - Length of the bar in characters (default 20)
#[must_use]
pub fn format_bar(value: usize, max: usize, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(20);
    let filled = if max == 0 {
        0
    } else {
        // Rounded integer share of the bar, never past the end
        ((value * length * 2 + max) / (max * 2)).min(length)
    };
    let empty = length - filled;

    format!("[{}{}] {value}", "█".repeat(filled), "░".repeat(empty))
}

/// Renders the per-category counts as a bar chart, largest category first.
///
/// Categories with equal counts are listed alphabetically.
#[must_use]
pub fn render_category_chart(summary: &InventorySummary, bar_length: Option<usize>) -> String {
    let mut rows: Vec<(&String, &usize)> = summary.counts_by_category.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1));

    let max = rows.first().map_or(0, |(_, count)| **count);
    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|(label, count)| {
            format!(
                "{label:<label_width$} {}",
                format_bar(**count, max, bar_length)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
