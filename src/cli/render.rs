//! Text rendering for terminal output.

use crate::core::{
    dashboard::{Dashboard, StockLine, render_category_chart},
    product::Product,
    report::format_money,
    spreadsheet::ImportOutcome,
};
use std::fmt::Write as _;

/// Renders products as an aligned table.
#[must_use]
pub fn product_table(products: &[Product], currency_symbol: &str) -> String {
    if products.is_empty() {
        return "No products in inventory. Add one or import a spreadsheet to get started.".to_string();
    }

    let header = ["ID", "Name", "Qty", "Unit price", "Category", "Location"].map(str::to_string);
    let rows: Vec<[String; 6]> = products
        .iter()
        .map(|product| {
            [
                product.id().to_string(),
                product.name().to_string(),
                product.quantity().to_string(),
                format_money(product.unit_price(), currency_symbol),
                product.category().unwrap_or("-").to_string(),
                product.location().unwrap_or("-").to_string(),
            ]
        })
        .collect();

    let mut widths = header.clone().map(|cell| cell.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    std::iter::once(&header)
        .chain(&rows)
        .map(|row| {
            row.iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders one product as labelled lines.
#[must_use]
pub fn product_detail(product: &Product, currency_symbol: &str) -> String {
    format!(
        "ID:         {}\n\
         Name:       {}\n\
         Quantity:   {}\n\
         Unit price: {}\n\
         Category:   {}\n\
         Location:   {}\n\
         Value:      {}",
        product.id(),
        product.name(),
        product.quantity(),
        format_money(product.unit_price(), currency_symbol),
        product.category().unwrap_or("-"),
        product.location().unwrap_or("-"),
        format_money(product.line_value(), currency_symbol),
    )
}

/// Summarizes an import, listing every rejected row.
#[must_use]
pub fn import_summary(outcome: &ImportOutcome) -> String {
    let mut text = format!("✅ Imported {} product(s).", outcome.count());
    if !outcome.is_clean() {
        let _ = write!(text, "\n⚠️ Skipped {} row(s):", outcome.failures.len());
        for failure in &outcome.failures {
            let _ = write!(text, "\n  line {}: {}", failure.line, failure.message);
        }
    }
    text
}

fn stock_lines(lines: &[StockLine], currency_symbol: &str, with_value: bool) -> String {
    lines
        .iter()
        .map(|line| {
            if with_value {
                format!(
                    "  {:<20} {:>6} x {} = {}",
                    line.name,
                    line.quantity,
                    format_money(line.unit_price, currency_symbol),
                    format_money(line.total_value, currency_symbol)
                )
            } else {
                format!(
                    "  {:<20} {:>6}  {}",
                    line.name,
                    line.quantity,
                    line.location.as_deref().unwrap_or("-")
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders every dashboard panel.
#[must_use]
pub fn dashboard_text(dashboard: &Dashboard, currency_symbol: &str, low_stock_threshold: u32) -> String {
    let summary = &dashboard.summary;
    let mut text = format!(
        "📊 Inventory summary\n\
         Products:    {}\n\
         Units:       {}\n\
         Total value: {}\n\
         Categories:  {}",
        summary.total_items,
        summary.total_units,
        format_money(summary.total_value, currency_symbol),
        summary.category_count,
    );

    if summary.total_items == 0 {
        return text;
    }

    let _ = write!(
        text,
        "\n\nProducts by category\n{}",
        render_category_chart(summary, None)
    );
    let _ = write!(
        text,
        "\n\nMost stocked products\n{}",
        stock_lines(&dashboard.top_products, currency_symbol, true)
    );
    if dashboard.low_stock.is_empty() {
        let _ = write!(text, "\n\nNo products at or below {low_stock_threshold} units.");
    } else {
        let _ = write!(
            text,
            "\n\nLow stock (<= {low_stock_threshold} units)\n{}",
            stock_lines(&dashboard.low_stock, currency_symbol, false)
        );
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dashboard::{DashboardOptions, build_dashboard};
    use crate::core::spreadsheet::RowFailure;
    use crate::test_utils::widget_and_gadget;

    #[test]
    fn test_product_table_alignment() {
        let table = product_table(widget_and_gadget().list(), "$");
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID         Name    Qty  Unit price  Category  Location");
        assert_eq!(lines[1], "PROD-0001  Widget  10   $2.50       Tools     -");
        assert_eq!(lines[2], "PROD-0002  Gadget  0    $9.99       -         -");
    }

    #[test]
    fn test_product_table_empty() {
        assert!(product_table(&[], "$").starts_with("No products"));
    }

    #[test]
    fn test_import_summary_lists_failures() {
        let outcome = ImportOutcome {
            added: vec!["PROD-0001".to_string()],
            failures: vec![RowFailure {
                line: 3,
                message: "Invalid name: Product name cannot be empty".to_string(),
            }],
        };
        let text = import_summary(&outcome);
        assert!(text.contains("Imported 1 product(s)"));
        assert!(text.contains("line 3: Invalid name"));
    }

    #[test]
    fn test_dashboard_text_sections() {
        let store = widget_and_gadget();
        let dashboard = build_dashboard(&store.snapshot(), &DashboardOptions::default());
        let text = dashboard_text(&dashboard, "$", 5);
        assert!(text.contains("Products:    2"));
        assert!(text.contains("Total value: $25.00"));
        assert!(text.contains("Products by category"));
        assert!(text.contains("Low stock (<= 5 units)"));
        assert!(text.contains("Gadget"));
    }
}
