//! Inventory report generation.
//!
//! [`build_report`] turns a snapshot into structured, display-ready rows and totals;
//! [`generate`] lays those rows out as a paginated PDF table. Both are pure: the
//! timestamp printed on the report comes from [`ReportOptions::generated_at`], so
//! the same snapshot and options always produce the same bytes.

use crate::core::{
    pdf::{self, DocumentInfo, Font, Page},
    product::Product,
    store::Snapshot,
};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use std::ops::Range;
use tracing::debug;

/// Table column headings, in print order.
pub const COLUMN_TITLES: [&str; 6] = ["ID", "Product", "Category", "Quantity", "Unit price", "Location"];
/// Share of the printable width given to each column.
const COLUMN_SHARES: [f32; 6] = [0.15, 0.25, 0.15, 0.10, 0.15, 0.20];
/// Cell text longer than this is cut and suffixed with `...`.
pub const MAX_CELL_CHARS: usize = 18;

const MARGIN: f32 = 40.0;
const TITLE_SIZE: f32 = 16.0;
const SUBTITLE_SIZE: f32 = 9.0;
const HEADER_SIZE: f32 = 9.0;
const CELL_SIZE: f32 = 8.0;
const HEADER_HEIGHT: f32 = 18.0;
const ROW_HEIGHT: f32 = 14.0;
const TOTALS_HEIGHT: f32 = 16.0;
const CELL_PADDING: f32 = 3.0;
const FIRST_TABLE_TOP: f32 = pdf::PAGE_HEIGHT - MARGIN - 56.0;
const TABLE_TOP: f32 = pdf::PAGE_HEIGHT - MARGIN;
const TABLE_BOTTOM: f32 = MARGIN;

/// Caller-controlled report settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Heading printed on the first page and stored as the PDF title
    pub title: String,
    /// Timestamp printed on the report
    pub generated_at: DateTime<Utc>,
    /// Symbol prefixed to money amounts
    pub currency_symbol: String,
}

impl ReportOptions {
    /// Default title and `$` currency at the given time.
    #[must_use]
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            title: "Inventory Report".to_string(),
            generated_at,
            currency_symbol: "$".to_string(),
        }
    }
}

/// One printed table row, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Cell text in [`COLUMN_TITLES`] order
    pub cells: [String; 6],
}

/// Display-ready report contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryReport {
    /// Report heading
    pub title: String,
    /// Formatted generation timestamp
    pub generated_at: String,
    /// One row per product, in store order
    pub rows: Vec<ReportRow>,
    /// Sum of quantities
    pub total_quantity: u64,
    /// Sum of `quantity * unit_price`
    pub total_value: Decimal,
    /// `total_value` formatted as money
    pub total_value_display: String,
}

/// Formats and totals a snapshot for printing.
#[must_use]
pub fn build_report(snapshot: &Snapshot, options: &ReportOptions) -> InventoryReport {
    let symbol = &options.currency_symbol;
    let rows = snapshot
        .iter()
        .map(|product| ReportRow {
            cells: [
                truncate_cell(product.id()),
                truncate_cell(product.name()),
                truncate_cell(product.category().unwrap_or_default()),
                product.quantity().to_string(),
                format_money(product.unit_price(), symbol),
                truncate_cell(product.location().unwrap_or_default()),
            ],
        })
        .collect();

    let total_quantity = snapshot.iter().map(|p| u64::from(p.quantity())).sum();
    let total_value: Decimal = snapshot.iter().map(Product::line_value).sum();

    InventoryReport {
        title: options.title.clone(),
        generated_at: options.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        rows,
        total_quantity,
        total_value,
        total_value_display: format_money(total_value, symbol),
    }
}

/// Renders the snapshot as a PDF document.
#[must_use]
pub fn generate(snapshot: &Snapshot, options: &ReportOptions) -> Vec<u8> {
    let report = build_report(snapshot, options);
    let plan = plan_pages(report.rows.len());
    let page_count = plan.len();
    let widths = column_widths();

    let pages: Vec<Page> = plan
        .iter()
        .enumerate()
        .map(|(index, range)| {
            let mut page = Page::new();
            let mut top = if index == 0 {
                draw_heading(&mut page, &report);
                FIRST_TABLE_TOP
            } else {
                TABLE_TOP
            };

            let headings = COLUMN_TITLES.map(str::to_string);
            draw_row(&mut page, &widths, top, HEADER_HEIGHT, &headings, Font::Bold, HEADER_SIZE);
            top -= HEADER_HEIGHT;

            for row in &report.rows[range.clone()] {
                draw_row(&mut page, &widths, top, ROW_HEIGHT, &row.cells, Font::Regular, CELL_SIZE);
                top -= ROW_HEIGHT;
            }

            if index + 1 == page_count {
                draw_totals(&mut page, &widths, top, &report);
            }

            page.text(
                MARGIN,
                MARGIN / 2.0,
                Font::Regular,
                CELL_SIZE,
                &format!("Page {} of {page_count}", index + 1),
            );
            page
        })
        .collect();

    debug!(rows = report.rows.len(), pages = page_count, "Rendered inventory report");
    pdf::render(
        &pages,
        &DocumentInfo {
            title: report.title,
            created_at: options.generated_at,
        },
    )
}

/// Formats an amount as `$1,234.56`, rounding half away from zero.
///
/// # Arguments
/// * `amount` - Amount to format
/// * `symbol` - Currency symbol to prefix
#[must_use]
pub fn format_money(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = format!("{:.2}", rounded.abs());
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{symbol}{grouped}.{fraction}")
}

/// Cuts `text` to [`MAX_CELL_CHARS`] characters, appending `...` when shortened.
#[must_use]
pub fn truncate_cell(text: &str) -> String {
    if text.chars().count() > MAX_CELL_CHARS {
        let cut: String = text.chars().take(MAX_CELL_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Splits `row_count` rows into per-page ranges, leaving room for the totals row
/// on the last page. Every page repeats the header row.
fn plan_pages(row_count: usize) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;
    loop {
        let top = if pages.is_empty() { FIRST_TABLE_TOP } else { TABLE_TOP };
        let available = top - HEADER_HEIGHT - TABLE_BOTTOM;
        let remaining = row_count - start;

        // Row counts stay far below f32's exact-integer range
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let capacity = (available / ROW_HEIGHT).floor() as usize;
        #[allow(clippy::cast_precision_loss)]
        let needed = remaining as f32 * ROW_HEIGHT + TOTALS_HEIGHT;

        if needed <= available {
            pages.push(start..row_count);
            return pages;
        }
        let take = remaining.min(capacity);
        pages.push(start..start + take);
        start += take;
    }
}

fn column_widths() -> [f32; 6] {
    let printable = pdf::PAGE_WIDTH - 2.0 * MARGIN;
    COLUMN_SHARES.map(|share| printable * share)
}

fn draw_heading(page: &mut Page, report: &InventoryReport) {
    page.text(
        MARGIN,
        pdf::PAGE_HEIGHT - MARGIN - TITLE_SIZE,
        Font::Bold,
        TITLE_SIZE,
        &report.title,
    );
    page.text(
        MARGIN,
        pdf::PAGE_HEIGHT - MARGIN - TITLE_SIZE - 20.0,
        Font::Regular,
        SUBTITLE_SIZE,
        &format!("Generated: {}", report.generated_at),
    );
}

fn draw_row(
    page: &mut Page,
    widths: &[f32; 6],
    top: f32,
    height: f32,
    cells: &[String; 6],
    font: Font,
    size: f32,
) {
    let bottom = top - height;
    let mut x = MARGIN;
    for (cell, width) in cells.iter().zip(widths) {
        page.rect(x, bottom, *width, height);
        page.text(x + CELL_PADDING, bottom + (height - size) / 2.0 + 1.0, font, size, cell);
        x += width;
    }
}

fn draw_totals(page: &mut Page, widths: &[f32; 6], top: f32, report: &InventoryReport) {
    let bottom = top - TOTALS_HEIGHT;
    let baseline = bottom + (TOTALS_HEIGHT - HEADER_SIZE) / 2.0 + 1.0;
    let label_width: f32 = widths[..3].iter().sum();

    let cells = [
        (label_width, "Total inventory value:".to_string()),
        (widths[3], report.total_quantity.to_string()),
        (widths[4], report.total_value_display.clone()),
        (widths[5], String::new()),
    ];
    let mut x = MARGIN;
    for (width, text) in &cells {
        page.rect(x, bottom, *width, TOTALS_HEIGHT);
        if !text.is_empty() {
            page.text(x + CELL_PADDING, baseline, Font::Bold, HEADER_SIZE, text);
        }
        x += width;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{product::NewProduct, store::RecordStore};
    use crate::test_utils::{numbered_store, price, three_item_snapshot, widget_and_gadget};
    use chrono::TimeZone;

    fn options_at(hour: u32) -> ReportOptions {
        ReportOptions::new(Utc.with_ymd_and_hms(2026, 10, 18, hour, 30, 0).unwrap())
    }

    fn page_count(bytes: &[u8]) -> usize {
        String::from_utf8_lossy(bytes).matches("/Type /Page ").count()
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(price("0"), "$"), "$0.00");
        assert_eq!(format_money(price("2.5"), "$"), "$2.50");
        assert_eq!(format_money(price("999.999"), "$"), "$1,000.00");
        assert_eq!(format_money(price("1234567.891"), "$"), "$1,234,567.89");
        assert_eq!(format_money(price("0.005"), "€"), "€0.01");
        assert_eq!(format_money(price("-12.345"), "$"), "-$12.35");
    }

    #[test]
    fn test_truncate_cell() {
        assert_eq!(truncate_cell("short"), "short");
        assert_eq!(truncate_cell("exactly 18 chars!!"), "exactly 18 chars!!");
        assert_eq!(
            truncate_cell("a considerably longer product name"),
            "a considerably lon..."
        );
    }

    #[test]
    fn test_build_report_rows_and_totals() {
        let report = build_report(&widget_and_gadget().snapshot(), &options_at(9));
        assert_eq!(report.rows.len(), 2);
        assert_eq!(
            report.rows[0].cells,
            [
                "PROD-0001".to_string(),
                "Widget".to_string(),
                "Tools".to_string(),
                "10".to_string(),
                "$2.50".to_string(),
                String::new(),
            ]
        );
        assert_eq!(report.total_quantity, 10);
        assert_eq!(report.total_value, price("25.00"));
        assert_eq!(report.total_value_display, "$25.00");
        assert_eq!(report.generated_at, "2026-10-18 09:30 UTC");
    }

    #[test]
    fn test_generate_is_byte_identical_for_same_input() {
        let snapshot = three_item_snapshot();
        assert_eq!(
            generate(&snapshot, &options_at(9)),
            generate(&snapshot, &options_at(9))
        );
    }

    #[test]
    fn test_generate_changes_only_with_timestamp() {
        let snapshot = three_item_snapshot();
        let morning = generate(&snapshot, &options_at(9));
        let evening = generate(&snapshot, &options_at(18));
        assert_ne!(morning, evening);
        assert!(String::from_utf8_lossy(&evening).contains("Generated: 2026-10-18 18:30 UTC"));
    }

    #[test]
    fn test_generate_contains_table_and_totals() {
        let bytes = generate(&three_item_snapshot(), &options_at(9));
        let text = String::from_utf8_lossy(&bytes);
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(text.contains("(Inventory Report) Tj"));
        assert!(text.contains("(Unit price) Tj"));
        assert!(text.contains("(Apples) Tj"));
        assert!(text.contains("(Total inventory value:) Tj"));
        assert!(text.contains("($20.00) Tj"));
        assert!(text.contains("(Page 1 of 1) Tj"));
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_generate_prints_euro_symbol() {
        let options = ReportOptions {
            currency_symbol: "\u{20ac}".to_string(),
            ..options_at(9)
        };
        let bytes = generate(&three_item_snapshot(), &options);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(\\20020.00) Tj"));
        assert!(!text.contains("(?20.00) Tj"));
    }

    #[test]
    fn test_generate_truncates_long_names() {
        let mut store = RecordStore::new();
        store
            .add(NewProduct::new("Industrial strength widget", 1, price("1.00")))
            .unwrap();
        let text = String::from_utf8_lossy(&generate(&store.snapshot(), &options_at(9))).into_owned();
        assert!(text.contains("(Industrial strengt...) Tj"));
    }

    #[test]
    fn test_generate_empty_snapshot_has_one_page() {
        let bytes = generate(&Snapshot::default(), &options_at(9));
        assert_eq!(page_count(&bytes), 1);
        assert!(String::from_utf8_lossy(&bytes).contains("($0.00) Tj"));
    }

    #[test]
    fn test_generate_paginates_large_inventories() {
        let bytes = generate(&numbered_store(120).snapshot(), &options_at(9));
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(page_count(&bytes), 3);
        assert!(text.contains("/Count 3"));
        assert!(text.contains("(Page 3 of 3) Tj"));
        // Header row repeats on every page
        assert_eq!(text.matches("(Quantity) Tj").count(), 3);
    }

    #[test]
    fn test_plan_pages_keeps_room_for_totals() {
        assert_eq!(plan_pages(0), vec![0..0]);
        assert_eq!(plan_pages(10), vec![0..10]);

        // A first page that fits every row but not the totals spills totals onto page two
        let capacity = plan_pages(500)[0].len();
        let plan = plan_pages(capacity);
        assert_eq!(plan, vec![0..capacity, capacity..capacity]);
    }
}
