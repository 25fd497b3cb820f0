//! Excel workbook import and export.
//!
//! Reading goes through `calamine` and accepts any workbook it can open; only the
//! first worksheet is used. Cells are turned into text and fed to the same row
//! pipeline as CSV, so header aliases and per-row failures behave identically.
//! Writing produces `.xlsx` with `rust_xlsxwriter`: a bold header row, fixed
//! column widths and a currency number format on the price column.

use crate::{
    core::{
        spreadsheet::{self, EXPORT_HEADERS, ImportMode, ImportOutcome, SourceRow},
        store::{RecordStore, Snapshot},
    },
    errors::{Error, Result},
};
use calamine::{Data, Reader, open_workbook_auto};
use csv::StringRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::{debug, instrument};

/// Name of the worksheet written by [`export_bytes`].
pub const SHEET_NAME: &str = "Inventory";

/// Column widths in characters, in [`EXPORT_HEADERS`] order.
const COLUMN_WIDTHS: [f64; 6] = [15.0, 30.0, 10.0, 12.0, 20.0, 15.0];
const PRICE_COLUMN: u16 = 3;

/// Imports products from the first worksheet of the workbook at `path`.
///
/// The first row of the sheet's used range is the header.
///
/// # Errors
/// Returns [`Error::Workbook`] if the file cannot be opened or decoded, and
/// [`Error::Format`] if it has no worksheet, no header or lacks a required column.
#[instrument(skip(store))]
pub fn import(store: &mut RecordStore, path: &Path, mode: ImportMode) -> Result<ImportOutcome> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::format("workbook has no worksheets"))??;

    // Range rows are 0-based; reported lines match the spreadsheet's row numbers
    let first_row = u64::from(range.start().map_or(0, |(row, _)| row));
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|cells| cells.iter().map(cell_text).collect::<StringRecord>())
        .unwrap_or_else(StringRecord::new);
    debug!(?headers, "Read workbook header");

    let records = rows.enumerate().map(|(offset, cells)| {
        Ok(SourceRow::Cells {
            line: first_row + offset as u64 + 2,
            record: cells.iter().map(cell_text).collect(),
        })
    });
    spreadsheet::import_rows(store, &headers, records, mode)
}

/// Renders `snapshot` as an `.xlsx` workbook.
///
/// # Errors
/// Returns [`Error::Xlsx`] if the workbook cannot be assembled, or
/// [`Error::Format`] if a price has no floating-point representation.
pub fn export_bytes(snapshot: &Snapshot, currency_symbol: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let money_format = Format::new().set_num_format(money_number_format(currency_symbol));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    for ((col, title), width) in (0_u16..).zip(EXPORT_HEADERS).zip(COLUMN_WIDTHS) {
        worksheet.write_string_with_format(0, col, title, &header_format)?;
        worksheet.set_column_width(col, width)?;
    }

    for (row, product) in (1_u32..).zip(snapshot) {
        let unit_price = product.unit_price().to_f64().ok_or_else(|| {
            Error::format(format!(
                "unit price {} of '{}' cannot be written to a workbook",
                product.unit_price(),
                product.id()
            ))
        })?;

        worksheet.write_string(row, 0, product.id())?;
        worksheet.write_string(row, 1, product.name())?;
        worksheet.write_number(row, 2, product.quantity())?;
        worksheet.write_number_with_format(row, PRICE_COLUMN, unit_price, &money_format)?;
        if let Some(category) = product.category() {
            worksheet.write_string(row, 4, category)?;
        }
        if let Some(location) = product.location() {
            worksheet.write_string(row, 5, location)?;
        }
    }

    debug!(rows = snapshot.len(), "Exported workbook");
    Ok(workbook.save_to_buffer()?)
}

/// Excel number format showing `symbol` before a grouped two-decimal amount.
fn money_number_format(symbol: &str) -> String {
    format!("\"{}\"#,##0.00", symbol.replace('"', ""))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.clone(),
        // Whole floats display without a fraction ("10"), so quantities parse as integers
        other => other.to_string(),
    }
}
