//! Spreadsheet import and export.
//!
//! Products travel as CSV or as an Excel workbook (see [`workbook`]), one row per
//! product; the file extension picks the format. Import reads loosely-labelled
//! columns, pushes every row through the validating constructor and collects
//! per-row failures instead of aborting; only file-level problems (no header,
//! missing required columns) fail the whole import. Export writes a fixed column
//! order so the output is stable for identical snapshots.

use crate::{
    core::{
        product::NewProduct,
        store::{RecordStore, Snapshot},
        workbook,
    },
    errors::{Error, Result},
};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

/// Column order written by [`export`].
pub const EXPORT_HEADERS: [&str; 6] = ["id", "name", "quantity", "unit_price", "category", "location"];

/// How imported rows combine with what is already in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Append to existing products; rows reusing an existing id fail.
    #[default]
    Merge,
    /// Discard existing products and keep only the valid imported rows.
    Replace,
}

/// One rejected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based line number in the file (the header is line 1)
    pub line: u64,
    /// Why the row was rejected
    pub message: String,
}

/// Result of an import: ids that were added and rows that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Ids of the products added, in file order
    pub added: Vec<String>,
    /// Rows that failed validation
    pub failures: Vec<RowFailure>,
}

impl ImportOutcome {
    /// Number of products added
    #[must_use]
    pub fn count(&self) -> usize {
        self.added.len()
    }

    /// True when every data row was imported
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Name,
    Quantity,
    UnitPrice,
    Category,
    Location,
}

impl Field {
    const fn label(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Quantity => "quantity",
            Self::UnitPrice => "unit_price",
            Self::Category => "category",
            Self::Location => "location",
        }
    }

    /// Maps a header cell to a field. English and Spanish spellings are accepted.
    fn from_header(header: &str) -> Option<Self> {
        let normalized = header.trim().to_lowercase().replace(['_', '-'], " ");
        let field = match normalized.as_str() {
            "id" | "sku" => Self::Id,
            "name" | "product" | "producto" => Self::Name,
            "quantity" | "qty" | "cantidad" | "cant" => Self::Quantity,
            "unit price" | "price" | "precio" | "precio unitario" => Self::UnitPrice,
            "category" | "categoria" | "categoría" => Self::Category,
            "location" | "ubicacion" | "ubicación" | "locacion" => Self::Location,
            _ => return None,
        };
        Some(field)
    }
}

/// Column positions resolved from the header row.
#[derive(Debug, Default)]
struct ColumnMap {
    id: Option<usize>,
    name: usize,
    quantity: usize,
    unit_price: usize,
    category: Option<usize>,
    location: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut slots: [Option<usize>; 6] = [None; 6];
        for (position, header) in headers.iter().enumerate() {
            let Some(field) = Field::from_header(header) else {
                debug!(header, "Ignoring unknown column");
                continue;
            };
            let slot = &mut slots[field as usize];
            if slot.is_some() {
                return Err(Error::format(format!(
                    "column '{}' appears more than once",
                    field.label()
                )));
            }
            *slot = Some(position);
        }

        let required = |field: Field| {
            slots[field as usize].ok_or_else(|| {
                Error::format(format!("missing required column '{}'", field.label()))
            })
        };

        Ok(Self {
            id: slots[Field::Id as usize],
            name: required(Field::Name)?,
            quantity: required(Field::Quantity)?,
            unit_price: required(Field::UnitPrice)?,
            category: slots[Field::Category as usize],
            location: slots[Field::Location as usize],
        })
    }

    fn parse_row(&self, record: &StringRecord) -> std::result::Result<NewProduct, String> {
        let cell = |position: usize| record.get(position).map_or("", str::trim);
        let optional = |position: Option<usize>| {
            position
                .map(cell)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let quantity_text = cell(self.quantity);
        let quantity = i64::from_str(quantity_text)
            .map_err(|_| format!("quantity '{quantity_text}' is not a whole number"))?;

        let price_text = cell(self.unit_price);
        let unit_price = Decimal::from_str(price_text)
            .map_err(|_| format!("unit_price '{price_text}' is not a decimal number"))?;

        Ok(NewProduct {
            id: optional(self.id),
            name: cell(self.name).to_string(),
            quantity,
            unit_price,
            category: optional(self.category),
            location: optional(self.location),
        })
    }
}

/// One data row handed to the shared import pipeline.
#[derive(Debug)]
pub(crate) enum SourceRow {
    /// Cell text of a row at a 1-based line (or sheet row) number
    Cells {
        /// Line or row number reported in failures
        line: u64,
        /// Cell text in file column order
        record: StringRecord,
    },
    /// A row the reader could not decode
    Unreadable(RowFailure),
}

/// Imports products from CSV data into `store`.
///
/// Rows are validated one by one; bad rows are reported in the outcome and skipped.
/// The store is only modified once the whole file has been read, so a file-level
/// error leaves it untouched.
///
/// # Errors
/// Returns [`Error::Format`] if the file has no header or lacks a required column,
/// and [`Error::Csv`] / [`Error::Io`] if the reader itself fails.
#[instrument(skip(store, reader))]
pub fn import<R: Read>(store: &mut RecordStore, reader: R, mode: ImportMode) -> Result<ImportOutcome> {
    let mut csv_reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let rows = csv_reader.records().enumerate().map(|(offset, result)| {
        // Header is line 1, so the first data row is line 2
        let fallback_line = offset as u64 + 2;
        match result {
            Ok(record) => {
                let line = record.position().map_or(fallback_line, csv::Position::line);
                Ok(SourceRow::Cells { line, record })
            }
            Err(e) if e.is_io_error() => Err(Error::from(e)),
            Err(e) => {
                let line = e.position().map_or(fallback_line, csv::Position::line);
                Ok(SourceRow::Unreadable(RowFailure {
                    line,
                    message: e.to_string(),
                }))
            }
        }
    });
    import_rows(store, &headers, rows, mode)
}

/// Validates `rows` against `headers` and applies them to `store` according to `mode`.
///
/// Shared by the CSV and workbook readers; the store is swapped in only after the
/// last row has been read.
pub(crate) fn import_rows<I>(
    store: &mut RecordStore,
    headers: &StringRecord,
    rows: I,
    mode: ImportMode,
) -> Result<ImportOutcome>
where
    I: IntoIterator<Item = Result<SourceRow>>,
{
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(Error::format("file is empty"));
    }
    let columns = ColumnMap::from_headers(headers)?;

    let mut staged = match mode {
        ImportMode::Merge => store.clone(),
        ImportMode::Replace => RecordStore::with_id_prefix(store.id_prefix()),
    };
    let mut outcome = ImportOutcome::default();

    for row in rows {
        let (line, record) = match row? {
            SourceRow::Cells { line, record } => (line, record),
            SourceRow::Unreadable(failure) => {
                warn!(line = failure.line, error = %failure.message, "Skipping unreadable row");
                outcome.failures.push(failure);
                continue;
            }
        };

        if record.iter().all(|value| value.trim().is_empty()) {
            debug!(line, "Skipping blank row");
            continue;
        }

        let added = columns
            .parse_row(&record)
            .and_then(|input| staged.add(input).map_err(|e| e.to_string()));
        match added {
            Ok(id) => outcome.added.push(id),
            Err(message) => {
                warn!(line, %message, "Rejected import row");
                outcome.failures.push(RowFailure { line, message });
            }
        }
    }

    *store = staged;
    info!(
        added = outcome.count(),
        failed = outcome.failures.len(),
        ?mode,
        "Import finished"
    );
    Ok(outcome)
}

/// Writes `snapshot` as CSV with the [`EXPORT_HEADERS`] column order.
///
/// # Errors
/// Returns an error if writing to `writer` fails.
pub fn export<W: Write>(snapshot: &Snapshot, writer: W) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(EXPORT_HEADERS)?;
    for product in snapshot {
        let quantity = product.quantity().to_string();
        let unit_price = product.unit_price().to_string();
        csv_writer.write_record([
            product.id(),
            product.name(),
            quantity.as_str(),
            unit_price.as_str(),
            product.category().unwrap_or_default(),
            product.location().unwrap_or_default(),
        ])?;
    }
    csv_writer.flush()?;
    debug!(rows = snapshot.len(), "Exported snapshot");
    Ok(())
}

/// Convenience wrapper around [`export`] returning the file contents.
///
/// # Errors
/// Returns an error if CSV encoding fails.
pub fn export_bytes(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    export(snapshot, &mut buffer)?;
    Ok(buffer)
}

/// Spreadsheet file formats, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.csv`
    Csv,
    /// `.xlsx`, the only workbook format that can also be written
    Xlsx,
    /// `.xls`, `.xlsm`, `.xlsb` or `.ods`; import only
    Workbook,
}

impl FileFormat {
    /// Detects the format from `path`'s extension, ignoring case.
    ///
    /// # Errors
    /// Returns [`Error::Format`] for a missing or unsupported extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "xls" | "xlsm" | "xlsb" | "ods" => Ok(Self::Workbook),
            _ => Err(Error::format(format!(
                "unsupported file type '{}'; use .csv, .xlsx or .xls",
                path.display()
            ))),
        }
    }
}

/// Imports a CSV or workbook file, choosing the reader from the extension.
///
/// # Errors
/// Returns [`Error::Format`] for an unsupported extension, plus whatever the
/// chosen reader reports.
pub fn import_file(store: &mut RecordStore, path: &Path, mode: ImportMode) -> Result<ImportOutcome> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => import(store, BufReader::new(File::open(path)?), mode),
        FileFormat::Xlsx | FileFormat::Workbook => workbook::import(store, path, mode),
    }
}

/// Exports `snapshot` to a `.csv` or `.xlsx` file.
///
/// `currency_symbol` is used for the price column's number format in workbooks.
///
/// # Errors
/// Returns [`Error::Format`] for an extension that cannot be written, or an
/// I/O or encoding error.
pub fn export_file(snapshot: &Snapshot, path: &Path, currency_symbol: &str) -> Result<()> {
    match FileFormat::from_path(path)? {
        FileFormat::Csv => {
            let mut writer = BufWriter::new(File::create(path)?);
            export(snapshot, &mut writer)?;
            writer.flush()?;
        }
        FileFormat::Xlsx => {
            let bytes = workbook::export_bytes(snapshot, currency_symbol)?;
            std::fs::write(path, bytes)?;
        }
        FileFormat::Workbook => {
            return Err(Error::format(format!(
                "cannot write '{}'; export to .xlsx or .csv instead",
                path.display()
            )));
        }
    }
    Ok(())
}
