/// Aggregate statistics and text charts over a snapshot
pub mod dashboard;
/// Minimal deterministic PDF writer
pub mod pdf;
/// Loading and saving the record store through `SeaORM`
pub mod persistence;
/// Product records and their validation rules
pub mod product;
/// Tabular PDF inventory report
pub mod report;
/// Spreadsheet import and export, dispatching on file type
pub mod spreadsheet;
/// In-memory record store
pub mod store;
/// Excel workbook import and export
pub mod workbook;
