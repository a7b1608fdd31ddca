//! # Agrotrack Exporter
//!
//! Writes production data as UTF-8, comma-separated files with a mandatory
//! header row, for analysis in external statistical tools.
//!
//! Three files are supported, each with a fixed column order:
//!
//! - the full record set, each row extended with its derived metrics;
//! - one row per product (`ProductSummary`);
//! - one row per harvest month (`MonthlySummary`).
//!
//! A file is either written completely or not at all.

pub mod error;
pub mod rows;
pub mod writer;

pub use error::ExportError;
pub use rows::{MONTHLY_COLUMNS, PRODUCT_COLUMNS, RECORD_COLUMNS};
pub use writer::{CsvExporter, ExportKind};
