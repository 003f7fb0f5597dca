//! Output sinks.
//!
//! - [`ExcelSink`]: one workbook, one worksheet per sheet
//! - [`SpreadsheetSink`]: a shared Google spreadsheet
//! - [`CsvSink`]: one CSV file per sheet
//! - [`DatabaseSink`]: SQLite tables, one transaction per company

mod csv;
mod database;
mod excel;
mod spreadsheet;

pub use csv::CsvSink;
pub use database::DatabaseSink;
pub use excel::ExcelSink;
pub use spreadsheet::{ServiceAccount, SpreadsheetConfig, SpreadsheetSink};

use saham_traits::SahamError;
use std::fmt::Display;

/// Wrap a backend error as a sink error.
pub(crate) fn sink_error(context: &str, err: impl Display) -> SahamError {
    SahamError::Sink(format!("{context}: {err}"))
}

/// File-name safe form of a report title.
pub(crate) fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() { "report".to_string() } else { stem }
}
