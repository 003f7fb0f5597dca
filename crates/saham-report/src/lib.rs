#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

//! # Example
//!
//! ```rust,ignore
//! use saham_report::{OutputFormat, Report, sink::ExcelSink};
//!
//! let format: OutputFormat = "excel".parse()?;
//! let mut sink = ExcelSink::new("out", "IDX Fundamental Analysis");
//! Report::build(&companies).write_to(&mut sink).await?;
//! ```

pub mod format;
pub mod report;
pub mod sink;
pub mod tabulate;

pub use format::OutputFormat;
pub use report::Report;
pub use tabulate::{
    analysis_sheet, key_statistics_sheet, sentiment_sheet, stock_price_sheet, stocks_sheet,
};
