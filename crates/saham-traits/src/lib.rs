#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/saham/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and traits for the saham fundamental analysis pipeline.
//!
//! This crate carries no I/O. Providers fill the records defined here,
//! the analysis crate derives [`KeyAnalysis`] from them, and the report
//! crate turns [`Company`] collections into [`Sheet`]s for the sinks.

/// The version of the saham-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
mod macros;

// Module declarations
pub mod error;
pub mod fundamental;
pub mod key_analysis;
pub mod provider;
pub mod sheet;
pub mod sink;
pub mod types;

// Re-exports
pub use error::{Result, SahamError};
pub use fundamental::{
    BalanceSheet, CashFlowStatement, CurrentValuation, Dividend, Fundamental, Growth,
    IncomeStatement, ManagementEffectiveness, MarketRank, PerShare, PricePerformance,
    Profitability, Solvency, Stats,
};
pub use key_analysis::KeyAnalysis;
pub use provider::{FundamentalSource, ListingSource, PriceSource, SentimentSource};
pub use sheet::{Cell, Sheet, SheetKind};
pub use sink::{RecordSink, SheetSink};
pub use types::{Company, Sentiment, Stock, StockPrice, Symbol};
