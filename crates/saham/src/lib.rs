#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/saham/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # saham
//!
//! saham is an umbrella crate that re-exports all saham sub-crates for
//! convenience.
//!
//! ## Quick Start
//!
//! ```ignore
//! use saham::{Company, Stock};
//! use saham::analysis::BatchAnalyser;
//! use saham::report::{Report, sink::ExcelSink};
//! use saham::stockbit::StockbitClient;
//!
//! let stockbit = StockbitClient::from_env()?;
//! let stock = Stock::new("BBCA");
//!
//! let mut company = Company::new(stock);
//! company.fundamental = stockbit.fundamental("BBCA").await?;
//! company.stock_price = stockbit.price("BBCA").await?.unwrap_or_default();
//!
//! let mut companies = vec![company];
//! BatchAnalyser::default().run(&mut companies);
//!
//! let mut sink = ExcelSink::new(".", "IDX Fundamental Analysis");
//! Report::build(&companies).write_to(&mut sink).await?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Records, sheets, provider and sink traits
//! - [`analysis`] - Key-analysis derivation and the metric registry
//! - [`report`] - Sheet tabulation, output selector and sinks
//! - [`stockbit`] - Stockbit client for key statistics, prices and posts
//! - [`idx`] - Exchange listing scraper
//!
//! ## Architecture
//!
//! 1. **Providers** fill [`Company`] records
//! 2. **Analysis** derives a [`KeyAnalysis`] per company
//! 3. **Report** tabulates companies into sheets
//! 4. **Sinks** write sheets or records to their destination

/// Version information for the saham crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core records and traits.
pub mod traits {
    pub use saham_traits::*;
}

/// Key-analysis derivation.
pub mod analysis {
    pub use saham_analysis::*;
}

/// Report tabulation and sinks.
pub mod report {
    pub use saham_report::*;
}

/// Stockbit API client.
pub mod stockbit {
    pub use saham_stockbit::*;
}

/// Exchange listing provider.
pub mod idx {
    pub use saham_idx::*;
}

pub use saham_traits::{
    Company, Fundamental, KeyAnalysis, Result, SahamError, Sentiment, Sheet, SheetKind, Stock,
    StockPrice,
};
