//! Key-analysis metrics for the saham pipeline.
//!
//! This crate turns one company's raw fundamentals and close price into the
//! twelve derived metrics of [`KeyAnalysis`]:
//! - Valuation: normal price, discount to normal price, relative PE
//! - Leverage: debt to assets, net debt to equity
//! - Efficiency: liquidity differential, cash conversion, operating efficiency
//! - Growth, dividend and ranking: EPS growth, payout efficiency, composite rank
//!
//! Derivation never fails. A missing record or a non-positive denominator
//! yields zero for the affected metric.
//!
//! # Example
//!
//! ```ignore
//! use saham_analysis::{BatchAnalyser, registry::available_metrics};
//!
//! let summary = BatchAnalyser::default().run(&mut companies);
//! for info in available_metrics() {
//!     println!("{}: {}", info.label, info.description);
//! }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod batch;
pub mod derive;
pub mod registry;

pub use batch::{BatchAnalyser, BatchSummary};
pub use derive::{KeyAnalysisEngine, derive_key_analysis, guarded_ratio, round2};
pub use registry::{MetricCategory, MetricInfo};
pub use saham_traits::KeyAnalysis;
