//! Indonesia Stock Exchange listing provider for saham.
//!
//! Fetches the exchange's stock list page and scrapes the company table
//! into [`saham_traits::Stock`] identities.
//!
//! # Usage
//!
//! ```rust,ignore
//! use saham_idx::IdxClient;
//!
//! let stocks = IdxClient::new(true).listing().await?;
//! println!("{} listed companies", stocks.len());
//! ```

mod client;
mod error;

pub use client::{IdxClient, LISTING_URL, PREVIEW_ROWS, parse_listing};
pub use error::IdxError;

/// Result type for IDX operations.
pub type Result<T> = std::result::Result<T, IdxError>;
