//! Stockbit API client for saham.
//!
//! This crate fetches per-ticker market data from the Stockbit API: key
//! statistics (parsed into [`saham_traits::Fundamental`]), orderbook
//! snapshots (parsed into [`saham_traits::StockPrice`]) and stream posts
//! (parsed into [`saham_traits::Sentiment`]).
//!
//! # Usage
//!
//! ```rust,ignore
//! use saham_stockbit::StockbitClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StockbitClient::from_env()?;
//!
//!     // Key statistics, mapped by label
//!     let fundamental = client.fundamental("BBCA").await?;
//!
//!     // Latest orderbook snapshot
//!     let price = client.price("BBCA").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! Set the account credentials in your environment or `.env` file:
//!
//! ```bash
//! STOCKBIT_USERNAME=you@example.com
//! STOCKBIT_PASSWORD=your_password
//! ```
//!
//! Tokens are cached in the system temp directory between runs.

mod client;
mod error;
pub mod parse;
mod types;

pub use client::{StockbitClient, TokenStore, Tokens};
pub use error::StockbitError;
pub use types::*;

/// Result type for Stockbit operations.
pub type Result<T> = std::result::Result<T, StockbitError>;
