//! Data provider traits.
//!
//! Each trait covers one ingestion concern so a single client may implement
//! several of them. Absent data is `None` or empty, never an error; errors
//! are reserved for transport and authentication failures.

use std::future::Future;

use crate::error::Result;
use crate::fundamental::Fundamental;
use crate::types::{Sentiment, Stock, StockPrice};

/// Lists the tradable universe.
pub trait ListingSource: Send + Sync {
    /// Fetch listed stocks in exchange order.
    fn stocks(&self) -> impl Future<Output = Result<Vec<Stock>>> + Send;
}

/// Supplies raw fundamentals.
pub trait FundamentalSource: Send + Sync {
    /// Fetch the latest fundamentals of `stock`, `None` when unpublished.
    fn fundamental(&self, stock: &Stock) -> impl Future<Output = Result<Option<Fundamental>>> + Send;
}

/// Supplies price snapshots.
pub trait PriceSource: Send + Sync {
    /// Fetch the latest order-book snapshot of `stock`.
    fn price(&self, stock: &Stock) -> impl Future<Output = Result<Option<StockPrice>>> + Send;
}

/// Supplies public posts.
pub trait SentimentSource: Send + Sync {
    /// Fetch recent posts about `stock`.
    fn sentiments(&self, stock: &Stock) -> impl Future<Output = Result<Vec<Sentiment>>> + Send;
}
