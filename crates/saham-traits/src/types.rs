//! Listing, price and sentiment records, and the [`Company`] aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fundamental::Fundamental;
use crate::key_analysis::KeyAnalysis;

/// Exchange ticker, e.g. `"BBCA"`.
pub type Symbol = String;

/// A listed company as published by the exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    /// Ticker.
    pub ticker: Symbol,
    /// Company name.
    pub name: String,
    /// Listing date, as published.
    pub ipo_date: String,
    /// Market capitalisation.
    pub market_cap: f64,
    /// Board or special-notation remark.
    pub note: String,
    /// Company home page.
    pub home_page: String,
}

impl Stock {
    /// Create a listing with only the ticker set.
    #[must_use]
    pub fn new(ticker: impl Into<Symbol>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }
}

/// Order-book snapshot of one stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StockPrice {
    /// Last traded price.
    pub price: f64,
    /// Traded volume.
    pub volume: i64,
    /// Absolute change from previous close.
    pub change: f64,
    /// Percentage change from previous close.
    pub percentage_change: f64,
    /// Average traded price.
    pub average: f64,
    /// Close price.
    pub close: f64,
    /// Session high.
    pub high: f64,
    /// Session low.
    pub low: f64,
    /// Session open.
    pub open: f64,
    /// Upper auto-rejection limit.
    pub ara: f64,
    /// Lower auto-rejection limit.
    pub arb: f64,
    /// Number of trades.
    pub frequency: i64,
    /// Foreign sell.
    pub fsell: f64,
    /// Foreign buy.
    pub fbuy: f64,
}

/// One public post about a stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// Post body.
    pub content: String,
    /// Sentiment rate in `[-1, 1]`.
    pub rate: f64,
    /// Free-form category label.
    pub category: String,
    /// Publication time.
    pub posted_at: DateTime<Utc>,
}

/// Everything known about one company in one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Listing record.
    pub stock: Stock,
    /// Raw fundamentals, absent when the provider had none.
    pub fundamental: Option<Fundamental>,
    /// Derived metrics.
    pub key_analysis: KeyAnalysis,
    /// Latest price snapshot.
    pub stock_price: StockPrice,
    /// Public posts.
    pub sentiments: Vec<Sentiment>,
}

impl Company {
    /// Create a company from its listing, with nothing else attached.
    #[must_use]
    pub fn new(stock: Stock) -> Self {
        Self {
            stock,
            ..Default::default()
        }
    }

    /// The company ticker.
    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.stock.ticker
    }

    /// Close price of the latest snapshot.
    #[must_use]
    pub const fn close(&self) -> f64 {
        self.stock_price.close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_new() {
        let company = Company::new(Stock::new("UNVR"));
        assert_eq!(company.ticker(), "UNVR");
        assert!(company.fundamental.is_none());
        assert!(company.key_analysis.is_zero());
        assert_eq!(company.close(), 0.0);
        assert!(company.sentiments.is_empty());
    }

    #[test]
    fn test_close_reads_snapshot() {
        let mut company = Company::new(Stock::new("BBRI"));
        company.stock_price.close = 4_650.0;
        assert_eq!(company.close(), 4_650.0);
    }
}
