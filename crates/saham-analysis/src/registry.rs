//! Metric registry for discovering and categorizing the derived metrics.
//!
//! The registry lists the twelve key-analysis metrics in analysis-sheet
//! order, with the header label each one is published under.

use serde::{Deserialize, Serialize};

/// Metric category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricCategory {
    /// Price relative to book or earnings
    Valuation,
    /// Earnings growth
    Growth,
    /// Debt relative to assets or equity
    Leverage,
    /// Short-term liquidity and cash generation
    Efficiency,
    /// Dividend distribution
    Dividend,
    /// Price performance and market ranks
    Market,
}

impl MetricCategory {
    /// Get a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &str {
        match self {
            Self::Valuation => "Price compared with book value and market earnings",
            Self::Growth => "Earnings per share growth",
            Self::Leverage => "Debt load relative to assets and equity",
            Self::Efficiency => "Liquidity, cash conversion and margin efficiency",
            Self::Dividend => "Dividend paid out of net income",
            Self::Market => "Price performance and percentile ranks",
        }
    }

    /// Parse a category from its name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        available_categories()
            .into_iter()
            .find(|c| format!("{c:?}").eq_ignore_ascii_case(name))
    }
}

/// Metadata about a derived metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricInfo {
    /// Field name on the key-analysis record
    pub name: &'static str,

    /// Analysis-sheet header label
    pub label: &'static str,

    /// Category classification
    pub category: MetricCategory,

    /// Human-readable formula
    pub description: &'static str,

    /// Fundamentals field that must be strictly positive, if any
    pub guard: Option<&'static str>,
}

/// Get information about all derived metrics, in analysis-sheet order.
#[must_use]
pub fn available_metrics() -> Vec<MetricInfo> {
    vec![
        MetricInfo {
            name: "normal_price",
            label: "PBV x ROE",
            category: MetricCategory::Valuation,
            description: "Book value per share x ROE (TTM) x 10",
            guard: None,
        },
        MetricInfo {
            name: "price_to_equity_discount",
            label: "Price to Equity Discount (%)",
            category: MetricCategory::Valuation,
            description: "|1 - close / normal price x 100|",
            guard: Some("normal_price"),
        },
        MetricInfo {
            name: "relative_pe_ratio_ttm",
            label: "Relative PE ratio (TTM)",
            category: MetricCategory::Valuation,
            description: "PE rank (TTM) / IHSG median PE (TTM)",
            guard: Some("ihsg_pe_ratio_ttm_median"),
        },
        MetricInfo {
            name: "eps_growth",
            label: "EPS Growth",
            category: MetricCategory::Growth,
            description: "(annualised EPS - TTM EPS) / TTM EPS",
            guard: Some("current_eps_ttm"),
        },
        MetricInfo {
            name: "debt_to_total_assets_ratio",
            label: "Debt to Total Assets Ratio",
            category: MetricCategory::Leverage,
            description: "Total debt / total assets",
            guard: Some("total_assets_quarter"),
        },
        MetricInfo {
            name: "liquidity_differential",
            label: "Liquidity Differential",
            category: MetricCategory::Efficiency,
            description: "Current ratio / quick ratio",
            guard: Some("quick_ratio_quarter"),
        },
        MetricInfo {
            name: "cce",
            label: "CCE",
            category: MetricCategory::Efficiency,
            description: "Cash from operations (TTM) / revenue (TTM)",
            guard: Some("revenue_ttm"),
        },
        MetricInfo {
            name: "operating_efficiency",
            label: "Operating Efficiency",
            category: MetricCategory::Efficiency,
            description: "Operating margin / gross margin",
            guard: Some("gross_profit_margin_quarter"),
        },
        MetricInfo {
            name: "dividend_payout_efficiency",
            label: "Dividend Payout Efficiency",
            category: MetricCategory::Dividend,
            description: "(dividend + dividend TTM) / (2 x net income TTM)",
            guard: Some("net_income_ttm"),
        },
        MetricInfo {
            name: "yearly_price_change",
            label: "Yearly Price Change",
            category: MetricCategory::Market,
            description: "1-year price return / revenue (TTM)",
            guard: Some("revenue_ttm"),
        },
        MetricInfo {
            name: "composite_rank",
            label: "Composite Rank",
            category: MetricCategory::Market,
            description: "(2 x PE rank + earnings-yield, P/S, P/B and 52-week-high ranks) / 6",
            guard: None,
        },
        MetricInfo {
            name: "net_debt_to_equity_ratio",
            label: "Net Debt to Equity",
            category: MetricCategory::Leverage,
            description: "Net debt / total equity",
            guard: Some("total_equity"),
        },
    ]
}

/// Get all metrics in a specific category.
#[must_use]
pub fn metrics_by_category(category: &MetricCategory) -> Vec<MetricInfo> {
    available_metrics()
        .into_iter()
        .filter(|info| &info.category == category)
        .collect()
}

/// Get information about a specific metric by name.
#[must_use]
pub fn get_metric_info(name: &str) -> Option<MetricInfo> {
    available_metrics()
        .into_iter()
        .find(|info| info.name == name)
}

/// Get all metric categories with metrics.
#[must_use]
pub fn available_categories() -> Vec<MetricCategory> {
    let mut categories: Vec<_> = available_metrics()
        .into_iter()
        .map(|info| info.category)
        .collect();
    categories.sort_by_key(|c| format!("{c:?}"));
    categories.dedup();
    categories
}
