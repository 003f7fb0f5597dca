//! Derived key-analysis metrics.

use serde::{Deserialize, Serialize};

/// The twelve derived indicators of one company, each rounded to two decimals.
///
/// A company without fundamentals carries the all-zero default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyAnalysis {
    /// Book value per share scaled by return on equity, shown as "PBV x ROE".
    pub normal_price: f64,
    /// Absolute deviation of the close from the normal price.
    pub price_to_equity_discount: f64,
    /// PE rank relative to the market median PE.
    pub relative_pe_ratio_ttm: f64,
    /// Annualised EPS growth over TTM EPS.
    pub eps_growth: f64,
    /// Total debt over total assets.
    pub debt_to_total_assets_ratio: f64,
    /// Current ratio over quick ratio.
    pub liquidity_differential: f64,
    /// Operating cash flow over revenue.
    pub cce: f64,
    /// Operating over gross margin.
    pub operating_efficiency: f64,
    /// Mean dividend over net income.
    pub dividend_payout_efficiency: f64,
    /// One-year price return over revenue.
    pub yearly_price_change: f64,
    /// Weighted mean of the market ranks.
    pub composite_rank: f64,
    /// Net debt over total equity.
    pub net_debt_to_equity_ratio: f64,
}

impl KeyAnalysis {
    /// Field names, in analysis-sheet column order.
    pub const COLUMNS: &'static [&'static str] = &[
        "normal_price",
        "price_to_equity_discount",
        "relative_pe_ratio_ttm",
        "eps_growth",
        "debt_to_total_assets_ratio",
        "liquidity_differential",
        "cce",
        "operating_efficiency",
        "dividend_payout_efficiency",
        "yearly_price_change",
        "composite_rank",
        "net_debt_to_equity_ratio",
    ];

    /// Look up a metric by its field name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "normal_price" => self.normal_price,
            "price_to_equity_discount" => self.price_to_equity_discount,
            "relative_pe_ratio_ttm" => self.relative_pe_ratio_ttm,
            "eps_growth" => self.eps_growth,
            "debt_to_total_assets_ratio" => self.debt_to_total_assets_ratio,
            "liquidity_differential" => self.liquidity_differential,
            "cce" => self.cce,
            "operating_efficiency" => self.operating_efficiency,
            "dividend_payout_efficiency" => self.dividend_payout_efficiency,
            "yearly_price_change" => self.yearly_price_change,
            "composite_rank" => self.composite_rank,
            "net_debt_to_equity_ratio" => self.net_debt_to_equity_ratio,
            _ => return None,
        };
        Some(value)
    }

    /// Whether every metric is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}
