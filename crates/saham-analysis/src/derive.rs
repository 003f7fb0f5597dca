//! The metric derivation engine.
//!
//! Every metric is computed at full precision and rounded to two decimals
//! on output, independently of the others. Guarded metrics use a strict
//! `denominator > 0` test; a zero, negative or NaN denominator yields `0.0`.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use saham_traits::{Company, Fundamental, KeyAnalysis};

/// Divide `numerator` by `denominator` when the denominator is strictly
/// positive, otherwise return `0.0`.
#[must_use]
pub fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Round to two decimals the way Python's `round(x, 2)` does: the exact
/// binary value of `value` is rounded, with true ties going to the even digit.
/// So `0.125` gives `0.12` and `2.675` (stored just below) gives `2.67`.
///
/// Non-finite input rounds to `0.0` so no NaN or infinity reaches a sheet.
/// Magnitudes beyond the decimal range are already integral and pass through.
#[must_use]
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let Some(exact) = Decimal::from_f64_retain(value) else {
        return value;
    };
    let rounded = exact
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        .to_f64()
        .unwrap_or(value);
    // Collapse -0.0 so equal outputs share one bit pattern.
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Derive the key-analysis record of one company.
///
/// `None` fundamentals produce the all-zero record.
#[must_use]
pub fn derive_key_analysis(fundamental: Option<&Fundamental>, close: f64) -> KeyAnalysis {
    let Some(f) = fundamental else {
        return KeyAnalysis::default();
    };

    let valuation = &f.current_valuation;
    let per_share = &f.per_share;
    let rank = &f.market_rank;
    let balance = &f.balance_sheet;
    let revenue = f.income_statement.revenue_ttm;

    let normal_price = per_share.current_book_value_per_share
        * f.management_effectiveness.return_on_equity_ttm
        * 10.0;

    let price_to_equity_discount = if normal_price > 0.0 {
        (1.0 - (close / normal_price) * 100.0).abs()
    } else {
        0.0
    };

    // The PE rank is weighted twice; market-cap rank is not part of the mean.
    let composite_rank = (rank.rank_current_pe_ratio_ttm
        + rank.rank_current_pe_ratio_ttm
        + rank.rank_earnings_yield
        + rank.rank_p_s
        + rank.rank_p_b
        + rank.rank_near_52_weeks_high)
        / 6.0;

    KeyAnalysis {
        normal_price: round2(normal_price),
        price_to_equity_discount: round2(price_to_equity_discount),
        relative_pe_ratio_ttm: round2(guarded_ratio(
            rank.rank_current_pe_ratio_ttm,
            valuation.ihsg_pe_ratio_ttm_median,
        )),
        eps_growth: round2(guarded_ratio(
            per_share.current_eps_annualised - per_share.current_eps_ttm,
            per_share.current_eps_ttm,
        )),
        debt_to_total_assets_ratio: round2(guarded_ratio(
            balance.total_debt_quarter,
            balance.total_assets_quarter,
        )),
        liquidity_differential: round2(guarded_ratio(
            f.solvency.current_ratio_quarter,
            f.solvency.quick_ratio_quarter,
        )),
        cce: round2(guarded_ratio(
            f.cash_flow_statement.cash_from_operations_ttm,
            revenue,
        )),
        operating_efficiency: round2(guarded_ratio(
            f.profitability.operating_profit_margin_quarter,
            f.profitability.gross_profit_margin_quarter,
        )),
        dividend_payout_efficiency: round2(guarded_ratio(
            f.dividend.dividend + f.dividend.dividend_ttm,
            2.0 * f.income_statement.net_income_ttm,
        )),
        yearly_price_change: round2(guarded_ratio(
            f.price_performance.one_year_price_returns,
            revenue,
        )),
        composite_rank: round2(composite_rank),
        net_debt_to_equity_ratio: round2(guarded_ratio(
            balance.net_debt_quarter,
            balance.total_equity,
        )),
    }
}

/// Stateless engine applying [`derive_key_analysis`] to companies.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyAnalysisEngine;

impl KeyAnalysisEngine {
    /// Create a new engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Derive the record of one company from its fundamentals and close.
    #[must_use]
    pub fn derive(&self, company: &Company) -> KeyAnalysis {
        derive_key_analysis(company.fundamental.as_ref(), company.close())
    }

    /// Attach a freshly derived record to every company, in place.
    pub fn analyse(&self, companies: &mut [Company]) {
        for company in companies.iter_mut() {
            company.key_analysis = self.derive(company);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use saham_traits::Stock;

    fn fundamental() -> Fundamental {
        Fundamental::new("TEST")
    }

    fn all_metrics(ka: &KeyAnalysis) -> Vec<f64> {
        KeyAnalysis::COLUMNS
            .iter()
            .map(|name| ka.get(name).unwrap())
            .collect()
    }

    #[test]
    fn test_guarded_ratio() {
        assert_relative_eq!(guarded_ratio(1.0, 4.0), 0.25);
        assert_eq!(guarded_ratio(1.0, 0.0), 0.0);
        assert_eq!(guarded_ratio(1.0, -2.0), 0.0);
        assert_eq!(guarded_ratio(1.0, f64::NAN), 0.0);
    }

    #[test]
    fn test_round2() {
        assert_relative_eq!(round2(2.666_666), 2.67);
        assert_relative_eq!(round2(-1.234_9), -1.23);
        assert_relative_eq!(round2(0.125), 0.12);
        assert_relative_eq!(round2(-0.125), -0.12);
        assert_eq!(round2(-0.001).to_bits(), 0.0_f64.to_bits());
        assert_eq!(round2(f64::INFINITY), 0.0);
        assert_eq!(round2(f64::NAN), 0.0);
    }

    #[test]
    fn test_round2_matches_python_round() {
        let inputs = [0.125, 0.625, 0.285, 1.005, 2.675, 0.145, 1.115, 0.015, 8.325, 0.575];
        let expected = [0.12, 0.62, 0.28, 1.0, 2.67, 0.14, 1.11, 0.01, 8.32, 0.57];
        for (input, want) in inputs.into_iter().zip(expected) {
            assert_eq!(round2(input), want, "round2({input})");
        }
    }

    #[test]
    fn test_cce_tie_rounds_to_even() {
        let mut f = fundamental();
        f.cash_flow_statement.cash_from_operations_ttm = 125.0;
        f.income_statement.revenue_ttm = 1_000.0;

        let ka = derive_key_analysis(Some(&f), 1.0);
        assert_eq!(ka.cce, 0.12);
    }

    #[test]
    fn test_normal_price_and_discount() {
        let mut f = fundamental();
        f.per_share.current_book_value_per_share = 10.0;
        f.management_effectiveness.return_on_equity_ttm = 0.15;

        let ka = derive_key_analysis(Some(&f), 12.0);
        assert_relative_eq!(ka.normal_price, 15.0);
        assert_relative_eq!(ka.price_to_equity_discount, 79.0);
    }

    #[test]
    fn test_discount_zero_when_normal_price_not_positive() {
        let mut f = fundamental();
        f.per_share.current_book_value_per_share = 10.0;
        f.management_effectiveness.return_on_equity_ttm = -0.1;

        let ka = derive_key_analysis(Some(&f), 500.0);
        assert_relative_eq!(ka.normal_price, -10.0);
        assert_eq!(ka.price_to_equity_discount, 0.0);
    }

    #[test]
    fn test_eps_growth_guard() {
        let mut f = fundamental();
        f.per_share.current_eps_annualised = 120.0;
        f.per_share.current_eps_ttm = 0.0;
        assert_eq!(derive_key_analysis(Some(&f), 1.0).eps_growth, 0.0);

        f.per_share.current_eps_ttm = 100.0;
        assert_relative_eq!(derive_key_analysis(Some(&f), 1.0).eps_growth, 0.2);
    }

    #[test]
    fn test_net_debt_to_equity_guard() {
        let mut f = fundamental();
        f.balance_sheet.net_debt_quarter = 500.0;
        f.balance_sheet.total_equity = 0.0;
        assert_eq!(derive_key_analysis(Some(&f), 1.0).net_debt_to_equity_ratio, 0.0);

        f.balance_sheet.total_equity = 2_000.0;
        assert_relative_eq!(
            derive_key_analysis(Some(&f), 1.0).net_debt_to_equity_ratio,
            0.25
        );
    }

    #[test]
    fn test_composite_rank_double_counts_pe_rank() {
        let mut f = fundamental();
        f.market_rank.rank_current_pe_ratio_ttm = 1.0;
        f.market_rank.rank_earnings_yield = 2.0;
        f.market_rank.rank_p_s = 3.0;
        f.market_rank.rank_p_b = 4.0;
        f.market_rank.rank_near_52_weeks_high = 5.0;
        f.market_rank.rank_market_cap = 99.0;

        let ka = derive_key_analysis(Some(&f), 1.0);
        assert_relative_eq!(ka.composite_rank, 2.67);
    }

    #[test]
    fn test_remaining_ratios() {
        let mut f = fundamental();
        f.current_valuation.ihsg_pe_ratio_ttm_median = 16.0;
        f.market_rank.rank_current_pe_ratio_ttm = 4.0;
        f.balance_sheet.total_debt_quarter = 300.0;
        f.balance_sheet.total_assets_quarter = 1_200.0;
        f.solvency.current_ratio_quarter = 1.5;
        f.solvency.quick_ratio_quarter = 1.2;
        f.cash_flow_statement.cash_from_operations_ttm = 250.0;
        f.income_statement.revenue_ttm = 1_000.0;
        f.profitability.operating_profit_margin_quarter = 20.0;
        f.profitability.gross_profit_margin_quarter = 40.0;
        f.dividend.dividend = 30.0;
        f.dividend.dividend_ttm = 50.0;
        f.income_statement.net_income_ttm = 200.0;
        f.price_performance.one_year_price_returns = 12.5;

        let ka = derive_key_analysis(Some(&f), 1.0);
        assert_relative_eq!(ka.relative_pe_ratio_ttm, 0.25);
        assert_relative_eq!(ka.debt_to_total_assets_ratio, 0.25);
        assert_relative_eq!(ka.liquidity_differential, 1.25);
        assert_relative_eq!(ka.cce, 0.25);
        assert_relative_eq!(ka.operating_efficiency, 0.5);
        assert_relative_eq!(ka.dividend_payout_efficiency, 0.2);
        assert_relative_eq!(ka.yearly_price_change, 0.01);
    }

    #[test]
    fn test_zero_denominators_give_zero() {
        let mut f = fundamental();
        f.market_rank.rank_current_pe_ratio_ttm = 3.0;
        f.per_share.current_eps_annualised = 5.0;
        f.balance_sheet.total_debt_quarter = 7.0;
        f.solvency.current_ratio_quarter = 2.0;
        f.cash_flow_statement.cash_from_operations_ttm = 11.0;
        f.profitability.operating_profit_margin_quarter = 13.0;
        f.dividend.dividend = 17.0;
        f.price_performance.one_year_price_returns = 19.0;
        f.balance_sheet.net_debt_quarter = 23.0;

        for denominator in [0.0, -1.0] {
            f.current_valuation.ihsg_pe_ratio_ttm_median = denominator;
            f.per_share.current_eps_ttm = denominator;
            f.balance_sheet.total_assets_quarter = denominator;
            f.solvency.quick_ratio_quarter = denominator;
            f.income_statement.revenue_ttm = denominator;
            f.profitability.gross_profit_margin_quarter = denominator;
            f.income_statement.net_income_ttm = denominator;
            f.balance_sheet.total_equity = denominator;

            let ka = derive_key_analysis(Some(&f), 10.0);
            assert_eq!(ka.price_to_equity_discount, 0.0);
            assert_eq!(ka.relative_pe_ratio_ttm, 0.0);
            assert_eq!(ka.eps_growth, 0.0);
            assert_eq!(ka.debt_to_total_assets_ratio, 0.0);
            assert_eq!(ka.liquidity_differential, 0.0);
            assert_eq!(ka.cce, 0.0);
            assert_eq!(ka.operating_efficiency, 0.0);
            assert_eq!(ka.dividend_payout_efficiency, 0.0);
            assert_eq!(ka.yearly_price_change, 0.0);
            assert_eq!(ka.net_debt_to_equity_ratio, 0.0);
            assert!(all_metrics(&ka).iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_absent_fundamentals_give_zero_record() {
        let ka = derive_key_analysis(None, 4_500.0);
        assert!(ka.is_zero());
        assert!(all_metrics(&ka).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_every_output_is_rounded() {
        let mut f = fundamental();
        f.per_share.current_book_value_per_share = 3.333;
        f.management_effectiveness.return_on_equity_ttm = 0.777;
        f.balance_sheet.total_debt_quarter = 1.0;
        f.balance_sheet.total_assets_quarter = 3.0;
        f.market_rank.rank_p_b = 1.0;

        let ka = derive_key_analysis(Some(&f), 7.0);
        for value in all_metrics(&ka) {
            assert_eq!(value.to_bits(), round2(value).to_bits());
        }
        assert_relative_eq!(ka.debt_to_total_assets_ratio, 0.33);
        assert_relative_eq!(ka.composite_rank, 0.17);
    }

    #[test]
    fn test_deterministic() {
        let mut f = fundamental();
        f.per_share.current_book_value_per_share = 1_234.5;
        f.management_effectiveness.return_on_equity_ttm = 0.21;
        f.income_statement.revenue_ttm = 9_876.0;
        f.cash_flow_statement.cash_from_operations_ttm = 1_111.0;

        let a = derive_key_analysis(Some(&f), 8_000.0);
        let b = derive_key_analysis(Some(&f), 8_000.0);
        for (x, y) in all_metrics(&a).iter().zip(all_metrics(&b)) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_engine_analyse_in_place() {
        let mut with = Company::new(Stock::new("BBCA"));
        let mut f = Fundamental::new("BBCA");
        f.balance_sheet.net_debt_quarter = 10.0;
        f.balance_sheet.total_equity = 40.0;
        with.fundamental = Some(f);

        let mut without = Company::new(Stock::new("GOTO"));
        without.key_analysis.cce = 9.0;

        let mut companies = vec![with, without];
        KeyAnalysisEngine::new().analyse(&mut companies);

        assert_relative_eq!(companies[0].key_analysis.net_debt_to_equity_ratio, 0.25);
        assert!(companies[1].key_analysis.is_zero());
    }
}
