//! Fundamentals record and its thematic sub-records.
//!
//! One [`Fundamental`] exists per company per ingestion pass. Every numeric
//! field defaults to `0.0`, so a provider that cannot find a figure simply
//! leaves it unset. The labels attached to each field are the key-statistics
//! column headers and also the names the brokerage API reports them under.

use serde::{Deserialize, Serialize};

use crate::types::Symbol;

labelled_record! {
    /// Price multiples and PEG variants.
    pub struct CurrentValuation {
        /// Price to annualised earnings.
        current_pe_ratio_annual => "Current PE Ratio (Annualised)",
        /// Price to trailing twelve months earnings.
        current_pe_ratio_ttm => "Current PE Ratio (TTM)",
        /// Price to forward earnings.
        forward_pe_ratio => "Forward PE Ratio",
        /// Median TTM PE ratio of the composite index.
        ihsg_pe_ratio_ttm_median => "IHSG PE Ratio TTM (Median)",
        /// TTM earnings yield.
        earnings_yield_ttm => "Earnings Yield (TTM)",
        /// Price to TTM sales.
        current_price_to_sales_ttm => "Current Price to Sales(TTM)",
        /// Price to book value.
        current_price_to_book_value => "Current Price to Book Value",
        /// Price to TTM cash flow.
        current_price_to_cashflow_ttm => "Current Price To Cashflow (TTM)",
        /// Price to TTM free cash flow.
        current_price_to_free_cashflow_ttm => "Current Price To Free Cashflow (TTM)",
        /// Enterprise value to TTM EBIT.
        ev_to_ebit_ttm => "EV to EBIT (TTM)",
        /// Enterprise value to TTM EBITDA.
        ev_to_ebitda_ttm => "EV to EBITDA (TTM)",
        /// PE to growth.
        peg_ratio => "PEG Ratio",
        /// PE to three-year growth.
        peg_ratio_3yr => "PEG Ratio (3yr)",
        /// Forward PE to growth.
        peg_forward => "PEG (Forward)",
    }
}

labelled_record! {
    /// Per-share figures.
    pub struct PerShare {
        /// TTM earnings per share.
        current_eps_ttm => "Current EPS (TTM)",
        /// Annualised earnings per share.
        current_eps_annualised => "Current EPS (Annualised)",
        /// TTM revenue per share.
        revenue_per_share_ttm => "Revenue Per Share (TTM)",
        /// Cash per share, latest quarter.
        cash_per_share_quarter => "Cash Per Share (Quarter)",
        /// Book value per share.
        current_book_value_per_share => "Current Book Value Per Share",
        /// TTM free cash flow per share.
        free_cashflow_per_share_ttm => "Free Cashflow Per Share (TTM)",
    }
}

labelled_record! {
    /// Liquidity and leverage ratios.
    pub struct Solvency {
        /// Current assets over current liabilities.
        current_ratio_quarter => "Current Ratio (Quarter)",
        /// Liquid assets over current liabilities.
        quick_ratio_quarter => "Quick Ratio (Quarter)",
        /// Total debt over equity.
        debt_to_equity_ratio_quarter => "Debt to Equity Ratio (Quarter)",
        /// Long-term debt over equity.
        lt_debt_equity_quarter => "LT Debt/Equity (Quarter)",
        /// Total liabilities over equity.
        total_liabilities_equity_quarter => "Total Liabilities/Equity (Quarter)",
        /// Total debt over total assets.
        total_debt_total_assets_quarter => "Total Debt/Total Assets (Quarter)",
        /// Assets over equity.
        financial_leverage_quarter => "Financial Leverage (Quarter)",
        /// Interest coverage.
        interest_rate_coverage_ttm => "Interest Coverage (TTM)",
        /// Free cash flow, latest quarter.
        free_cash_flow_quarter => "Free cash flow (Quarter)",
        /// Modified Altman Z-score.
        altman_z_score_modified => "Altman Z-Score (Modified)",
    }
}

labelled_record! {
    /// Returns on capital and working-capital cycle.
    pub struct ManagementEffectiveness {
        /// TTM return on assets.
        return_on_assets_ttm => "Return on Assets (TTM)",
        /// TTM return on equity.
        return_on_equity_ttm => "Return on Equity (TTM)",
        /// TTM return on capital employed.
        return_on_capital_employed_ttm => "Return on Capital Employed (TTM)",
        /// TTM return on invested capital.
        return_on_invested_capital_ttm => "Return On Invested Capital (TTM)",
        /// Days sales outstanding.
        days_sales_outstanding_quarter => "Days Sales Outstanding (Quarter)",
        /// Days inventory outstanding.
        days_inventory_quarter => "Days Inventory (Quarter)",
        /// Days payables outstanding.
        days_payables_outstanding_quarter => "Days Payables Outstanding (Quarter)",
        /// Cash conversion cycle in days.
        cash_conversion_cycle_quarter => "Cash Conversion Cycle (Quarter)",
        /// Receivables turnover.
        receivables_turnover_quarter => "Receivables Turnover (Quarter)",
        /// TTM asset turnover.
        asset_turnover_ttm => "Asset Turnover (TTM)",
        /// TTM inventory turnover.
        inventory_turnover_ttm => "Inventory Turnover (TTM)",
    }
}

labelled_record! {
    /// Margins for the latest quarter.
    pub struct Profitability {
        /// Gross margin.
        gross_profit_margin_quarter => "Gross Profit Margin (Quarter)",
        /// Operating margin.
        operating_profit_margin_quarter => "Operating Profit Margin (Quarter)",
        /// Net margin.
        net_profit_margin_quarter => "Net Profit Margin (Quarter)",
    }
}

labelled_record! {
    /// Year-over-year growth of the latest quarter.
    pub struct Growth {
        /// Revenue growth.
        revenue_quarter_yoy_growth => "Revenue (Quarter YoY Growth)",
        /// Gross profit growth.
        gross_profit_quarter_yoy_growth => "Gross Profit (Quarter YoY Growth)",
        /// Net income growth.
        net_income_quarter_yoy_growth => "Net Income (Quarter YoY Growth)",
    }
}

labelled_record! {
    /// Scores and percentile ranks against the rest of the market.
    pub struct MarketRank {
        /// Piotroski F-score.
        piotroski_f_score => "Piotroski F-Score",
        /// EPS rating.
        eps_rating => "EPS Rating",
        /// Relative strength rating.
        relative_strength_rating => "Relative Strength Rating",
        /// Rank by market capitalisation.
        rank_market_cap => "Rank (Market Cap)",
        /// Rank by TTM PE ratio.
        rank_current_pe_ratio_ttm => "Rank (Current PE Ratio TTM)",
        /// Rank by earnings yield.
        rank_earnings_yield => "Rank (Earnings Yield)",
        /// Rank by price to sales.
        rank_p_s => "Rank (P/S)",
        /// Rank by price to book.
        rank_p_b => "Rank (P/B)",
        /// Rank by proximity to the 52-week high.
        rank_near_52_weeks_high => "Rank (Near 52 Weeks High)",
    }
}

labelled_record! {
    /// Trailing income statement figures.
    pub struct IncomeStatement {
        /// TTM revenue.
        revenue_ttm => "Revenue (TTM)",
        /// TTM gross profit.
        gross_profit_ttm => "Gross Profit (TTM)",
        /// TTM EBITDA.
        ebitda_ttm => "EBITDA (TTM)",
        /// TTM net income.
        net_income_ttm => "Net Income (TTM)",
    }
}

labelled_record! {
    /// Latest-quarter balance sheet figures.
    pub struct BalanceSheet {
        /// Cash and equivalents.
        cash_quarter => "Cash (Quarter)",
        /// Total assets.
        total_assets_quarter => "Total Assets (Quarter)",
        /// Total liabilities.
        total_liabilities_quarter => "Total Liabilities (Quarter)",
        /// Working capital.
        working_capital_quarter => "Working Capital (Quarter)",
        /// Total equity.
        total_equity => "Total Equity",
        /// Long-term debt.
        long_term_debt_quarter => "Long-term Debt (Quarter)",
        /// Short-term debt.
        short_term_debt_quarter => "Short-term Debt (Quarter)",
        /// Total debt.
        total_debt_quarter => "Total Debt (Quarter)",
        /// Debt net of cash.
        net_debt_quarter => "Net Debt (Quarter)",
    }
}

labelled_record! {
    /// Trailing cash-flow statement figures.
    pub struct CashFlowStatement {
        /// Operating cash flow.
        cash_from_operations_ttm => "Cash From Operations (TTM)",
        /// Investing cash flow.
        cash_from_investing_ttm => "Cash From Investing (TTM)",
        /// Financing cash flow.
        cash_from_financing_ttm => "Cash From Financing (TTM)",
        /// Capital expenditure.
        capital_expenditure_ttm => "Capital expenditure (TTM)",
        /// Free cash flow.
        free_cash_flow_ttm => "Free cash flow (TTM)",
    }
}

labelled_record! {
    /// Trailing price returns and 52-week range.
    pub struct PricePerformance {
        /// One-week return.
        one_week_price_returns => "1 Week Price Returns",
        /// Three-month return.
        three_month_price_returns => "3 Month Price Returns",
        /// One-month return.
        one_month_price_returns => "1 Month Price Returns",
        /// Six-month return.
        six_month_price_returns => "6 Month Price Returns",
        /// One-year return.
        one_year_price_returns => "1 Year Price Returns",
        /// Three-year return.
        three_year_price_returns => "3 Year Price Returns",
        /// Five-year return.
        five_year_price_returns => "5 Year Price Returns",
        /// Ten-year return.
        ten_year_price_returns => "10 Year Price Returns",
        /// Year-to-date return.
        year_to_date_price_returns => "Year to Date Price Returns",
        /// 52-week high.
        fifty_two_week_high => "52 Week High",
        /// 52-week low.
        fifty_two_week_low => "52 Week Low",
    }
}

labelled_record! {
    /// Size statistics.
    pub struct Stats {
        /// Market capitalisation.
        market_cap => "Market Cap",
        /// Enterprise value.
        enterprise_value => "Enterprise Value",
        /// Shares outstanding.
        current_share_outstanding => "Current Share Outstanding",
    }
}

/// Dividend figures. Unlike the other groups it carries one text field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    /// Latest dividend per share.
    #[serde(default)]
    pub dividend: f64,
    /// TTM dividend per share.
    #[serde(default)]
    pub dividend_ttm: f64,
    /// Payout ratio.
    #[serde(default)]
    pub payout_ratio: f64,
    /// Dividend yield.
    #[serde(default)]
    pub dividend_yield: f64,
    /// Ex-date of the latest dividend, as reported.
    #[serde(default)]
    pub latest_dividend_ex_date: String,
}

impl Dividend {
    /// Key-statistics labels, in column order.
    pub const LABELS: &'static [&'static str] = &[
        "Dividend",
        "Dividend (TTM)",
        "Payout Ratio",
        "Dividend Yield",
        Self::EX_DATE_LABEL,
    ];

    /// Field names, in column order.
    pub const COLUMNS: &'static [&'static str] = &[
        "dividend",
        "dividend_ttm",
        "payout_ratio",
        "dividend_yield",
        "latest_dividend_ex_date",
    ];

    /// Label of the text-valued ex-date field.
    pub const EX_DATE_LABEL: &'static str = "Latest Dividend Ex-Date";

    /// Assign the numeric field carrying `label`.
    pub fn set(&mut self, label: &str, value: f64) -> bool {
        let slot = match label {
            "Dividend" => &mut self.dividend,
            "Dividend (TTM)" => &mut self.dividend_ttm,
            "Payout Ratio" => &mut self.payout_ratio,
            "Dividend Yield" => &mut self.dividend_yield,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Raw fundamentals of one company for one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamental {
    /// Ticker of the owning company.
    pub ticker: Symbol,
    /// Size statistics.
    #[serde(default)]
    pub stats: Stats,
    /// Valuation multiples.
    #[serde(default)]
    pub current_valuation: CurrentValuation,
    /// Per-share figures.
    #[serde(default)]
    pub per_share: PerShare,
    /// Liquidity and leverage.
    #[serde(default)]
    pub solvency: Solvency,
    /// Returns and working-capital cycle.
    #[serde(default)]
    pub management_effectiveness: ManagementEffectiveness,
    /// Margins.
    #[serde(default)]
    pub profitability: Profitability,
    /// Growth.
    #[serde(default)]
    pub growth: Growth,
    /// Dividends.
    #[serde(default)]
    pub dividend: Dividend,
    /// Market ranks.
    #[serde(default)]
    pub market_rank: MarketRank,
    /// Income statement.
    #[serde(default)]
    pub income_statement: IncomeStatement,
    /// Balance sheet.
    #[serde(default)]
    pub balance_sheet: BalanceSheet,
    /// Cash-flow statement.
    #[serde(default)]
    pub cash_flow_statement: CashFlowStatement,
    /// Price performance.
    #[serde(default)]
    pub price_performance: PricePerformance,
}

impl Fundamental {
    /// Create an all-zero record for `ticker`.
    #[must_use]
    pub fn new(ticker: impl Into<Symbol>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    /// Assign the numeric field carrying `label`, whichever group owns it.
    ///
    /// Returns `false` if no group recognises the label.
    pub fn set_by_label(&mut self, label: &str, value: f64) -> bool {
        self.current_valuation.set(label, value)
            || self.per_share.set(label, value)
            || self.solvency.set(label, value)
            || self.management_effectiveness.set(label, value)
            || self.profitability.set(label, value)
            || self.growth.set(label, value)
            || self.dividend.set(label, value)
            || self.market_rank.set(label, value)
            || self.income_statement.set(label, value)
            || self.balance_sheet.set(label, value)
            || self.cash_flow_statement.set(label, value)
            || self.price_performance.set(label, value)
            || self.stats.set(label, value)
    }

    /// Every key-statistics label in column order, ticker excluded.
    #[must_use]
    pub fn labels() -> Vec<&'static str> {
        [
            CurrentValuation::LABELS,
            PerShare::LABELS,
            Solvency::LABELS,
            ManagementEffectiveness::LABELS,
            Profitability::LABELS,
            Growth::LABELS,
            Dividend::LABELS,
            MarketRank::LABELS,
            IncomeStatement::LABELS,
            BalanceSheet::LABELS,
            CashFlowStatement::LABELS,
            PricePerformance::LABELS,
            Stats::LABELS,
        ]
        .concat()
    }
}
