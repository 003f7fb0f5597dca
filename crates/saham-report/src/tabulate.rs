//! Tabulation of companies into the five report sheets.
//!
//! Every sheet has a literal header and one row per company (one per post
//! for sentiments), in input order. Missing nested data never fails: a
//! company without fundamentals contributes a zero-valued row.

use saham_analysis::registry::available_metrics;
use saham_traits::{Cell, Company, Dividend, Fundamental, Sheet, SheetKind, StockPrice};

/// Timestamp format of the sentiment sheet.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header of the stocks sheet.
pub const STOCKS_HEADER: [&str; 19] = [
    "Ticker",
    "Name",
    "IPO Date",
    "Market Cap",
    "Note",
    "Price",
    "Volume",
    "Change",
    "Percentage Change",
    "Average",
    "Close Price",
    "High Price",
    "Open Price",
    "Low Price",
    "ARA Price",
    "ARB Price",
    "Frequency",
    "Frequency Sell",
    "Frequency Buy",
];

/// Header of the stock-prices sheet.
pub const STOCK_PRICES_HEADER: [&str; 15] = [
    "Ticker",
    "Price",
    "Volume",
    "Change",
    "Percentage Change",
    "Average",
    "Close Price",
    "High Price",
    "Open Price",
    "Low Price",
    "ARA Price",
    "ARB Price",
    "Frequency",
    "Frequency Sell",
    "Frequency Buy",
];

/// Header of the sentiments sheet.
pub const SENTIMENTS_HEADER: [&str; 5] = ["Ticker", "Content", "Rate", "Category", "Posted At"];

/// Header of the key-statistics sheet: the ticker, then every fundamentals
/// label in group order.
#[must_use]
pub fn key_statistics_header() -> Vec<&'static str> {
    std::iter::once("Ticker")
        .chain(Fundamental::labels())
        .collect()
}

/// Header of the analysis sheet: ticker, normal price, close, then the
/// remaining metrics in record order.
#[must_use]
pub fn analysis_header() -> Vec<&'static str> {
    let labels: Vec<_> = available_metrics().iter().map(|m| m.label).collect();
    let mut header = Vec::with_capacity(labels.len() + 2);
    header.push("Ticker");
    header.push(labels[0]);
    header.push("Close Price");
    header.extend_from_slice(&labels[1..]);
    header
}

fn price_cells(price: &StockPrice) -> Vec<Cell> {
    vec![
        price.price.into(),
        price.volume.into(),
        price.change.into(),
        price.percentage_change.into(),
        price.average.into(),
        price.close.into(),
        price.high.into(),
        price.open.into(),
        price.low.into(),
        price.ara.into(),
        price.arb.into(),
        price.frequency.into(),
        price.fsell.into(),
        price.fbuy.into(),
    ]
}

fn numbers(values: Vec<f64>) -> impl Iterator<Item = Cell> {
    values.into_iter().map(Cell::Number)
}

fn dividend_cells(dividend: &Dividend) -> Vec<Cell> {
    vec![
        dividend.dividend.into(),
        dividend.dividend_ttm.into(),
        dividend.payout_ratio.into(),
        dividend.dividend_yield.into(),
        dividend.latest_dividend_ex_date.as_str().into(),
    ]
}

fn fundamental_row(ticker: &str, f: &Fundamental) -> Vec<Cell> {
    let mut row = vec![Cell::from(ticker)];
    row.extend(numbers(f.current_valuation.values()));
    row.extend(numbers(f.per_share.values()));
    row.extend(numbers(f.solvency.values()));
    row.extend(numbers(f.management_effectiveness.values()));
    row.extend(numbers(f.profitability.values()));
    row.extend(numbers(f.growth.values()));
    row.extend(dividend_cells(&f.dividend));
    row.extend(numbers(f.market_rank.values()));
    row.extend(numbers(f.income_statement.values()));
    row.extend(numbers(f.balance_sheet.values()));
    row.extend(numbers(f.cash_flow_statement.values()));
    row.extend(numbers(f.price_performance.values()));
    row.extend(numbers(f.stats.values()));
    row
}

/// Listing identity plus latest price, one row per company.
#[must_use]
pub fn stocks_sheet(companies: &[Company]) -> Sheet {
    let mut sheet = Sheet::new(SheetKind::Stocks, STOCKS_HEADER);
    for company in companies {
        let stock = &company.stock;
        let mut row = vec![
            Cell::from(stock.ticker.as_str()),
            Cell::from(stock.name.as_str()),
            Cell::from(stock.ipo_date.as_str()),
            Cell::Number(stock.market_cap),
            Cell::from(stock.note.as_str()),
        ];
        row.extend(price_cells(&company.stock_price));
        sheet.rows.push(row);
    }
    sheet
}

/// Raw fundamentals flattened in group order, one row per company.
#[must_use]
pub fn key_statistics_sheet(companies: &[Company]) -> Sheet {
    let mut sheet = Sheet::new(SheetKind::KeyStatistics, key_statistics_header());
    for company in companies {
        let row = match &company.fundamental {
            Some(f) => fundamental_row(company.ticker(), f),
            None => fundamental_row(company.ticker(), &Fundamental::new(company.ticker())),
        };
        sheet.rows.push(row);
    }
    sheet
}

/// Derived metrics with ticker and close, one row per company.
#[must_use]
pub fn analysis_sheet(companies: &[Company]) -> Sheet {
    let mut sheet = Sheet::new(SheetKind::Analysis, analysis_header());
    for company in companies {
        let ka = &company.key_analysis;
        sheet.rows.push(vec![
            Cell::from(company.ticker()),
            ka.normal_price.into(),
            company.close().into(),
            ka.price_to_equity_discount.into(),
            ka.relative_pe_ratio_ttm.into(),
            ka.eps_growth.into(),
            ka.debt_to_total_assets_ratio.into(),
            ka.liquidity_differential.into(),
            ka.cce.into(),
            ka.operating_efficiency.into(),
            ka.dividend_payout_efficiency.into(),
            ka.yearly_price_change.into(),
            ka.composite_rank.into(),
            ka.net_debt_to_equity_ratio.into(),
        ]);
    }
    sheet
}

/// One row per (company, post) pair.
#[must_use]
pub fn sentiment_sheet(companies: &[Company]) -> Sheet {
    let mut sheet = Sheet::new(SheetKind::Sentiments, SENTIMENTS_HEADER);
    for company in companies {
        for post in &company.sentiments {
            sheet.rows.push(vec![
                Cell::from(company.ticker()),
                Cell::from(post.content.as_str()),
                Cell::Number(post.rate),
                Cell::from(post.category.as_str()),
                Cell::Text(post.posted_at.format(TIMESTAMP_FORMAT).to_string()),
            ]);
        }
    }
    sheet
}

/// Latest price snapshot, one row per company.
#[must_use]
pub fn stock_price_sheet(companies: &[Company]) -> Sheet {
    let mut sheet = Sheet::new(SheetKind::StockPrices, STOCK_PRICES_HEADER);
    for company in companies {
        let mut row = vec![Cell::from(company.ticker())];
        row.extend(price_cells(&company.stock_price));
        sheet.rows.push(row);
    }
    sheet
}

/// Tabulate one sheet kind.
#[must_use]
pub fn tabulate(kind: SheetKind, companies: &[Company]) -> Sheet {
    match kind {
        SheetKind::Stocks => stocks_sheet(companies),
        SheetKind::KeyStatistics => key_statistics_sheet(companies),
        SheetKind::Analysis => analysis_sheet(companies),
        SheetKind::Sentiments => sentiment_sheet(companies),
        SheetKind::StockPrices => stock_price_sheet(companies),
    }
}
