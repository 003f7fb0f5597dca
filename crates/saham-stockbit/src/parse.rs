//! Parsing of Stockbit payloads into saham records.
//!
//! Key statistics are mapped by label, never by position: each `fitem.name`
//! is routed to the fundamentals field carrying the same label. Unknown
//! labels are ignored and missing ones stay at zero.

use chrono::{DateTime, NaiveDateTime, Utc};
use saham_traits::{Dividend, Fundamental, Sentiment, StockPrice};
use tracing::debug;

use crate::types::{KeyStatsData, Orderbook, StreamPost};

/// Parse a formatted key-statistics value.
///
/// Accepts thousands separators, a trailing `%`, `K`/`M`/`B`/`T` suffixes
/// and parenthesised negatives. Empty, `-` and unparseable values are `0.0`.
#[must_use]
pub fn parse_value(raw: &str) -> f64 {
    let mut text = raw.trim();
    if text.is_empty() || text == "-" {
        return 0.0;
    }

    let mut sign = 1.0;
    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        sign = -1.0;
        text = inner.trim();
    }
    let text = text.trim_end_matches('%').trim();

    let (number, scale) = match text.chars().last() {
        Some('K' | 'k') => (&text[..text.len() - 1], 1e3),
        Some('M') => (&text[..text.len() - 1], 1e6),
        Some('B') => (&text[..text.len() - 1], 1e9),
        Some('T') => (&text[..text.len() - 1], 1e12),
        _ => (text, 1.0),
    };

    let cleaned: String = number.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => sign * v * scale,
        _ => {
            debug!(value = raw, "unparseable key statistic, using 0");
            0.0
        }
    }
}

/// Parse a currency amount with an optional `M` or `B` suffix.
///
/// Returns `None` when the text is not a number.
#[must_use]
pub fn parse_currency_to_float(currency: &str) -> Option<f64> {
    let text: String = currency
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let (number, scale) = if let Some(n) = text.strip_suffix('M') {
        (n, 1e6)
    } else if let Some(n) = text.strip_suffix('B') {
        (n, 1e9)
    } else {
        (text.as_str(), 1.0)
    };
    number.parse::<f64>().ok().map(|v| v * scale)
}

/// Build the fundamentals record of `ticker` from a key-statistics payload.
#[must_use]
pub fn parse_fundamental(ticker: &str, data: &KeyStatsData) -> Fundamental {
    let mut fundamental = Fundamental::new(ticker);

    let stats = &data.stats;
    fundamental.stats.market_cap = parse_currency_to_float(&stats.market_cap).unwrap_or_default();
    fundamental.stats.enterprise_value =
        parse_currency_to_float(&stats.enterprise_value).unwrap_or_default();
    fundamental.stats.current_share_outstanding =
        parse_currency_to_float(&stats.current_share_outstanding).unwrap_or_default();

    let mut unknown = 0_usize;
    for item in data.items() {
        let label = item.name.trim();
        if label == Dividend::EX_DATE_LABEL {
            let value = item.value.trim();
            fundamental.dividend.latest_dividend_ex_date =
                if value == "-" { String::new() } else { value.to_string() };
        } else if !fundamental.set_by_label(label, parse_value(&item.value)) {
            unknown += 1;
        }
    }
    if unknown > 0 {
        debug!(ticker, unknown, "ignored unknown key statistics labels");
    }
    fundamental
}

/// Convert an orderbook snapshot into a price record.
#[must_use]
pub fn parse_price(book: &Orderbook) -> StockPrice {
    StockPrice {
        price: book.lastprice,
        volume: book.volume as i64,
        change: book.change,
        percentage_change: book.percentage_change,
        average: book.average,
        close: book.close,
        high: book.high,
        low: book.low,
        open: book.open,
        ara: book.ara.value,
        arb: book.arb.value,
        frequency: book.frequency as i64,
        fsell: book.fsell,
        fbuy: book.fbuy,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|t| t.and_utc())
        })
}

/// Convert stream posts into sentiments, dropping posts without a valid
/// timestamp. The rate is clamped to `[-1, 1]`.
#[must_use]
pub fn parse_sentiments(posts: &[StreamPost]) -> Vec<Sentiment> {
    posts
        .iter()
        .filter_map(|post| {
            let posted_at = parse_timestamp(post.created_at.trim())?;
            Some(Sentiment {
                content: post.content.trim().to_string(),
                rate: post.sentiment_rate.clamp(-1.0, 1.0),
                category: post.category.clone(),
                posted_at,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FinItem, FinItemGroup, FinNameResult, KeyStatsSummary, PriceLimit};
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn group(items: &[(&str, &str)]) -> FinItemGroup {
        FinItemGroup {
            keystats_name: String::new(),
            fin_name_results: items
                .iter()
                .map(|(name, value)| FinNameResult {
                    fitem: FinItem {
                        name: (*name).to_string(),
                        value: (*value).to_string(),
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn test_parse_value() {
        assert_relative_eq!(parse_value("1,234.56"), 1234.56);
        assert_relative_eq!(parse_value("12.5%"), 12.5);
        assert_relative_eq!(parse_value("(3.2)"), -3.2);
        assert_relative_eq!(parse_value("-4.75"), -4.75);
        assert_relative_eq!(parse_value("2.5 B"), 2.5e9);
        assert_relative_eq!(parse_value("(1,200 M)"), -1.2e9);
        assert_relative_eq!(parse_value("3K"), 3000.0);
        assert_relative_eq!(parse_value("1.1T"), 1.1e12);
        assert_eq!(parse_value("-"), 0.0);
        assert_eq!(parse_value(""), 0.0);
        assert_eq!(parse_value("n/a"), 0.0);
    }

    #[test]
    fn test_parse_currency_to_float() {
        assert_eq!(parse_currency_to_float("1,234.56"), Some(1234.56));
        assert_eq!(parse_currency_to_float("2.5M"), Some(2_500_000.0));
        assert_eq!(parse_currency_to_float("3B"), Some(3_000_000_000.0));
        assert_eq!(parse_currency_to_float("1,000 B"), Some(1.0e12));
        assert_eq!(parse_currency_to_float(""), None);
        assert_eq!(parse_currency_to_float("-"), None);
    }

    #[test]
    fn test_parse_fundamental_by_label() {
        let data = KeyStatsData {
            stats: KeyStatsSummary {
                market_cap: "1,100 B".to_string(),
                enterprise_value: "1,250 B".to_string(),
                current_share_outstanding: "123,275 M".to_string(),
            },
            closure_fin_items_results: vec![
                group(&[
                    ("Current EPS (TTM)", "450.25"),
                    ("Current Book Value Per Share", "2,150"),
                ]),
                group(&[
                    ("Return on Equity (TTM)", "21.5%"),
                    ("Made Up Label", "99"),
                ]),
                group(&[
                    ("Dividend (TTM)", "270"),
                    ("Latest Dividend Ex-Date", "2024-03-28"),
                ]),
                group(&[("Net Debt (Quarter)", "(12,500 B)"), ("Total Equity", "-")]),
            ],
        };

        let f = parse_fundamental("BBCA", &data);
        assert_eq!(f.ticker, "BBCA");
        assert_relative_eq!(f.stats.market_cap, 1.1e12);
        assert_relative_eq!(f.stats.enterprise_value, 1.25e12);
        assert_relative_eq!(f.stats.current_share_outstanding, 1.23275e11);
        assert_relative_eq!(f.per_share.current_eps_ttm, 450.25);
        assert_relative_eq!(f.per_share.current_book_value_per_share, 2150.0);
        assert_relative_eq!(f.management_effectiveness.return_on_equity_ttm, 21.5);
        assert_relative_eq!(f.dividend.dividend_ttm, 270.0);
        assert_eq!(f.dividend.latest_dividend_ex_date, "2024-03-28");
        assert_relative_eq!(f.balance_sheet.net_debt_quarter, -1.25e13);
        assert_eq!(f.balance_sheet.total_equity, 0.0);
        assert_eq!(f.solvency.current_ratio_quarter, 0.0);
    }

    #[test]
    fn test_parse_empty_payload() {
        let f = parse_fundamental("GOTO", &KeyStatsData::default());
        assert_eq!(f, Fundamental::new("GOTO"));
    }

    #[test]
    fn test_parse_price() {
        let book = Orderbook {
            lastprice: 5_000.0,
            volume: 1_234_567.0,
            close: 4_950.0,
            high: 5_100.0,
            low: 4_900.0,
            open: 4_975.0,
            ara: PriceLimit { value: 6_175.0 },
            arb: PriceLimit { value: 4_225.0 },
            frequency: 8_765.0,
            ..Default::default()
        };
        let price = parse_price(&book);
        assert_eq!(price.price, 5_000.0);
        assert_eq!(price.volume, 1_234_567);
        assert_eq!(price.frequency, 8_765);
        assert_eq!(price.open, 4_975.0);
        assert_eq!(price.ara, 6_175.0);
    }

    #[test]
    fn test_parse_sentiments() {
        let posts = vec![
            StreamPost {
                content: " naik terus ".to_string(),
                sentiment_rate: 1.7,
                category: "bullish".to_string(),
                created_at: "2024-02-01 09:15:00".to_string(),
            },
            StreamPost {
                content: "no date".to_string(),
                created_at: "yesterday".to_string(),
                ..Default::default()
            },
            StreamPost {
                content: "turun".to_string(),
                sentiment_rate: -0.4,
                category: "bearish".to_string(),
                created_at: "2024-02-01T10:00:00+07:00".to_string(),
            },
        ];

        let sentiments = parse_sentiments(&posts);
        assert_eq!(sentiments.len(), 2);
        assert_eq!(sentiments[0].content, "naik terus");
        assert_eq!(sentiments[0].rate, 1.0);
        assert_eq!(
            sentiments[0].posted_at,
            Utc.with_ymd_and_hms(2024, 2, 1, 9, 15, 0).unwrap()
        );
        assert_eq!(
            sentiments[1].posted_at,
            Utc.with_ymd_and_hms(2024, 2, 1, 3, 0, 0).unwrap()
        );
    }
}
