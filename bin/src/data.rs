//! Universe loading and company assembly for the saham CLI.

use chrono::NaiveDate;
use saham_traits::{Company, Fundamental, SahamError, Sentiment, Stock, StockPrice, Symbol};
use std::collections::HashMap;
use std::path::Path;

/// Title prefix of generated reports.
const TITLE_PREFIX: &str = "IDX Fundamental Analysis";

/// Default report title for `date`.
pub(crate) fn default_title(date: NaiveDate) -> String {
    format!("{TITLE_PREFIX} {}", date.format("%Y-%m-%d"))
}

/// Parse tickers separated by newlines or commas.
///
/// Tickers are upper-cased and de-duplicated in first-seen order. Blank
/// entries and `#` comment lines are skipped.
pub(crate) fn parse_symbols(text: &str) -> Vec<Symbol> {
    let mut seen = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        for raw in line.split(',') {
            let ticker = raw.trim().to_ascii_uppercase();
            if !ticker.is_empty() && !seen.contains(&ticker) {
                seen.push(ticker);
            }
        }
    }
    seen
}

/// Tickers given on the command line and in an optional symbols file.
pub(crate) fn load_symbols(symbols: &[String], file: Option<&Path>) -> Result<Vec<Symbol>, SahamError> {
    let mut text = symbols.join(",");
    if let Some(path) = file {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SahamError::Config(format!("cannot read symbols file {}: {e}", path.display()))
        })?;
        text.push('\n');
        text.push_str(&contents);
    }
    Ok(parse_symbols(&text))
}

/// Join per-ticker provider results onto the listing, keeping listing order.
///
/// Companies missing a price keep the zero snapshot; companies missing
/// fundamentals keep `None`.
pub(crate) fn assemble(
    stocks: Vec<Stock>,
    mut fundamentals: HashMap<Symbol, Fundamental>,
    prices: &HashMap<Symbol, StockPrice>,
    mut sentiments: HashMap<Symbol, Vec<Sentiment>>,
) -> Vec<Company> {
    stocks
        .into_iter()
        .map(|stock| {
            let ticker = stock.ticker.clone();
            let mut company = Company::new(stock);
            company.fundamental = fundamentals.remove(&ticker);
            company.stock_price = prices.get(&ticker).copied().unwrap_or_default();
            company.sentiments = sentiments.remove(&ticker).unwrap_or_default();
            company
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_title() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(default_title(date), "IDX Fundamental Analysis 2024-01-31");
    }

    #[test]
    fn test_parse_symbols() {
        let symbols = parse_symbols("bbca, BBRI\n# banks above\n\n tlkm \nBBCA");
        assert_eq!(symbols, vec!["BBCA", "BBRI", "TLKM"]);
    }

    #[test]
    fn test_load_symbols_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GOTO\nASII").unwrap();

        let symbols = load_symbols(&["BBCA".to_string()], Some(file.path())).unwrap();
        assert_eq!(symbols, vec!["BBCA", "GOTO", "ASII"]);

        let missing = load_symbols(&[], Some(Path::new("/nonexistent/symbols.txt")));
        assert!(matches!(missing, Err(SahamError::Config(_))));
    }

    #[test]
    fn test_assemble_keeps_listing_order() {
        let stocks = vec![Stock::new("B"), Stock::new("A"), Stock::new("C")];
        let mut fundamentals = HashMap::new();
        fundamentals.insert("A".to_string(), Fundamental::new("A"));
        let mut prices = HashMap::new();
        prices.insert(
            "C".to_string(),
            StockPrice {
                close: 1_000.0,
                ..Default::default()
            },
        );

        let companies = assemble(stocks, fundamentals, &prices, HashMap::new());
        let tickers: Vec<_> = companies.iter().map(Company::ticker).collect();
        assert_eq!(tickers, vec!["B", "A", "C"]);
        assert!(companies[0].fundamental.is_none());
        assert!(companies[1].fundamental.is_some());
        assert_eq!(companies[2].close(), 1_000.0);
        assert!(companies[2].sentiments.is_empty());
    }
}
