//! IDX listing client and table scraper.

use crate::{Result, error::IdxError};
use reqwest::Client;
use saham_traits::{ListingSource, Stock};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

/// Stock list page of the exchange.
pub const LISTING_URL: &str = "https://idx.co.id/id/data-pasar/data-saham/daftar-saham/";

/// Rows kept when the full listing is not requested.
pub const PREVIEW_ROWS: usize = 10;

const ROW_SELECTOR: &str = "#vgt-table tbody tr";

/// Trimmed text of a table cell, including its inner `span`.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

/// Scrape the company table out of a listing page.
///
/// Columns are ticker, name, IPO date, market cap and note. Non-digits are
/// stripped from the market cap. Rows without a ticker are skipped.
///
/// # Errors
///
/// Returns [`IdxError::Parse`] if the page has no company table.
pub fn parse_listing(html: &str) -> Result<Vec<Stock>> {
    let document = Html::parse_document(html);
    let table = Selector::parse("#vgt-table").map_err(|e| IdxError::Parse(e.to_string()))?;
    let rows = Selector::parse(ROW_SELECTOR).map_err(|e| IdxError::Parse(e.to_string()))?;
    let cells = Selector::parse("td").map_err(|e| IdxError::Parse(e.to_string()))?;

    if document.select(&table).next().is_none() {
        return Err(IdxError::Parse("missing #vgt-table".to_string()));
    }

    let stocks = document
        .select(&rows)
        .filter_map(|row| {
            let values: Vec<String> = row.select(&cells).map(cell_text).collect();
            let ticker = values.first().filter(|t| !t.is_empty())?.clone();
            let column = |i: usize| values.get(i).cloned().unwrap_or_default();
            let digits: String = column(3).chars().filter(char::is_ascii_digit).collect();
            Some(Stock {
                ticker,
                name: column(1),
                ipo_date: column(2),
                market_cap: digits.parse().unwrap_or_default(),
                note: column(4),
                home_page: String::new(),
            })
        })
        .collect();
    Ok(stocks)
}

/// Client for the exchange's stock list.
#[derive(Debug, Clone)]
pub struct IdxClient {
    client: Client,
    full_retrieve: bool,
}

impl IdxClient {
    /// Create a client. With `full_retrieve` false only the first
    /// [`PREVIEW_ROWS`] companies are returned.
    #[must_use]
    pub fn new(full_retrieve: bool) -> Self {
        Self {
            client: Client::new(),
            full_retrieve,
        }
    }

    /// Whether the whole listing is returned.
    #[must_use]
    pub const fn full_retrieve(&self) -> bool {
        self.full_retrieve
    }

    /// Keep the rows this client is configured to return.
    fn limit(&self, mut stocks: Vec<Stock>) -> Vec<Stock> {
        if !self.full_retrieve {
            stocks.truncate(PREVIEW_ROWS);
        }
        stocks
    }

    /// Fetch and scrape the listing page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or has no company table.
    pub async fn listing(&self) -> Result<Vec<Stock>> {
        let response = self.client.get(LISTING_URL).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IdxError::Status(status.as_u16()));
        }
        let html = response.text().await?;
        debug!(bytes = html.len(), "fetched listing page");

        let stocks = self.limit(parse_listing(&html)?);
        info!(count = stocks.len(), url = LISTING_URL, "stocks retrieved from IDX");
        Ok(stocks)
    }
}

impl Default for IdxClient {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ListingSource for IdxClient {
    async fn stocks(&self) -> saham_traits::Result<Vec<Stock>> {
        Ok(self.listing().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ticker: &str, name: &str, cap: &str) -> String {
        format!(
            "<tr><td><span>{ticker}</span></td><td><span>{name}</span></td>\
             <td><span>31 Mei 2000</span></td><td><span>{cap}</span></td>\
             <td><span>Utama</span></td></tr>"
        )
    }

    fn page(rows: usize) -> String {
        let body: String = (0..rows)
            .map(|i| row(&format!("T{i:03}"), &format!("Company {i}"), "1.000"))
            .collect();
        format!(
            "<html><body><table id=\"vgt-table\"><thead><tr><th>Kode</th></tr></thead>\
             <tbody>{body}</tbody></table></body></html>"
        )
    }

    #[test]
    fn test_parse_listing_columns() {
        let html = format!(
            "<table id=\"vgt-table\"><tbody>{}{}</tbody></table>",
            row("BBCA", "Bank Central Asia Tbk.", "1.234.567.890.000"),
            row("GOTO", "GoTo Gojek Tokopedia Tbk.", "")
        );
        let stocks = parse_listing(&html).unwrap();
        assert_eq!(stocks.len(), 2);
        assert_eq!(stocks[0].ticker, "BBCA");
        assert_eq!(stocks[0].name, "Bank Central Asia Tbk.");
        assert_eq!(stocks[0].ipo_date, "31 Mei 2000");
        assert_eq!(stocks[0].market_cap, 1_234_567_890_000.0);
        assert_eq!(stocks[0].note, "Utama");
        assert_eq!(stocks[1].market_cap, 0.0);
    }

    #[test]
    fn test_parse_listing_skips_header_and_blank_rows() {
        let html = "<table id=\"vgt-table\"><thead><tr><td>Kode</td></tr></thead>\
                    <tbody><tr><td></td></tr><tr><td>ADRO</td></tr></tbody></table>";
        let stocks = parse_listing(html).unwrap();
        assert_eq!(stocks.len(), 1);
        assert_eq!(stocks[0].ticker, "ADRO");
        assert!(stocks[0].name.is_empty());
    }

    #[test]
    fn test_parse_listing_without_table() {
        let err = parse_listing("<html><body><p>maintenance</p></body></html>").unwrap_err();
        assert!(matches!(err, IdxError::Parse(_)));
    }

    #[test]
    fn test_preview_limit() {
        let stocks = parse_listing(&page(25)).unwrap();
        assert_eq!(stocks.len(), 25);

        let preview = IdxClient::new(false).limit(stocks.clone());
        assert_eq!(preview.len(), PREVIEW_ROWS);
        assert_eq!(preview[0].ticker, "T000");

        let full = IdxClient::new(true).limit(stocks);
        assert_eq!(full.len(), 25);
    }
}
