//! Stockbit API client implementation.

use crate::{
    Result,
    error::StockbitError,
    parse::{parse_fundamental, parse_price, parse_sentiments},
    types::{ApiResponse, KeyStatsData, LoginData, Orderbook, RefreshData, StreamData},
};
use reqwest::{Client, StatusCode, Url};
use saham_traits::{
    Fundamental, FundamentalSource, PriceSource, Sentiment, SentimentSource, Stock, StockPrice,
    Symbol,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Password login endpoint.
const LOGIN_URL: &str = "https://api.stockbit.com/v2.5/login";
/// Base URL of the data endpoints.
const EXODUS_URL: &str = "https://exodus.stockbit.com";

/// Re-authentication attempts after a 401.
const MAX_REAUTH: u32 = 3;
/// Pause after every request.
const DEFAULT_PACING: Duration = Duration::from_millis(200);

const ACCESS_TOKEN_FILE: &str = "stockbit_token.tmp";
const REFRESH_TOKEN_FILE: &str = "stockbit_refresh_token.tmp";

/// Bearer and refresh tokens of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    /// Bearer token, if logged in.
    pub access: Option<String>,
    /// Refresh token, if issued.
    pub refresh: Option<String>,
}

/// File cache of [`Tokens`] so consecutive runs reuse a session.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    /// Store tokens under `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store tokens under the system temp directory.
    #[must_use]
    pub fn temp() -> Self {
        Self::new(env::temp_dir())
    }

    /// Directory of the token files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(path: &Path) -> Option<String> {
        std::fs::read_to_string(path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Load cached tokens; missing or empty files yield `None` fields.
    #[must_use]
    pub fn load(&self) -> Tokens {
        Tokens {
            access: Self::read(&self.dir.join(ACCESS_TOKEN_FILE)),
            refresh: Self::read(&self.dir.join(REFRESH_TOKEN_FILE)),
        }
    }

    /// Persist `tokens`, writing empty files for absent ones.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be written.
    pub fn save(&self, tokens: &Tokens) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(
            self.dir.join(ACCESS_TOKEN_FILE),
            tokens.access.as_deref().unwrap_or_default(),
        )?;
        std::fs::write(
            self.dir.join(REFRESH_TOKEN_FILE),
            tokens.refresh.as_deref().unwrap_or_default(),
        )
    }
}

/// Stockbit API client.
///
/// Every request carries the cached bearer token. A 401 triggers a refresh
/// (or a fresh login when no refresh token exists) and a retry, up to three
/// times. Requests are paced to stay under the API rate limits.
#[derive(Debug)]
pub struct StockbitClient {
    client: Client,
    username: String,
    password: String,
    tokens: Mutex<Tokens>,
    store: TokenStore,
    pacing: Duration,
}

impl StockbitClient {
    /// Create a client with the given credentials and the temp-dir token cache.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        let store = TokenStore::temp();
        Self {
            client: Client::new(),
            username: username.into(),
            password: password.into(),
            tokens: Mutex::new(store.load()),
            store,
            pacing: DEFAULT_PACING,
        }
    }

    /// Create a client from `STOCKBIT_USERNAME` and `STOCKBIT_PASSWORD`.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is not set.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let username = env::var("STOCKBIT_USERNAME").map_err(|_| StockbitError::MissingCredentials)?;
        let password = env::var("STOCKBIT_PASSWORD").map_err(|_| StockbitError::MissingCredentials)?;

        Ok(Self::new(username, password))
    }

    /// Use a different token cache.
    #[must_use]
    pub fn with_token_store(mut self, store: TokenStore) -> Self {
        self.tokens = Mutex::new(store.load());
        self.store = store;
        self
    }

    /// Override the pause between requests.
    #[must_use]
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Build a data endpoint URL.
    fn url(endpoint: &str) -> String {
        format!("{EXODUS_URL}/{}", endpoint.trim_start_matches('/'))
    }

    async fn pause(&self) {
        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
    }

    async fn store_tokens(&self, tokens: Tokens) -> Result<()> {
        self.store.save(&tokens)?;
        *self.tokens.lock().await = tokens;
        Ok(())
    }

    /// Log in with username and password.
    async fn login(&self) -> Result<()> {
        let url = Url::parse_with_params(
            LOGIN_URL,
            &[("user", self.username.as_str()), ("password", self.password.as_str())],
        )
        .map_err(|e| StockbitError::Auth(e.to_string()))?;

        let response = self.client.post(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StockbitError::Auth(format!("login HTTP {status}: {body}")));
        }

        let login: ApiResponse<LoginData> = response.json().await?;
        self.store_tokens(Tokens {
            access: Some(login.data.access_token),
            refresh: Some(login.data.refresh_token).filter(|t| !t.is_empty()),
        })
        .await?;
        info!("logged in to stockbit");
        Ok(())
    }

    /// Exchange the refresh token for a new token pair.
    async fn refresh(&self, refresh_token: &str) -> Result<()> {
        let response = self
            .client
            .post(Self::url("login/refresh"))
            .bearer_auth(refresh_token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StockbitError::Auth(format!("refresh HTTP {status}: {body}")));
        }

        let refreshed: ApiResponse<RefreshData> = response.json().await?;
        self.store_tokens(Tokens {
            access: Some(refreshed.data.access.token),
            refresh: Some(refreshed.data.refresh.token),
        })
        .await?;
        info!("refreshed stockbit token");
        Ok(())
    }

    /// Obtain a new bearer token, preferring the refresh token.
    async fn authenticate(&self) -> Result<()> {
        let refresh_token = self.tokens.lock().await.refresh.clone();
        if let Some(token) = refresh_token {
            match self.refresh(&token).await {
                Ok(()) => return Ok(()),
                Err(e) => warn!(error = %e, "token refresh failed, logging in"),
            }
        }
        self.login().await
    }

    /// GET a data endpoint and unwrap its `data` payload.
    ///
    /// Returns `None` for 404. A 401 re-authenticates and retries.
    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Option<T>> {
        let url = Self::url(endpoint);
        let mut reauths = 0;

        loop {
            let token = self.tokens.lock().await.access.clone();
            let Some(token) = token else {
                self.authenticate().await?;
                continue;
            };

            let response = self.client.get(&url).bearer_auth(&token).send().await?;
            let status = response.status();
            debug!(%url, %status, "stockbit request");

            if status.is_success() {
                let text = response.text().await?;
                self.pause().await;
                let parsed: ApiResponse<T> = serde_json::from_str(&text)?;
                return Ok(Some(parsed.data));
            }

            if status == StatusCode::NOT_FOUND {
                self.pause().await;
                return Ok(None);
            }

            if status == StatusCode::UNAUTHORIZED {
                if reauths >= MAX_REAUTH {
                    return Err(StockbitError::Unauthorized(reauths));
                }
                reauths += 1;
                warn!(%url, attempt = reauths, "stockbit token rejected, re-authenticating");
                self.authenticate().await?;
                self.pause().await;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(StockbitError::Api {
                status: status.as_u16(),
                body,
            });
        }
    }

    /// Raw key statistics of `ticker`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    pub async fn key_statistics(&self, ticker: &str) -> Result<Option<KeyStatsData>> {
        self.get(&format!("keystats/ratio/v1/{ticker}?year_limit=10"))
            .await
    }

    /// Fundamentals of `ticker`, parsed from its key statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    pub async fn fundamental(&self, ticker: &str) -> Result<Option<Fundamental>> {
        Ok(self
            .key_statistics(ticker)
            .await?
            .map(|data| parse_fundamental(ticker, &data)))
    }

    /// Latest orderbook snapshot of `ticker`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    pub async fn price(&self, ticker: &str) -> Result<Option<StockPrice>> {
        let book: Option<Orderbook> = self
            .get(&format!("company-price-feed/v2/orderbook/companies/{ticker}"))
            .await?;
        Ok(book.as_ref().map(parse_price))
    }

    /// Recent stream posts about `ticker`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    pub async fn stream(&self, ticker: &str) -> Result<Vec<Sentiment>> {
        let data: Option<StreamData> = self
            .get(&format!("stream/v3/symbol/{ticker}?limit=20"))
            .await?;
        Ok(data.map(|d| parse_sentiments(&d.stream)).unwrap_or_default())
    }

    /// Fundamentals of many stocks; failures are logged and skipped.
    pub async fn fundamentals(&self, stocks: &[Stock]) -> HashMap<Symbol, Fundamental> {
        let mut results = HashMap::with_capacity(stocks.len());
        for stock in stocks {
            match self.fundamental(&stock.ticker).await {
                Ok(Some(f)) => {
                    results.insert(stock.ticker.clone(), f);
                }
                Ok(None) => debug!(ticker = %stock.ticker, "no key statistics"),
                Err(e) => warn!(ticker = %stock.ticker, error = %e, "failed to fetch key statistics"),
            }
        }
        results
    }

    /// Prices of many stocks; failures are logged and skipped.
    pub async fn prices(&self, stocks: &[Stock]) -> HashMap<Symbol, StockPrice> {
        let mut results = HashMap::with_capacity(stocks.len());
        for stock in stocks {
            match self.price(&stock.ticker).await {
                Ok(Some(p)) => {
                    results.insert(stock.ticker.clone(), p);
                }
                Ok(None) => debug!(ticker = %stock.ticker, "no orderbook"),
                Err(e) => warn!(ticker = %stock.ticker, error = %e, "failed to fetch price"),
            }
        }
        results
    }

    /// Stream posts of many stocks; failures are logged and skipped.
    pub async fn sentiments(&self, stocks: &[Stock]) -> HashMap<Symbol, Vec<Sentiment>> {
        let mut results = HashMap::with_capacity(stocks.len());
        for stock in stocks {
            match self.stream(&stock.ticker).await {
                Ok(posts) => {
                    results.insert(stock.ticker.clone(), posts);
                }
                Err(e) => warn!(ticker = %stock.ticker, error = %e, "failed to fetch stream"),
            }
        }
        results
    }
}

impl FundamentalSource for StockbitClient {
    async fn fundamental(&self, stock: &Stock) -> saham_traits::Result<Option<Fundamental>> {
        Ok(Self::fundamental(self, &stock.ticker).await?)
    }
}

impl PriceSource for StockbitClient {
    async fn price(&self, stock: &Stock) -> saham_traits::Result<Option<StockPrice>> {
        Ok(Self::price(self, &stock.ticker).await?)
    }
}

impl SentimentSource for StockbitClient {
    async fn sentiments(&self, stock: &Stock) -> saham_traits::Result<Vec<Sentiment>> {
        Ok(self.stream(&stock.ticker).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        assert_eq!(
            StockbitClient::url("keystats/ratio/v1/BBCA?year_limit=10"),
            "https://exodus.stockbit.com/keystats/ratio/v1/BBCA?year_limit=10"
        );
        assert_eq!(
            StockbitClient::url("/login/refresh"),
            "https://exodus.stockbit.com/login/refresh"
        );
    }

    #[test]
    fn test_token_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        assert_eq!(store.load(), Tokens::default());

        let tokens = Tokens {
            access: Some("access-123".to_string()),
            refresh: None,
        };
        store.save(&tokens).unwrap();
        assert_eq!(store.load(), tokens);
        assert!(dir.path().join(REFRESH_TOKEN_FILE).exists());
    }

    #[tokio::test]
    async fn test_client_loads_cached_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path());
        store
            .save(&Tokens {
                access: Some("cached".to_string()),
                refresh: Some("refresh".to_string()),
            })
            .unwrap();

        let client = StockbitClient::new("user", "secret")
            .with_token_store(store)
            .with_pacing(Duration::ZERO);
        let tokens = client.tokens.lock().await.clone();
        assert_eq!(tokens.access.as_deref(), Some("cached"));
        assert_eq!(tokens.refresh.as_deref(), Some("refresh"));
        assert!(client.pacing.is_zero());
    }
}
