//! Error types for the Stockbit API client.

use saham_traits::SahamError;
use thiserror::Error;

/// Errors that can occur when using the Stockbit API.
#[derive(Debug, Error)]
pub enum StockbitError {
    /// Missing login credentials.
    #[error("STOCKBIT_USERNAME and STOCKBIT_PASSWORD environment variables must be set")]
    MissingCredentials,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-success status.
    #[error("Stockbit API error: HTTP {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Login or token refresh was rejected.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Still unauthorized after re-authenticating.
    #[error("Unauthorized after {0} re-authentication attempts")]
    Unauthorized(u32),

    /// Token cache I/O failed.
    #[error("Token cache error: {0}")]
    TokenCache(#[from] std::io::Error),
}

impl From<StockbitError> for SahamError {
    fn from(err: StockbitError) -> Self {
        match err {
            StockbitError::MissingCredentials => Self::Config(err.to_string()),
            other => Self::DataFetch(other.to_string()),
        }
    }
}
