//! Error types for the IDX listing provider.

use saham_traits::SahamError;
use thiserror::Error;

/// Errors that can occur when reading the IDX listing.
#[derive(Debug, Error)]
pub enum IdxError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The page answered with a non-success status.
    #[error("IDX listing page returned HTTP {0}")]
    Status(u16),

    /// The page did not contain the company table.
    #[error("Listing table not found: {0}")]
    Parse(String),
}

impl From<IdxError> for SahamError {
    fn from(err: IdxError) -> Self {
        Self::DataFetch(err.to_string())
    }
}
