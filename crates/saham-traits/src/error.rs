//! Error types for the saham workspace.
//!
//! Data-quality problems (missing fundamentals, non-positive denominators)
//! never become errors; the derivation engine resolves them to zero. What
//! remains here are configuration, provider and sink failures.

use thiserror::Error;

/// The main error type for saham operations.
#[derive(Debug, Error)]
pub enum SahamError {
    /// An output-format selector that no sink implements.
    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(String),

    /// A required configuration value is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error fetching data from an external provider.
    #[error("Data fetch error: {0}")]
    DataFetch(String),

    /// Error writing to an output sink.
    #[error("Sink error: {0}")]
    Sink(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl SahamError {
    /// Whether this error is a configuration error that must abort the run.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::UnsupportedOutput(_) | Self::Config(_))
    }
}

impl From<String> for SahamError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for SahamError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for saham operations.
pub type Result<T> = std::result::Result<T, SahamError>;
