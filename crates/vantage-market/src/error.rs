//! Error types for market data operations

use thiserror::Error;

/// Market data specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded {
        provider: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Alpha Vantage API error
    #[error("Alpha Vantage error: {0}")]
    AlphaVantageError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl StockError {
    /// Whether the upstream data source is throttling us
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::RateLimitExceeded { .. } => true,
            Self::NetworkError(e) => {
                e.status().is_some_and(|s| s == reqwest::StatusCode::TOO_MANY_REQUESTS)
            }
            other => {
                let text = other.to_string();
                text.contains("429") || text.to_lowercase().contains("rate limit")
            }
        }
    }
}

/// Result type alias for market data operations
pub type Result<T> = std::result::Result<T, StockError>;

/// Convert StockError to vantage_core::Error
impl From<StockError> for vantage_core::Error {
    fn from(err: StockError) -> Self {
        if err.is_rate_limited() {
            vantage_core::Error::RateLimited(err.to_string())
        } else {
            vantage_core::Error::ProcessingFailed(err.to_string())
        }
    }
}
