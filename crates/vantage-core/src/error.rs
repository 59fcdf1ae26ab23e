//! Error types for vantage-core

use thiserror::Error;

/// Result type alias for vantage-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// Agent initialization failed
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent processing failed
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    /// An upstream service asked us to slow down
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// The reasoning loop stopped before producing a final answer
    #[error("Agent aborted: {0}")]
    Aborted(String),
}

impl Error {
    /// Whether this error signals upstream rate-limiting.
    ///
    /// Besides the typed variant, the rendered message is inspected for
    /// `429` or `rate limit`, since some providers only report throttling
    /// inside an otherwise generic failure.
    pub fn is_rate_limited(&self) -> bool {
        if matches!(self, Self::RateLimited(_)) {
            return true;
        }
        let text = self.to_string();
        text.contains("429") || text.to_lowercase().contains("rate limit")
    }
}
