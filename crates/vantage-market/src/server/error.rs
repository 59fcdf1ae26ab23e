//! HTTP error mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Advisory returned when an upstream service throttles us
pub const RATE_LIMIT_DETAIL: &str = "Rate limit exceeded. Please wait a moment and try again.";

/// Errors surfaced by the HTTP handlers
///
/// Every variant renders as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    /// The agent loop hit its step cap or deadline
    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    NotFound(String),

    /// Request passed the extractors but is still unusable
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<vantage_core::Error> for ApiError {
    fn from(err: vantage_core::Error) -> Self {
        if err.is_rate_limited() {
            return Self::RateLimited;
        }
        match err {
            vantage_core::Error::Aborted(reason) => Self::Timeout(reason),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
