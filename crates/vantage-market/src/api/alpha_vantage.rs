//! Alpha Vantage API client

use super::CompanyInfo;
use crate::error::{Result, StockError};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client with API key and rate limit
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `rate_limit` - Maximum requests per minute (5 on the free tier)
    /// * `timeout` - HTTP timeout per request
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            rate_limiter,
        })
    }

    /// Fetch the `OVERVIEW` fundamentals for a symbol
    pub async fn company_overview(&self, symbol: &str) -> Result<CompanyInfo> {
        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(BASE_URL)
            .query(&[
                ("function", "OVERVIEW"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(StockError::RateLimitExceeded {
                provider: PROVIDER.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(StockError::AlphaVantageError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: Value = response.json().await?;
        parse_overview(symbol, &data)
    }
}

/// Map an `OVERVIEW` payload to [`CompanyInfo`]
fn parse_overview(symbol: &str, data: &Value) -> Result<CompanyInfo> {
    if let Some(error) = data.get("Error Message") {
        return Err(StockError::AlphaVantageError(error.to_string()));
    }

    // Throttling is reported in a 200 body under either key
    if data.get("Note").is_some() || data.get("Information").is_some() {
        return Err(StockError::RateLimitExceeded {
            provider: PROVIDER.to_string(),
        });
    }

    if data.as_object().is_none_or(serde_json::Map::is_empty) {
        return Err(StockError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: "no overview returned".to_string(),
        });
    }

    Ok(CompanyInfo {
        name: text_field(data, "Name"),
        sector: text_field(data, "Sector"),
        industry: text_field(data, "Industry"),
        market_cap: number_field(data, "MarketCapitalization"),
        pe_ratio: number_field(data, "PERatio"),
        dividend_yield: number_field(data, "DividendYield"),
        summary: text_field(data, "Description"),
    })
}

/// Alpha Vantage spells missing values as "None", "-" or ""
fn text_field(data: &Value, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "None" && *v != "-")
        .map(ToString::to_string)
}

fn number_field(data: &Value, key: &str) -> Option<f64> {
    text_field(data, key).and_then(|v| v.parse().ok())
}
