//! Market data sources
//!
//! [`MarketDataProvider`] is the seam between the tools and the outside
//! world. [`YahooMarketData`] is the production implementation; it falls
//! back to Alpha Vantage for fundamentals when a key is configured.

pub mod alpha_vantage;
pub mod yahoo;

#[cfg(test)]
pub(crate) mod mock;

pub use alpha_vantage::AlphaVantageClient;
pub use yahoo::YahooMarketData;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLC bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Company fundamentals handed to the model
///
/// Keys keep the camelCase names the frontend and prompt expect; missing
/// values serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    #[serde(rename = "marketCap")]
    pub market_cap: Option<f64>,
    #[serde(rename = "peRatio")]
    pub pe_ratio: Option<f64>,
    #[serde(rename = "dividendYield")]
    pub dividend_yield: Option<f64>,
    pub summary: Option<String>,
}

/// Source of prices, fundamentals and price history
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Most recent daily close, `None` when the symbol has no data
    async fn latest_close(&self, symbol: &str) -> Result<Option<f64>>;

    /// Fundamentals for a symbol
    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo>;

    /// OHLC bars covering `period`, sampled every `interval`, oldest first
    async fn price_history(&self, symbol: &str, period: &str, interval: &str)
    -> Result<Vec<Quote>>;
}
