//! Yahoo Finance market data

use super::{AlphaVantageClient, CompanyInfo, MarketDataProvider, Quote};
use crate::cache::{CacheKey, CacheManager};
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::warn;
use yahoo_finance_api as yahoo;

/// Market data backed by Yahoo Finance
///
/// Prices, history and fundamentals come from Yahoo. When an Alpha Vantage
/// key is configured, its `OVERVIEW` endpoint answers fundamentals lookups
/// that Yahoo could not serve. All successful lookups are cached.
pub struct YahooMarketData {
    cache: CacheManager,
    fundamentals: Option<AlphaVantageClient>,
}

impl YahooMarketData {
    /// Create a provider from the market data configuration
    pub fn new(config: &StockConfig) -> Result<Self> {
        config.validate()?;

        let fundamentals = config
            .alpha_vantage_api_key
            .as_ref()
            .map(|key| {
                AlphaVantageClient::new(
                    key.clone(),
                    config.alpha_vantage_rate_limit,
                    config.request_timeout,
                )
            })
            .transpose()?;

        Ok(Self {
            cache: CacheManager::new(config.cache_ttl_realtime, config.cache_ttl_fundamental),
            fundamentals,
        })
    }

    /// Whether fundamentals lookups can fall back to Alpha Vantage
    pub fn has_fundamentals_fallback(&self) -> bool {
        self.fundamentals.is_some()
    }

    fn connector() -> Result<yahoo::YahooConnector> {
        yahoo::YahooConnector::new().map_err(|e| StockError::YahooFinanceError(e.to_string()))
    }

    async fn fetch_latest_close(symbol: &str) -> Result<Option<f64>> {
        let response = Self::connector()?
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| yahoo_error(symbol, &e))?;

        match response.quotes() {
            Ok(quotes) => Ok(quotes.last().map(|q| q.close)),
            Err(e) => match yahoo_error(symbol, &e) {
                StockError::DataUnavailable { .. } => Ok(None),
                other => Err(other),
            },
        }
    }

    async fn fetch_history(symbol: &str, period: &str, interval: &str) -> Result<Vec<Quote>> {
        let response = Self::connector()?
            .get_quote_range(symbol, interval, period)
            .await
            .map_err(|e| yahoo_error(symbol, &e))?;

        let quotes = response.quotes().map_err(|e| yahoo_error(symbol, &e))?;

        let mut bars = to_bars(symbol, &quotes);
        bars.sort_by_key(|q| q.timestamp);
        Ok(bars)
    }

    async fn fetch_ticker_info(symbol: &str) -> Result<CompanyInfo> {
        let mut connector = Self::connector()?;
        let summary = connector
            .get_ticker_info(symbol)
            .await
            .map_err(|e| yahoo_error(symbol, &e))?;
        summary_to_info(symbol, summary)
    }

    /// Yahoo quoteSummary first, Alpha Vantage OVERVIEW when that fails and a key is set
    async fn fetch_company_info(&self, symbol: &str) -> Result<CompanyInfo> {
        match Self::fetch_ticker_info(symbol).await {
            Ok(info) => Ok(info),
            Err(e) => match &self.fundamentals {
                Some(client) => {
                    warn!(symbol, error = %e, "Yahoo fundamentals failed, trying Alpha Vantage");
                    client.company_overview(symbol).await
                }
                None => Err(e),
            },
        }
    }
}

#[async_trait]
impl MarketDataProvider for YahooMarketData {
    async fn latest_close(&self, symbol: &str) -> Result<Option<f64>> {
        let key = CacheKey::new(symbol, "quote", json!({"interval": "1d"}));
        self.cache
            .realtime
            .get_or_fetch(key, || Self::fetch_latest_close(symbol))
            .await
    }

    async fn company_info(&self, symbol: &str) -> Result<CompanyInfo> {
        let key = CacheKey::new(symbol, "fundamentals", json!({}));
        self.cache
            .fundamental
            .get_or_fetch(key, || self.fetch_company_info(symbol))
            .await
    }

    async fn price_history(
        &self,
        symbol: &str,
        period: &str,
        interval: &str,
    ) -> Result<Vec<Quote>> {
        let key = CacheKey::new(symbol, "history", json!({"period": period, "interval": interval}));
        self.cache
            .realtime
            .get_or_fetch(key, || Self::fetch_history(symbol, period, interval))
            .await
    }
}

/// Convert raw bars, dropping any whose timestamp is out of range
fn to_bars(symbol: &str, quotes: &[yahoo::Quote]) -> Vec<Quote> {
    quotes
        .iter()
        .filter_map(|q| {
            let Some(timestamp) = DateTime::<Utc>::from_timestamp(q.timestamp, 0) else {
                warn!(symbol, timestamp = q.timestamp, "Skipping bar with invalid timestamp");
                return None;
            };
            Some(Quote {
                timestamp,
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
        })
        .collect()
}

/// Pick the fundamentals subset out of a quoteSummary reply
///
/// An error reply, an empty result list or a result without any of the
/// fields is treated as "no data" for the symbol.
fn summary_to_info(symbol: &str, summary: yahoo::YQuoteSummary) -> Result<CompanyInfo> {
    let unavailable = |reason: String| StockError::DataUnavailable {
        symbol: symbol.to_string(),
        reason,
    };

    if let Some(error) = summary.finance.and_then(|f| f.error) {
        return Err(StockError::YahooFinanceError(
            error
                .description
                .or(error.code)
                .unwrap_or_else(|| "unknown quoteSummary error".to_string()),
        ));
    }

    let Some(quote_summary) = summary.quote_summary else {
        return Err(unavailable("empty quoteSummary".to_string()));
    };
    if let Some(error) = quote_summary.error {
        return Err(unavailable(
            error
                .description
                .or(error.code)
                .unwrap_or_else(|| "quoteSummary error".to_string()),
        ));
    }
    let Some(data) = quote_summary.result.and_then(|r| r.into_iter().next()) else {
        return Err(unavailable("no quoteSummary result".to_string()));
    };

    let (name, short_name) = data
        .quote_type
        .map(|q| (q.long_name, q.short_name))
        .unwrap_or_default();
    let (sector, industry, summary) = data
        .asset_profile
        .map(|p| (p.sector, p.industry, p.long_business_summary))
        .unwrap_or_default();
    let (market_cap, pe_ratio, dividend_yield) = data
        .summary_detail
        .map(|d| {
            (
                d.market_cap.map(|c| c as f64),
                d.trailing_pe.filter(|pe| pe.is_finite()),
                d.dividend_yield,
            )
        })
        .unwrap_or_default();

    let info = CompanyInfo {
        name: name.or(short_name),
        sector,
        industry,
        market_cap,
        pe_ratio,
        dividend_yield,
        summary,
    };
    if info == CompanyInfo::default() {
        return Err(unavailable("quoteSummary carried no fundamentals".to_string()));
    }
    Ok(info)
}

/// Classify a Yahoo error, separating "nothing there" from real failures
fn yahoo_error(symbol: &str, err: &yahoo::YahooError) -> StockError {
    let text = err.to_string();
    let lowered = text.to_lowercase();
    if lowered.contains("empty")
        || lowered.contains("no quotes")
        || lowered.contains("no result")
        || lowered.contains("not found")
    {
        StockError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: text,
        }
    } else {
        StockError::YahooFinanceError(text)
    }
}
