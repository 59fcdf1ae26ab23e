//! Direct price-history fetch for chart rendering
//!
//! The model only learns that chart data exists; the frontend pulls the
//! series itself through the history endpoint, which is served from here.

use crate::api::MarketDataProvider;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Period used when the caller does not name one
pub const DEFAULT_PERIOD: &str = "1mo";

/// One chart record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Bar start, ISO-8601
    pub time: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Same as `close`; line charts read this key
    pub value: f64,
}

/// Sampling interval for a requested period
///
/// Shorter periods get finer bars: `1d` → `5m`, `5d` → `15m`, `1mo` → `90m`,
/// anything else → `1d`.
pub fn interval_for_period(period: &str) -> &'static str {
    match period {
        "1d" => "5m",
        "5d" => "15m",
        "1mo" => "90m",
        _ => "1d",
    }
}

/// Fetch the OHLC series for `symbol` over `period`, oldest first
///
/// Never fails: a missing symbol or an upstream error yields an empty vector.
pub async fn fetch_history(
    provider: &dyn MarketDataProvider,
    symbol: &str,
    period: &str,
) -> Vec<PricePoint> {
    let interval = interval_for_period(period);

    match provider.price_history(symbol, period, interval).await {
        Ok(quotes) => quotes
            .into_iter()
            .map(|q| PricePoint {
                time: q.timestamp.to_rfc3339(),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                value: q.close,
            })
            .collect(),
        Err(e) => {
            warn!(symbol, period, interval, error = %e, "History fetch failed");
            Vec::new()
        }
    }
}
