//! Tool that prepares chart history

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use vantage_llm::tools::schema;
use vantage_tools::{Tool, parse_args};

use super::{SYMBOL_REQUIRED, normalize_symbol};
use crate::api::MarketDataProvider;
use crate::history::{DEFAULT_PERIOD, interval_for_period};

/// Loads a price series for the chart without handing it to the model
///
/// The reply only says how many points exist; the frontend fetches the
/// series from the history endpoint, which hits the same cache entry.
pub struct StockHistoryTool {
    market: Arc<dyn MarketDataProvider>,
}

#[derive(Debug, Deserialize)]
struct HistoryParams {
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    period: Option<String>,
}

impl StockHistoryTool {
    pub fn new(market: Arc<dyn MarketDataProvider>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl Tool for StockHistoryTool {
    async fn execute(&self, params: Value) -> String {
        let params: HistoryParams = match parse_args(self.name(), params) {
            Ok(p) => p,
            Err(msg) => return msg,
        };
        let Some(symbol) = normalize_symbol(&params.symbol) else {
            return SYMBOL_REQUIRED.to_string();
        };
        let period = params
            .period
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_PERIOD.to_string());

        match self
            .market
            .price_history(&symbol, &period, interval_for_period(&period))
            .await
        {
            Ok(quotes) if quotes.is_empty() => {
                format!("Could not find history for symbol: {symbol}")
            }
            Ok(quotes) => format!(
                "Chart data for {symbol} ({period}) is available: {} data points. \
                 The frontend will fetch it from the history endpoint.",
                quotes.len()
            ),
            Err(e) => format!("Error fetching history for {symbol}: {e}"),
        }
    }

    fn name(&self) -> &'static str {
        "get_stock_history"
    }

    fn description(&self) -> &'static str {
        "Load historical stock data for a given symbol so the user's chart can render it."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            serde_json::json!({
                "symbol": schema::string("Stock symbol (e.g., TCS.NS, RELIANCE.NS)"),
                "period": schema::string_enum(
                    "Data period",
                    &["1d", "5d", "1mo", "3mo", "6mo", "1y"],
                    DEFAULT_PERIOD,
                ),
            }),
            &["symbol"],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::StaticMarketData;
    use serde_json::json;

    #[tokio::test]
    async fn test_acknowledgement_not_payload() {
        let market = Arc::new(StaticMarketData::default().with_history("TCS.NS", &[1.0, 2.0, 3.0]));
        let out = StockHistoryTool::new(market.clone())
            .execute(json!({"symbol": "tcs.ns"}))
            .await;

        assert_eq!(
            out,
            "Chart data for TCS.NS (1mo) is available: 3 data points. \
             The frontend will fetch it from the history endpoint."
        );
        let calls = market.history_calls.lock().unwrap();
        assert_eq!(calls[0], ("TCS.NS".into(), "1mo".into(), "90m".into()));
    }

    #[tokio::test]
    async fn test_explicit_period() {
        let market = Arc::new(StaticMarketData::default().with_history("TCS.NS", &[1.0]));
        let out = StockHistoryTool::new(market.clone())
            .execute(json!({"symbol": "TCS.NS", "period": "1y"}))
            .await;
        assert!(out.starts_with("Chart data for TCS.NS (1y) is available: 1 data points."));
        assert_eq!(market.history_calls.lock().unwrap()[0].2, "1d");
    }

    #[tokio::test]
    async fn test_no_history() {
        let out = StockHistoryTool::new(Arc::new(StaticMarketData::default()))
            .execute(json!({"symbol": "NOPE"}))
            .await;
        assert_eq!(out, "Could not find history for symbol: NOPE");
    }

    #[tokio::test]
    async fn test_fetch_error_is_text() {
        let out = StockHistoryTool::new(Arc::new(StaticMarketData::default().failing("TCS.NS")))
            .execute(json!({"symbol": "TCS.NS"}))
            .await;
        assert!(out.starts_with("Error fetching history for TCS.NS: "));
    }
}
