//! Tool for the latest stock price

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use vantage_llm::tools::schema;
use vantage_tools::{Tool, parse_args};

use super::{SYMBOL_REQUIRED, SymbolParams, normalize_symbol};
use crate::api::MarketDataProvider;

/// Reports the most recent daily close for a symbol
pub struct StockPriceTool {
    market: Arc<dyn MarketDataProvider>,
}

impl StockPriceTool {
    pub fn new(market: Arc<dyn MarketDataProvider>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl Tool for StockPriceTool {
    async fn execute(&self, params: Value) -> String {
        let params: SymbolParams = match parse_args(self.name(), params) {
            Ok(p) => p,
            Err(msg) => return msg,
        };
        let Some(symbol) = normalize_symbol(&params.symbol) else {
            return SYMBOL_REQUIRED.to_string();
        };

        match self.market.latest_close(&symbol).await {
            Ok(Some(price)) => format!("The current price of {symbol} is {price:.2}"),
            Ok(None) => format!("Could not find data for symbol: {symbol}"),
            Err(e) => format!("Error fetching price for {symbol}: {e}"),
        }
    }

    fn name(&self) -> &'static str {
        "get_stock_price"
    }

    fn description(&self) -> &'static str {
        "Get the current stock price for a given symbol (e.g., RELIANCE.NS, TCS.NS)."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            serde_json::json!({
                "symbol": schema::string("Stock ticker symbol (e.g., 'RELIANCE.NS', 'TCS.NS')"),
            }),
            &["symbol"],
        )
    }
}
