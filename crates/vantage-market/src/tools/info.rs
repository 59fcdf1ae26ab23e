//! Tool for company fundamentals

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use vantage_llm::tools::schema;
use vantage_tools::{Tool, parse_args};

use super::{SYMBOL_REQUIRED, SymbolParams, normalize_symbol};
use crate::api::MarketDataProvider;

/// Returns a fixed subset of fundamentals as a JSON object
pub struct StockInfoTool {
    market: Arc<dyn MarketDataProvider>,
}

impl StockInfoTool {
    pub fn new(market: Arc<dyn MarketDataProvider>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl Tool for StockInfoTool {
    async fn execute(&self, params: Value) -> String {
        let params: SymbolParams = match parse_args(self.name(), params) {
            Ok(p) => p,
            Err(msg) => return msg,
        };
        let Some(symbol) = normalize_symbol(&params.symbol) else {
            return SYMBOL_REQUIRED.to_string();
        };

        match self.market.company_info(&symbol).await {
            Ok(info) => serde_json::to_string(&info)
                .unwrap_or_else(|e| format!("Error fetching info for {symbol}: {e}")),
            Err(e) => format!("Error fetching info for {symbol}: {e}"),
        }
    }

    fn name(&self) -> &'static str {
        "get_stock_info"
    }

    fn description(&self) -> &'static str {
        "Get company information and fundamentals for a given symbol: name, sector, \
         industry, market cap, P/E ratio, dividend yield and a business summary."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            serde_json::json!({
                "symbol": schema::string("Stock ticker symbol (e.g., 'INFY.NS')"),
            }),
            &["symbol"],
        )
    }
}
