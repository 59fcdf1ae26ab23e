//! Tool for the exchange open/closed status

use async_trait::async_trait;
use serde_json::Value;
use vantage_llm::tools::schema;
use vantage_tools::Tool;

/// Fixed status line; live session detection is not implemented
pub const MARKET_STATUS: &str = "The Indian Stock Market (NSE/BSE) is currently OPEN (Mock Status).";

/// Reports whether the Indian market is open
pub struct MarketStatusTool;

#[async_trait]
impl Tool for MarketStatusTool {
    async fn execute(&self, _params: Value) -> String {
        MARKET_STATUS.to_string()
    }

    fn name(&self) -> &'static str {
        "get_market_status"
    }

    fn description(&self) -> &'static str {
        "Get the current status of the Indian Stock Market (NSE/BSE)."
    }

    fn input_schema(&self) -> Value {
        schema::empty()
    }
}
