//! Market tools exposed to the model
//!
//! Every tool answers with text. Upstream failures are described in that
//! text, so the agent loop never sees a tool fault.

pub mod history;
pub mod info;
pub mod market_status;
pub mod price;

pub use history::StockHistoryTool;
pub use info::StockInfoTool;
pub use market_status::MarketStatusTool;
pub use price::StockPriceTool;

use crate::api::MarketDataProvider;
use serde::Deserialize;
use std::sync::Arc;
use vantage_tools::ToolRegistry;

/// Reply for a missing or blank symbol argument
pub const SYMBOL_REQUIRED: &str = "A non-empty stock symbol is required";

/// Arguments shared by the single-symbol tools
#[derive(Debug, Deserialize)]
pub(crate) struct SymbolParams {
    #[serde(default)]
    pub symbol: String,
}

/// Trim and upper-case a ticker, rejecting blanks
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim();
    (!symbol.is_empty()).then(|| symbol.to_uppercase())
}

/// Registry holding the four market tools, in the order the model sees them
pub fn market_tools(market: Arc<dyn MarketDataProvider>) -> ToolRegistry {
    ToolRegistry::builder()
        .register(Arc::new(StockPriceTool::new(Arc::clone(&market))))
        .register(Arc::new(StockInfoTool::new(Arc::clone(&market))))
        .register(Arc::new(MarketStatusTool))
        .register(Arc::new(StockHistoryTool::new(market)))
        .build()
}
