//! Stock-market chat agent for Vantage
//!
//! This crate wires an LLM reasoning loop to live market data and exposes it
//! over HTTP. It includes:
//!
//! - Market data from Yahoo Finance, with Alpha Vantage fundamentals
//! - Four tools the model may call: price, company info, market status and
//!   price history
//! - Chart directive extraction from the final answer
//! - An axum server with `/chat` and `/history` endpoints
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vantage_llm::providers::OpenAIProvider;
//! use vantage_market::{StockAgent, StockConfig, YahooMarketData};
//! use vantage_runtime::ExecutorConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = Arc::new(OpenAIProvider::new("sk-...")?);
//!     let market = Arc::new(YahooMarketData::new(&StockConfig::default())?);
//!     let agent = StockAgent::new(provider, market, ExecutorConfig::default())?;
//!
//!     let outcome = agent.run("What is the price of TCS.NS?").await?;
//!     println!("{}", outcome.answer);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod api;
pub mod cache;
pub mod chart;
pub mod config;
pub mod error;
pub mod history;
pub mod prompts;
pub mod server;
pub mod tools;

// Re-export main types for convenience
pub use agent::StockAgent;
pub use api::{CompanyInfo, MarketDataProvider, Quote, YahooMarketData};
pub use chart::{ChartDirective, extract_directive};
pub use config::{ServerConfig, StockConfig};
pub use error::{Result, StockError};
pub use history::{PricePoint, fetch_history};
pub use server::{AppState, router, serve};
