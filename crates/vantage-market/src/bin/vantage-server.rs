//! Vantage HTTP server
//!
//! # Usage
//!
//! ```bash
//! export OPENROUTER_API_KEY="sk-or-..."
//! # optional, fallback source for company fundamentals
//! export ALPHA_VANTAGE_API_KEY="..."
//!
//! cargo run --bin vantage-server -p vantage-market -- --port 8000
//! ```

use clap::Parser;
use std::sync::Arc;
use tracing::info;
use vantage_llm::providers::{OpenAIConfig, OpenAIProvider};
use vantage_market::{AppState, ServerConfig, StockAgent, StockConfig, YahooMarketData};
use vantage_utils::{init_tracing, load_dotenv};

#[derive(Parser, Debug)]
#[command(name = "vantage-server")]
#[command(about = "Stock-market chat agent over HTTP", long_about = None)]
struct Args {
    /// Interface to bind, overrides VANTAGE_HOST
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overrides VANTAGE_PORT
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let dotenv = load_dotenv();
    let mut config = ServerConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    init_tracing(config.log_format);
    dotenv.log();

    info!(
        api_base = %config.api_base,
        model = %config.model,
        max_iterations = config.max_iterations,
        deadline_secs = config.deadline.as_secs(),
        "Starting Vantage"
    );

    let llm_config = OpenAIConfig::new(config.api_key.clone())
        .with_api_base(config.api_base.clone())
        .with_timeout(config.llm_timeout.as_secs());
    let provider = Arc::new(OpenAIProvider::with_config(llm_config)?);

    let stock_config = StockConfig::builder().with_env_api_key().build()?;
    let market = Arc::new(YahooMarketData::new(&stock_config)?);
    if !market.has_fundamentals_fallback() {
        info!("ALPHA_VANTAGE_API_KEY not set, fundamentals come from Yahoo only");
    }

    let agent = StockAgent::new(provider, market.clone(), config.executor_config())?;
    let state = AppState::new(Arc::new(agent), market);

    vantage_market::serve(&config, state).await
}
