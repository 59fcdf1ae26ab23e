//! Shared state for request handlers

use std::sync::Arc;
use vantage_core::Agent;

use crate::api::MarketDataProvider;

/// Handles shared by every request
///
/// Each chat request gets its own conversation inside the agent, so nothing
/// here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<dyn Agent>,
    pub market: Arc<dyn MarketDataProvider>,
}

impl AppState {
    pub fn new(agent: Arc<dyn Agent>, market: Arc<dyn MarketDataProvider>) -> Self {
        Self { agent, market }
    }
}
