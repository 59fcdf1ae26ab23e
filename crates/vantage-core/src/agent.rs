//! Core Agent trait definition

use crate::Result;
use async_trait::async_trait;

/// Core trait that all agents must implement
///
/// An agent turns one user message into one final answer. Each call is
/// independent: no conversation state survives between invocations.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process input and return output
    async fn process(&self, input: String) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;
}
