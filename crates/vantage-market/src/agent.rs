//! The market chat agent

use async_trait::async_trait;
use std::sync::Arc;
use vantage_core::{Agent, Result};
use vantage_llm::LLMProvider;
use vantage_runtime::{AgentExecutor, AgentState, ExecutorConfig, ExecutorError, Outcome};

use crate::api::MarketDataProvider;
use crate::prompts::SYSTEM_PROMPT;
use crate::tools::market_tools;

/// Answers one chat message with the market tools at hand
///
/// Every call starts a fresh conversation; nothing is remembered between
/// messages.
pub struct StockAgent {
    executor: AgentExecutor,
}

impl StockAgent {
    /// Wire the provider, the market tools and the executor limits together
    ///
    /// The VANTAGE prompt is used unless `config` already names one.
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        market: Arc<dyn MarketDataProvider>,
        mut config: ExecutorConfig,
    ) -> Result<Self> {
        if config.system_prompt.is_none() {
            config.system_prompt = Some(SYSTEM_PROMPT.to_string());
        }

        let executor = AgentExecutor::builder()
            .provider(provider)
            .tool_registry(Arc::new(market_tools(market)))
            .config(config)
            .build()?;

        Ok(Self { executor })
    }

    /// Run one message, keeping the full message sequence
    pub async fn run(&self, message: impl Into<String>) -> std::result::Result<Outcome, ExecutorError> {
        self.executor.run_state(AgentState::new(message)).await
    }
}

#[async_trait]
impl Agent for StockAgent {
    async fn process(&self, input: String) -> Result<String> {
        tracing::info!(input_length = input.len(), "Processing chat message");
        let outcome = self.run(input).await?;
        Ok(outcome.answer)
    }

    fn name(&self) -> &'static str {
        "vantage"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::StaticMarketData;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use vantage_llm::{CompletionRequest, CompletionResponse, LLMError, Message, Role, ToolCall};

    struct ScriptedProvider {
        replies: Mutex<VecDeque<vantage_llm::Result<Message>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<vantage_llm::Result<Message>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> vantage_llm::Result<CompletionResponse> {
            self.requests.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LLMError::UnexpectedResponse("script exhausted".into())))
                .map(CompletionResponse::from_message)
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn market() -> Arc<StaticMarketData> {
        Arc::new(
            StaticMarketData::default()
                .with_close("TCS.NS", 3400.0)
                .with_history("TCS.NS", &[3390.0, 3400.0]),
        )
    }

    #[tokio::test]
    async fn test_price_and_history_round() {
        let provider = ScriptedProvider::new(vec![
            Ok(Message::assistant_with_tool_calls(
                "",
                vec![
                    ToolCall::new("a", "get_stock_price", json!({"symbol": "TCS.NS"})),
                    ToolCall::new("b", "get_stock_history", json!({"symbol": "TCS.NS"})),
                ],
            )),
            Ok(Message::assistant(
                "TCS at 3400.00.\n```json\n{\"action\": \"update_chart\", \"symbol\": \"TCS.NS\"}\n```",
            )),
        ]);
        let agent = StockAgent::new(provider.clone(), market(), ExecutorConfig::default()).unwrap();

        let outcome = agent.run("How is TCS doing?").await.unwrap();
        let messages = outcome.state.messages();

        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].text(), Some(SYSTEM_PROMPT));
        assert_eq!(messages[3].text(), Some("The current price of TCS.NS is 3400.00"));
        assert!(messages[4].text().unwrap().starts_with("Chart data for TCS.NS (1mo)"));
        assert!(outcome.answer.starts_with("TCS at 3400.00."));

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].tools.len(), 4);
    }

    #[tokio::test]
    async fn test_process_maps_rate_limit() {
        let provider = ScriptedProvider::new(vec![Err(LLMError::RateLimitExceeded(
            "429 Too Many Requests".into(),
        ))]);
        let agent = StockAgent::new(provider, market(), ExecutorConfig::default()).unwrap();

        let err = agent.process("hi".to_string()).await.unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_process_maps_iteration_limit_to_aborted() {
        let replies = (0..3)
            .map(|i| {
                Ok(Message::assistant_with_tool_calls(
                    "",
                    vec![ToolCall::new(format!("c{i}"), "get_market_status", json!({}))],
                ))
            })
            .collect();
        let config = ExecutorConfig {
            max_iterations: 2,
            ..Default::default()
        };
        let agent = StockAgent::new(ScriptedProvider::new(replies), market(), config).unwrap();

        let err = agent.process("loop".to_string()).await.unwrap_err();
        assert!(matches!(err, vantage_core::Error::Aborted(_)));
    }
}
