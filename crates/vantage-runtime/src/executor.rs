//! Agent executor for running agent loops
//!
//! The AgentExecutor implements a two-node cycle:
//! 1. REASON: call the LLM with the conversation and available tools
//! 2. If the reply requests tools, ACT: run each one in order, append the
//!    results and go back to REASON
//! 3. Otherwise the run is DONE and the reply text is the answer
//!
//! A step cap and a wall-clock deadline move the loop to ABORTED instead of
//! letting a model that keeps requesting tools spin forever.

use crate::AgentState;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use vantage_llm::{CompletionRequest, LLMError, LLMProvider, Message, ToolCall, ToolDefinition};
use vantage_tools::ToolRegistry;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "tngtech/deepseek-r1t2-chimera:free";

/// Event handler for agent execution events
///
/// Implement this trait to receive callbacks during agent execution,
/// useful for streaming tool call status to clients.
#[async_trait]
pub trait ExecutorEventHandler: Send + Sync {
    /// Called when a tool execution starts
    async fn on_tool_start(&self, _id: &str, _name: &str, _input: &Value) {}

    /// Called when a tool execution completes
    async fn on_tool_done(&self, _id: &str, _name: &str, _result: &str, _duration_ms: u64) {}

    /// Called when the agent completes
    async fn on_complete(&self, _result: &str) {}

    /// Called when the run is aborted
    async fn on_error(&self, _error: &str) {}
}

/// No-op event handler for when events are not needed
pub struct NoOpEventHandler;

#[async_trait]
impl ExecutorEventHandler for NoOpEventHandler {}

/// Errors that end an agent run without a final answer
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// The LLM provider failed
    #[error(transparent)]
    Provider(#[from] LLMError),

    /// The model kept requesting tools past the step cap
    #[error("Iteration limit of {0} reached without a final answer")]
    IterationLimit(usize),

    /// The run outlived its wall-clock budget
    #[error("Deadline of {0:?} exceeded without a final answer")]
    DeadlineExceeded(Duration),
}

impl ExecutorError {
    /// Whether the provider reported throttling
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::Provider(e) if e.is_rate_limit())
    }

    /// Whether a loop limit stopped the run
    pub fn is_limit(&self) -> bool {
        matches!(self, Self::IterationLimit(_) | Self::DeadlineExceeded(_))
    }
}

impl From<ExecutorError> for vantage_core::Error {
    fn from(err: ExecutorError) -> Self {
        match err {
            ExecutorError::Provider(LLMError::RateLimitExceeded(detail)) => {
                Self::RateLimited(detail)
            }
            ExecutorError::Provider(e) => Self::ProcessingFailed(e.to_string()),
            limit @ (ExecutorError::IterationLimit(_) | ExecutorError::DeadlineExceeded(_)) => {
                Self::Aborted(limit.to_string())
            }
        }
    }
}

/// Position of a run in the reason/act cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting on the model
    Reason,
    /// Dispatching the tool calls of the last assistant message
    Act,
    /// Final answer available
    Done,
    /// Stopped by a limit or a provider failure
    Aborted,
}

impl LoopState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Full message sequence, system prompt first
    pub state: AgentState,
    /// Text of the final assistant message
    pub answer: String,
    /// Number of REASON steps taken
    pub iterations: usize,
}

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of REASON steps (prevents infinite loops)
    pub max_iterations: usize,

    /// Wall-clock budget for a whole run
    pub deadline: Duration,

    /// Model to use
    pub model: String,

    /// System prompt, inserted ahead of the conversation when absent
    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature
    pub temperature: Option<f32>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            deadline: Duration::from_secs(120),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            max_tokens: 4096,
            temperature: None,
        }
    }
}

/// Executes an agent loop: LLM → tool calls → execution → loop back
///
/// The executor holds only shared, immutable pieces, so one instance serves
/// any number of concurrent runs; each run owns its [`AgentState`].
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
}

impl AgentExecutor {
    /// Create a new agent executor
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            config,
            event_handler: None,
        }
    }

    /// Create a builder
    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder::new()
    }

    /// Set the event handler for receiving execution events
    pub fn with_event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn tool_registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// Run a fresh conversation seeded with one user message
    ///
    /// # Returns
    ///
    /// The text of the final assistant message, unchanged
    pub async fn run(&self, user_message: impl Into<String>) -> Result<String, ExecutorError> {
        self.run_state(AgentState::new(user_message))
            .await
            .map(|outcome| outcome.answer)
    }

    /// Run the loop over an existing state, returning the final sequence
    pub async fn run_state(&self, state: AgentState) -> Result<Outcome, ExecutorError> {
        self.run_state_with_handler(state, self.event_handler.clone())
            .await
    }

    /// Run the loop with a per-request event handler
    pub async fn run_state_with_handler(
        &self,
        mut state: AgentState,
        event_handler: Option<Arc<dyn ExecutorEventHandler>>,
    ) -> Result<Outcome, ExecutorError> {
        if let Some(prompt) = &self.config.system_prompt {
            if state.ensure_system_prompt(prompt) {
                debug!("System prompt inserted");
            }
        }

        let deadline = Instant::now() + self.config.deadline;
        let tools = self.tool_registry.definitions();
        let mut iterations = 0;
        let mut failure = None;
        let mut loop_state = LoopState::Reason;

        while !loop_state.is_terminal() {
            loop_state = match loop_state {
                LoopState::Reason => {
                    iterations += 1;
                    match self.reason(&mut state, &tools, iterations, deadline).await {
                        Ok(next) => next,
                        Err(e) => {
                            failure = Some(e);
                            LoopState::Aborted
                        }
                    }
                }
                LoopState::Act => {
                    self.act(&mut state, event_handler.as_ref()).await;
                    LoopState::Reason
                }
                terminal => terminal,
            };
        }

        if let Some(err) = failure {
            warn!(iterations, error = %err, "Agent run aborted");
            if let Some(handler) = &event_handler {
                handler.on_error(&err.to_string()).await;
            }
            return Err(err);
        }

        let answer = state.last_assistant_text().unwrap_or_default().to_string();
        info!(
            iterations,
            response_length = answer.len(),
            "Agent completed naturally"
        );
        if let Some(handler) = &event_handler {
            handler.on_complete(&answer).await;
        }

        Ok(Outcome {
            state,
            answer,
            iterations,
        })
    }

    /// One REASON step: ask the model and append its reply
    async fn reason(
        &self,
        state: &mut AgentState,
        tools: &[ToolDefinition],
        iteration: usize,
        deadline: Instant,
    ) -> Result<LoopState, ExecutorError> {
        if iteration > self.config.max_iterations {
            return Err(ExecutorError::IterationLimit(self.config.max_iterations));
        }
        if Instant::now() >= deadline {
            return Err(ExecutorError::DeadlineExceeded(self.config.deadline));
        }

        info!(
            iteration,
            max_iterations = self.config.max_iterations,
            model = %self.config.model,
            message_count = state.len(),
            tool_count = tools.len(),
            "Agent iteration started"
        );

        let request = CompletionRequest::builder(&self.config.model)
            .messages(state.messages().to_vec())
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .tools(tools.to_vec())
            .build();

        let response = tokio::time::timeout_at(deadline, self.provider.complete(request))
            .await
            .map_err(|_| ExecutorError::DeadlineExceeded(self.config.deadline))??;

        info!(
            stop_reason = ?response.stop_reason,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "LLM response received"
        );

        let preview: String = response
            .message
            .text()
            .unwrap_or("")
            .chars()
            .take(300)
            .collect();
        debug!(response_preview = %preview, "LLM response content preview");

        let next = if response.message.has_tool_calls() {
            LoopState::Act
        } else {
            LoopState::Done
        };
        state.push(response.message);
        Ok(next)
    }

    /// One ACT step: answer every tool call of the last message, in order
    async fn act(
        &self,
        state: &mut AgentState,
        event_handler: Option<&Arc<dyn ExecutorEventHandler>>,
    ) {
        let calls = state.last().map(Message::tool_calls).unwrap_or_default();
        info!(tool_count = calls.len(), "Agent requested tool use");

        for call in calls {
            let message = self.dispatch(&call, event_handler).await;
            state.push(message);
        }
    }

    async fn dispatch(
        &self,
        call: &ToolCall,
        event_handler: Option<&Arc<dyn ExecutorEventHandler>>,
    ) -> Message {
        let input_preview: String = call.arguments.to_string().chars().take(500).collect();
        info!(
            tool_name = %call.name,
            tool_id = %call.id,
            input_preview = %input_preview,
            "Executing tool"
        );

        if let Some(handler) = event_handler {
            handler
                .on_tool_start(&call.id, &call.name, &call.arguments)
                .await;
        }

        let start_time = std::time::Instant::now();
        let (output, known) = match self.tool_registry.get(&call.name) {
            Some(tool) => (tool.execute(call.arguments.clone()).await, true),
            None => {
                warn!(tool_name = %call.name, "Model requested an unknown tool");
                (format!("Error: unknown tool '{}'", call.name), false)
            }
        };
        let duration_ms = start_time.elapsed().as_millis() as u64;

        let result_preview: String = output.chars().take(500).collect();
        info!(
            tool_name = %call.name,
            duration_ms,
            result_length = output.len(),
            result_preview = %result_preview,
            "Tool execution finished"
        );

        if let Some(handler) = event_handler {
            handler
                .on_tool_done(&call.id, &call.name, &output, duration_ms)
                .await;
        }

        if known {
            Message::tool_result(call.id.clone(), output)
        } else {
            Message::tool_error(call.id.clone(), output)
        }
    }
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
    event_handler: Option<Arc<dyn ExecutorEventHandler>>,
}

impl AgentExecutorBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: Arc::new(ToolRegistry::new()),
            config: ExecutorConfig::default(),
            event_handler: None,
        }
    }

    /// Set the LLM provider
    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the tool registry
    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = registry;
        self
    }

    /// Set the full configuration
    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set maximum iterations
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the wall-clock budget for a run
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.config.deadline = deadline;
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    pub fn event_handler(mut self, handler: Arc<dyn ExecutorEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Build the executor
    pub fn build(self) -> vantage_core::Result<AgentExecutor> {
        let provider = self.provider.ok_or_else(|| {
            vantage_core::Error::InitializationFailed("Provider not set".to_string())
        })?;
        if self.config.max_iterations == 0 {
            return Err(vantage_core::Error::InitializationFailed(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        Ok(AgentExecutor {
            provider,
            tool_registry: self.tool_registry,
            config: self.config,
            event_handler: self.event_handler,
        })
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use vantage_llm::{CompletionResponse, Role};
    use vantage_tools::Tool;

    /// Replays a fixed list of model replies and records every request
    struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<Message, LLMError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<Message, LLMError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> vantage_llm::Result<CompletionResponse> {
            self.requests.lock().unwrap().push(request);
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LLMError::UnexpectedResponse("script exhausted".into())));
            reply.map(CompletionResponse::from_message)
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl LLMProvider for SlowProvider {
        async fn complete(&self, _request: CompletionRequest) -> vantage_llm::Result<CompletionResponse> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(CompletionResponse::from_message(Message::assistant("too late")))
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        async fn execute(&self, params: Value) -> String {
            format!("echo:{}", params["text"].as_str().unwrap_or_default())
        }

        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the text argument"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }
    }

    /// Tool with typed arguments, reporting bad ones as text
    struct LookupTool;

    #[async_trait]
    impl Tool for LookupTool {
        async fn execute(&self, params: Value) -> String {
            match vantage_tools::parse_args::<serde_json::Map<String, Value>>(self.name(), params) {
                Ok(args) => format!("found {}", args.get("symbol").unwrap_or(&Value::Null)),
                Err(msg) => msg,
            }
        }

        fn name(&self) -> &str {
            "lookup"
        }

        fn description(&self) -> &str {
            "Look up a symbol"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {"symbol": {"type": "string"}}})
        }
    }

    #[derive(Default)]
    struct RecordingHandler {
        events: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ExecutorEventHandler for RecordingHandler {
        async fn on_tool_start(&self, id: &str, name: &str, _input: &Value) {
            self.events.lock().unwrap().push(format!("start {id} {name}"));
        }

        async fn on_tool_done(&self, id: &str, _name: &str, result: &str, _duration_ms: u64) {
            self.events.lock().unwrap().push(format!("done {id} {result}"));
        }

        async fn on_complete(&self, result: &str) {
            self.events.lock().unwrap().push(format!("complete {result}"));
        }

        async fn on_error(&self, _error: &str) {
            self.events.lock().unwrap().push("error".to_string());
        }
    }

    fn registry() -> Arc<ToolRegistry> {
        Arc::new(ToolRegistry::builder().register(Arc::new(EchoTool)).build())
    }

    fn executor(provider: Arc<dyn LLMProvider>) -> AgentExecutor {
        AgentExecutor::builder()
            .provider(provider)
            .tool_registry(registry())
            .system_prompt("You are a test agent")
            .build()
            .unwrap()
    }

    fn call(id: &str, name: &str, text: &str) -> ToolCall {
        ToolCall::new(id, name, json!({"text": text}))
    }

    #[test]
    fn test_builder() {
        let builder = AgentExecutorBuilder::new()
            .model("test-model")
            .max_iterations(5)
            .deadline(Duration::from_secs(3))
            .system_prompt("Test prompt");

        assert_eq!(builder.config.model, "test-model");
        assert_eq!(builder.config.max_iterations, 5);
        assert_eq!(builder.config.deadline, Duration::from_secs(3));
        assert_eq!(builder.config.system_prompt, Some("Test prompt".to_string()));
    }

    #[test]
    fn test_builder_requires_provider() {
        let result = AgentExecutorBuilder::new().build();
        assert!(matches!(
            result,
            Err(vantage_core::Error::InitializationFailed(_))
        ));
    }

    #[test]
    fn test_default_config() {
        let config = ExecutorConfig::default();
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.deadline, Duration::from_secs(120));
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_no_tool_calls_finishes_immediately() {
        let provider = ScriptedProvider::new(vec![Ok(Message::assistant("  Markets look calm.\n"))]);
        let outcome = executor(provider.clone())
            .run_state(AgentState::new("hello"))
            .await
            .unwrap();

        assert_eq!(outcome.answer, "  Markets look calm.\n");
        assert_eq!(outcome.iterations, 1);
        let roles: Vec<_> = outcome.state.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_tool_results_appended_in_order_before_next_reason() {
        let provider = ScriptedProvider::new(vec![
            Ok(Message::assistant_with_tool_calls(
                "",
                vec![call("c1", "echo", "one"), call("c2", "echo", "two")],
            )),
            Ok(Message::assistant("done")),
        ]);
        let outcome = executor(provider.clone())
            .run_state(AgentState::new("go"))
            .await
            .unwrap();

        let messages = outcome.state.messages();
        assert_eq!(messages.len(), 6);
        assert_eq!(messages[3].role, Role::Tool);
        assert_eq!(messages[3].tool_call_id(), Some("c1"));
        assert_eq!(messages[3].text(), Some("echo:one"));
        assert_eq!(messages[4].tool_call_id(), Some("c2"));
        assert_eq!(messages[4].text(), Some("echo:two"));
        assert_eq!(outcome.answer, "done");

        // The second request already carries both results
        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].messages.len(), 5);
        assert_eq!(requests[1].messages[0].role, Role::System);
        assert_eq!(requests[1].tools.len(), 1);
        assert_eq!(requests[1].tools[0].name, "echo");
    }

    #[tokio::test]
    async fn test_replay_is_deterministic() {
        let script = || {
            vec![
                Ok(Message::assistant_with_tool_calls("", vec![call("c1", "echo", "x")])),
                Ok(Message::assistant("final")),
            ]
        };

        let first = executor(ScriptedProvider::new(script()))
            .run_state(AgentState::new("q"))
            .await
            .unwrap();
        let second = executor(ScriptedProvider::new(script()))
            .run_state(AgentState::new("q"))
            .await
            .unwrap();

        assert_eq!(first.state, second.state);
    }

    #[tokio::test]
    async fn test_system_prompt_not_duplicated() {
        let provider = ScriptedProvider::new(vec![Ok(Message::assistant("ok"))]);
        let state =
            AgentState::from_messages(vec![Message::system("existing"), Message::user("hi")]);
        let outcome = executor(provider).run_state(state).await.unwrap();

        let systems = outcome
            .state
            .messages()
            .iter()
            .filter(|m| m.role == Role::System)
            .count();
        assert_eq!(systems, 1);
        assert_eq!(outcome.state.messages()[0].text(), Some("existing"));
    }

    #[tokio::test]
    async fn test_unknown_tool_answered_with_error_text() {
        let provider = ScriptedProvider::new(vec![
            Ok(Message::assistant_with_tool_calls(
                "",
                vec![call("c1", "place_order", "buy")],
            )),
            Ok(Message::assistant("sorry")),
        ]);
        let outcome = executor(provider).run_state(AgentState::new("buy")).await.unwrap();

        let tool_msg = &outcome.state.messages()[3];
        assert_eq!(tool_msg.tool_call_id(), Some("c1"));
        assert_eq!(tool_msg.text(), Some("Error: unknown tool 'place_order'"));
        assert_eq!(outcome.answer, "sorry");
    }

    #[tokio::test]
    async fn test_unparsable_arguments_reach_model_as_text() {
        let truncated = Value::String(r#"{"symbol": "TCS.NS""#.to_string());
        let provider = ScriptedProvider::new(vec![
            Ok(Message::assistant_with_tool_calls(
                "",
                vec![ToolCall::new("c1", "lookup", truncated)],
            )),
            Ok(Message::assistant_with_tool_calls(
                "",
                vec![ToolCall::new("c2", "lookup", json!({"symbol": "TCS.NS"}))],
            )),
            Ok(Message::assistant("TCS.NS found")),
        ]);
        let executor = AgentExecutor::builder()
            .provider(provider)
            .tool_registry(Arc::new(
                ToolRegistry::builder().register(Arc::new(LookupTool)).build(),
            ))
            .system_prompt("You are a test agent")
            .build()
            .unwrap();

        let outcome = executor.run_state(AgentState::new("look up TCS")).await.unwrap();

        assert_eq!(outcome.answer, "TCS.NS found");
        assert_eq!(outcome.iterations, 3);
        let messages = outcome.state.messages();
        assert_eq!(messages[3].tool_call_id(), Some("c1"));
        assert!(
            messages[3]
                .text()
                .unwrap()
                .starts_with("Invalid arguments for lookup")
        );
        assert_eq!(messages[5].text(), Some("found \"TCS.NS\""));
    }

    #[tokio::test]
    async fn test_iteration_limit_aborts() {
        let replies = (0..5)
            .map(|i| {
                Ok(Message::assistant_with_tool_calls(
                    "",
                    vec![call(&format!("c{i}"), "echo", "again")],
                ))
            })
            .collect();
        let provider = ScriptedProvider::new(replies);
        let executor = AgentExecutor::builder()
            .provider(provider.clone())
            .tool_registry(registry())
            .max_iterations(3)
            .build()
            .unwrap();

        let err = executor.run("loop forever").await.unwrap_err();
        assert!(matches!(err, ExecutorError::IterationLimit(3)));
        assert!(err.is_limit());
        assert_eq!(provider.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_zero_deadline_aborts_before_reasoning() {
        let provider = ScriptedProvider::new(vec![Ok(Message::assistant("never"))]);
        let executor = AgentExecutor::builder()
            .provider(provider.clone())
            .deadline(Duration::ZERO)
            .build()
            .unwrap();

        let err = executor.run("hi").await.unwrap_err();
        assert!(matches!(err, ExecutorError::DeadlineExceeded(_)));
        assert!(provider.requests().is_empty());
    }

    #[tokio::test]
    async fn test_deadline_interrupts_slow_provider() {
        let executor = AgentExecutor::builder()
            .provider(Arc::new(SlowProvider))
            .deadline(Duration::from_millis(20))
            .build()
            .unwrap();

        let err = executor.run("hi").await.unwrap_err();
        assert!(matches!(err, ExecutorError::DeadlineExceeded(_)));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = ScriptedProvider::new(vec![Err(LLMError::RateLimitExceeded(
            "free-models-per-min".into(),
        ))]);
        let err = executor(provider).run("hi").await.unwrap_err();

        assert!(err.is_rate_limit());
        let core: vantage_core::Error = err.into();
        assert!(matches!(core, vantage_core::Error::RateLimited(_)));
        assert!(core.is_rate_limited());
    }

    #[test]
    fn test_limit_errors_convert_to_aborted() {
        let core: vantage_core::Error = ExecutorError::IterationLimit(10).into();
        assert!(matches!(core, vantage_core::Error::Aborted(_)));
        assert!(!core.is_rate_limited());
    }

    #[tokio::test]
    async fn test_event_handler_sees_tool_lifecycle() {
        let provider = ScriptedProvider::new(vec![
            Ok(Message::assistant_with_tool_calls("", vec![call("c1", "echo", "hi")])),
            Ok(Message::assistant("bye")),
        ]);
        let handler = Arc::new(RecordingHandler::default());
        let executor = executor(provider).with_event_handler(handler.clone());

        executor.run("hi").await.unwrap();

        let events = handler.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec!["start c1 echo", "done c1 echo:hi", "complete bye"]
        );
    }
}
