//! Agent runtime for executing tool-augmented LLM loops
//!
//! This crate provides the [`AgentExecutor`], which alternates between a
//! model call (reason) and tool dispatch (act) until the model answers
//! without requesting tools, or a configured limit aborts the run.

pub mod executor;
pub mod state;

// Re-export key types
pub use executor::{
    AgentExecutor, AgentExecutorBuilder, ExecutorConfig, ExecutorError, ExecutorEventHandler,
    LoopState, NoOpEventHandler, Outcome,
};
pub use state::AgentState;
