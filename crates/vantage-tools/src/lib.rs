//! Tool management and dispatch framework for Vantage
//!
//! This crate provides the [`Tool`] capability interface and the
//! [`ToolRegistry`] the agent loop dispatches model tool calls through.

pub mod registry;
pub mod tool;

pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use tool::{Tool, parse_args};
