//! Shared utilities for Vantage
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup and environment-driven configuration helpers.

pub mod config;
pub mod logging;

pub use config::{ConfigError, DotenvOutcome, LogFormat, env_or, env_parse, load_dotenv};
pub use logging::init_tracing;
