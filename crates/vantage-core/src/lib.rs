//! Core abstractions for the Vantage market agent
//!
//! This crate defines the fundamental trait and error type shared by the
//! runtime, the market tools and the HTTP façade.

pub mod agent;
pub mod error;

pub use agent::Agent;
pub use error::{Error, Result};
