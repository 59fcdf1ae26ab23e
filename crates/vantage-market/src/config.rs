//! Configuration for market data and the HTTP server

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use vantage_runtime::ExecutorConfig;
use vantage_utils::{ConfigError, LogFormat, env_or, env_parse};

/// Default OpenAI-compatible endpoint
pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Default model id
pub const DEFAULT_MODEL: &str = vantage_runtime::executor::DEFAULT_MODEL;

/// Configuration for market data operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Cache TTL for real-time data (quotes, price history)
    pub cache_ttl_realtime: Duration,

    /// Cache TTL for fundamental data
    pub cache_ttl_fundamental: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Alpha Vantage API key (optional, fundamentals fallback)
    pub alpha_vantage_api_key: Option<String>,

    /// Alpha Vantage requests per minute
    pub alpha_vantage_rate_limit: u32,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            cache_ttl_realtime: Duration::from_secs(60),       // 1 minute
            cache_ttl_fundamental: Duration::from_secs(3600),  // 1 hour
            request_timeout: Duration::from_secs(30),
            alpha_vantage_api_key: None,
            alpha_vantage_rate_limit: 5, // free tier
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self
            .alpha_vantage_api_key
            .as_deref()
            .is_some_and(|k| k.trim().is_empty())
        {
            return Err(StockError::ConfigError(
                "Alpha Vantage API key must not be blank".to_string(),
            ));
        }

        if self.alpha_vantage_rate_limit == 0 {
            return Err(StockError::ConfigError(
                "alpha_vantage_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.cache_ttl_realtime.is_zero() || self.cache_ttl_fundamental.is_zero() {
            return Err(StockError::ConfigError(
                "cache TTLs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    cache_ttl_realtime: Option<Duration>,
    cache_ttl_fundamental: Option<Duration>,
    request_timeout: Option<Duration>,
    alpha_vantage_api_key: Option<String>,
    alpha_vantage_rate_limit: Option<u32>,
}

impl StockConfigBuilder {
    /// Set cache TTL for real-time data
    pub fn cache_ttl_realtime(mut self, duration: Duration) -> Self {
        self.cache_ttl_realtime = Some(duration);
        self
    }

    /// Set cache TTL for fundamental data
    pub fn cache_ttl_fundamental(mut self, duration: Duration) -> Self {
        self.cache_ttl_fundamental = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set the Alpha Vantage request budget per minute
    pub fn alpha_vantage_rate_limit(mut self, per_minute: u32) -> Self {
        self.alpha_vantage_rate_limit = Some(per_minute);
        self
    }

    /// Load Alpha Vantage API key from environment
    pub fn with_env_api_key(mut self) -> Self {
        if let Ok(key) = std::env::var("ALPHA_VANTAGE_API_KEY") {
            if !key.trim().is_empty() {
                self.alpha_vantage_api_key = Some(key);
            }
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            cache_ttl_realtime: self.cache_ttl_realtime.unwrap_or(defaults.cache_ttl_realtime),
            cache_ttl_fundamental: self
                .cache_ttl_fundamental
                .unwrap_or(defaults.cache_ttl_fundamental),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            alpha_vantage_rate_limit: self
                .alpha_vantage_rate_limit
                .unwrap_or(defaults.alpha_vantage_rate_limit),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Settings for the HTTP server and the agent behind it
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// LLM credentials
    pub api_key: String,
    /// OpenAI-compatible endpoint
    pub api_base: String,
    /// Model id
    pub model: String,
    /// Step cap for one agent run
    pub max_iterations: usize,
    /// Wall-clock cap for one agent run
    pub deadline: Duration,
    /// Completion token cap
    pub max_tokens: usize,
    /// HTTP timeout for a single LLM call
    pub llm_timeout: Duration,
    /// Log line format
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_iterations: 10,
            deadline: Duration::from_secs(120),
            max_tokens: 4096,
            llm_timeout: Duration::from_secs(120),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Read the configuration from the process environment
    ///
    /// `OPENROUTER_API_KEY` wins over `OPENAI_API_KEY`; one of them is required.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_key = ["OPENROUTER_API_KEY", "OPENAI_API_KEY"]
            .iter()
            .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?;

        Ok(Self {
            host: env_or("VANTAGE_HOST", &defaults.host),
            port: env_parse("VANTAGE_PORT", defaults.port)?,
            api_key,
            api_base: env_or("OPENAI_API_BASE", &defaults.api_base),
            model: env_or("VANTAGE_MODEL", &defaults.model),
            max_iterations: env_parse("VANTAGE_MAX_ITERATIONS", defaults.max_iterations)?,
            deadline: Duration::from_secs(env_parse(
                "VANTAGE_DEADLINE_SECS",
                defaults.deadline.as_secs(),
            )?),
            max_tokens: env_parse("VANTAGE_MAX_TOKENS", defaults.max_tokens)?,
            llm_timeout: defaults.llm_timeout,
            log_format: env_parse("VANTAGE_LOG_FORMAT", defaults.log_format)?,
        })
    }

    /// Address string suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Executor settings derived from this configuration
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            max_iterations: self.max_iterations,
            deadline: self.deadline,
            model: self.model.clone(),
            system_prompt: Some(crate::prompts::SYSTEM_PROMPT.to_string()),
            max_tokens: self.max_tokens,
            temperature: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const SERVER_VARS: &[&str] = &[
        "OPENROUTER_API_KEY",
        "OPENAI_API_KEY",
        "OPENAI_API_BASE",
        "VANTAGE_HOST",
        "VANTAGE_PORT",
        "VANTAGE_MODEL",
        "VANTAGE_MAX_ITERATIONS",
        "VANTAGE_DEADLINE_SECS",
        "VANTAGE_MAX_TOKENS",
        "VANTAGE_LOG_FORMAT",
    ];

    fn clear_server_env() {
        for key in SERVER_VARS {
            unsafe { std::env::remove_var(key) };
        }
    }

    #[test]
    fn test_default_config() {
        let config = StockConfig::default();
        assert_eq!(config.cache_ttl_realtime, Duration::from_secs(60));
        assert_eq!(config.cache_ttl_fundamental, Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = StockConfig::builder()
            .alpha_vantage_api_key("demo")
            .alpha_vantage_rate_limit(75)
            .request_timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.alpha_vantage_api_key.as_deref(), Some("demo"));
        assert_eq!(config.alpha_vantage_rate_limit, 75);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_validation_rejects_blank_key_and_zero_limit() {
        let config = StockConfig {
            alpha_vantage_api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        assert!(StockConfig::builder().alpha_vantage_rate_limit(0).build().is_err());
    }

    #[test]
    #[serial]
    fn test_server_config_requires_api_key() {
        clear_server_env();
        let err = ServerConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        clear_server_env();
        unsafe { std::env::set_var("OPENAI_API_KEY", "sk-test") };

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, "tngtech/deepseek-r1t2-chimera:free");
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.deadline, Duration::from_secs(120));
        assert_eq!(config.log_format, LogFormat::Pretty);

        clear_server_env();
    }

    #[test]
    #[serial]
    fn test_server_config_overrides() {
        clear_server_env();
        unsafe {
            std::env::set_var("OPENAI_API_KEY", "sk-openai");
            std::env::set_var("OPENROUTER_API_KEY", "sk-or");
            std::env::set_var("VANTAGE_PORT", "9001");
            std::env::set_var("VANTAGE_MAX_ITERATIONS", "4");
            std::env::set_var("VANTAGE_LOG_FORMAT", "json");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.api_key, "sk-or");
        assert_eq!(config.port, 9001);
        assert_eq!(config.max_iterations, 4);
        assert_eq!(config.log_format, LogFormat::Json);

        let executor = config.executor_config();
        assert_eq!(executor.max_iterations, 4);
        assert!(executor.system_prompt.is_some_and(|p| p.contains("VANTAGE")));

        clear_server_env();
    }

    #[test]
    #[serial]
    fn test_server_config_rejects_bad_port() {
        clear_server_env();
        unsafe {
            std::env::set_var("OPENAI_API_KEY", "sk-test");
            std::env::set_var("VANTAGE_PORT", "not-a-port");
        }

        let err = ServerConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "VANTAGE_PORT"));

        clear_server_env();
    }
}
