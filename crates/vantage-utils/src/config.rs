//! Configuration helpers
//!
//! Configuration is read from the process environment exactly once at
//! startup and then carried around in explicit structs. These helpers keep
//! the parsing rules in one place.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// A variable is set but cannot be parsed
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// Variable name
        key: String,
        /// Raw value found in the environment
        value: String,
    },
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, colored output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                key: "log format".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// What happened when looking for a `.env` file
///
/// `.env` is read before the log format is known, so the outcome is kept
/// and reported with [`DotenvOutcome::log`] once tracing is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvOutcome {
    Loaded(PathBuf),
    NotFound,
    Failed(String),
}

impl DotenvOutcome {
    fn from_result(result: dotenvy::Result<PathBuf>) -> Self {
        match result {
            Ok(path) => Self::Loaded(path),
            Err(e) if e.not_found() => Self::NotFound,
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// Report the outcome through `tracing`
    pub fn log(&self) {
        match self {
            Self::Loaded(path) => tracing::info!(path = %path.display(), "Loaded .env file"),
            Self::NotFound => tracing::debug!("No .env file found"),
            Self::Failed(error) => tracing::warn!(%error, "Failed to load .env file"),
        }
    }
}

/// Load a `.env` file from the working directory or its parents if one exists
pub fn load_dotenv() -> DotenvOutcome {
    DotenvOutcome::from_result(dotenvy::dotenv())
}

/// Read a string variable, falling back to `default` when unset or empty
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Read and parse a variable, falling back to `default` when unset
///
/// A value that is set but unparsable is an error rather than silently
/// replaced by the default.
pub fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            })
        }
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_dotenv_outcome_classification() {
        let loaded = DotenvOutcome::from_result(Ok(PathBuf::from("/srv/vantage/.env")));
        assert_eq!(loaded, DotenvOutcome::Loaded(PathBuf::from("/srv/vantage/.env")));

        let missing = dotenvy::Error::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(DotenvOutcome::from_result(Err(missing)), DotenvOutcome::NotFound);

        let malformed = dotenvy::Error::LineParse("KEY=\"unterminated".to_string(), 4);
        assert!(matches!(
            DotenvOutcome::from_result(Err(malformed)),
            DotenvOutcome::Failed(_)
        ));
    }

    #[test]
    #[serial]
    fn test_env_or_default() {
        unsafe {
            std::env::remove_var("VANTAGE_TEST_STRING");
        }
        assert_eq!(env_or("VANTAGE_TEST_STRING", "fallback"), "fallback");

        unsafe {
            std::env::set_var("VANTAGE_TEST_STRING", "value");
        }
        assert_eq!(env_or("VANTAGE_TEST_STRING", "fallback"), "value");

        unsafe {
            std::env::remove_var("VANTAGE_TEST_STRING");
        }
    }

    #[test]
    #[serial]
    fn test_env_parse() {
        unsafe {
            std::env::set_var("VANTAGE_TEST_NUMBER", "42");
        }
        assert_eq!(env_parse("VANTAGE_TEST_NUMBER", 7_u16).unwrap(), 42);

        unsafe {
            std::env::set_var("VANTAGE_TEST_NUMBER", "not-a-number");
        }
        assert!(env_parse("VANTAGE_TEST_NUMBER", 7_u16).is_err());

        unsafe {
            std::env::remove_var("VANTAGE_TEST_NUMBER");
        }
        assert_eq!(env_parse("VANTAGE_TEST_NUMBER", 7_u16).unwrap(), 7);
    }
}
