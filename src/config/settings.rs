//! Credentials and application settings.

use serde::{Deserialize, Serialize};

use super::{DEFAULT_ENDPOINT, DEFAULT_POLL_INTERVAL_SECS};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid poll interval (must be a positive number of seconds)")]
    InvalidPollInterval,
}

/// The three secrets the bot needs, read once at startup.
///
/// Immutable for the lifetime of the process; components borrow what they
/// need instead of reading the environment themselves.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Bearer token for the homework review API.
    pub practicum_token: String,

    /// Telegram Bot API token.
    pub telegram_token: String,

    /// Destination chat identifier (numeric id or `@channel` name).
    pub chat_id: String,
}

impl Credentials {
    /// Creates credentials from explicit values.
    #[must_use]
    pub const fn new(practicum_token: String, telegram_token: String, chat_id: String) -> Self {
        Self {
            practicum_token,
            telegram_token,
            chat_id,
        }
    }

    /// Creates credentials from environment variables.
    ///
    /// Expects `TOKEN_PRACTICUM`, `TOKEN_TELEGRAM` and `TELEGRAM_CHAT_ID`
    /// to be set and non-empty.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first variable that is missing or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            practicum_token: require_env("TOKEN_PRACTICUM")?,
            telegram_token: require_env("TOKEN_TELEGRAM")?,
            chat_id: require_env("TELEGRAM_CHAT_ID")?,
        })
    }
}

/// Reads a required environment variable, treating empty values as missing.
fn require_env(name: &'static str) -> Result<String, ConfigError> {
    require_value(name, std::env::var(name).ok())
}

/// Rejects absent and blank values with the variable name attached.
fn require_value(name: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingEnvVar(name))
}

/// Bot-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// Homework status endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Interval between poll cycles in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Timeout for a single HTTP request in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_owned()
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: default_request_timeout(),
            log_level: default_log_level(),
        }
    }
}

impl BotSettings {
    /// Creates bot settings from environment variables with defaults.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self {
            endpoint: std::env::var("PRACTICUM_ENDPOINT")
                .unwrap_or_else(|_| default_endpoint()),
            poll_interval_secs: std::env::var("POLL_INTERVAL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_poll_interval),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_request_timeout),
            log_level: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| default_log_level()),
        }
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the poll interval is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }
        Ok(())
    }
}
