//! Configuration module for the homework bot.
//!
//! Handles loading and validation of credentials and runtime settings
//! from the environment.

mod settings;

pub use settings::{BotSettings, ConfigError, Credentials};

/// Default homework status endpoint.
pub const DEFAULT_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Default interval between poll cycles, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 600;
