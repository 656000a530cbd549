//! Telegram Bot API notifier.

use std::time::Duration;

use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while sending a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to send Telegram message: {0}")]
    Send(#[source] reqwest::Error),

    #[error("Telegram API rejected the message: http code = {status}; content = {body}")]
    Api { status: u16, body: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Sends text messages to one fixed chat.
///
/// Delivery is best-effort: there is no internal retry, the poll loop
/// re-attempts on its next scheduled cycle.
pub struct TelegramNotifier {
    /// The underlying HTTP client, configured with a request timeout.
    http: reqwest::Client,

    /// `sendMessage` endpoint URL (embeds the bot token).
    url: String,

    /// Destination chat identifier.
    chat_id: String,
}

impl TelegramNotifier {
    /// Creates a notifier for the given bot token and chat.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        bot_token: &str,
        chat_id: String,
        request_timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(NotifyError::ClientBuild)?;

        Ok(Self {
            http,
            url: format!("https://api.telegram.org/bot{bot_token}/sendMessage"),
            chat_id,
        })
    }

    /// Sends a text message to the configured chat.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or when the Bot API answers
    /// with a non-success status.
    pub async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        info!("Sending message to chat {}: \"{}\"", self.chat_id, truncate(text, 60));

        let response = self
            .http
            .post(&self.url)
            .json(&json!({
                "chat_id": self.chat_id,
                "text": text,
            }))
            .send()
            .await
            .map_err(NotifyError::Send)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Message delivered to chat {}", self.chat_id);
        Ok(())
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

/// Truncates a string for logging.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_owned()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_bot_token() {
        let Ok(notifier) = TelegramNotifier::new(
            "123456:SECRET",
            "42".to_owned(),
            Duration::from_secs(5),
        ) else {
            panic!("notifier should build");
        };
        let rendered = format!("{notifier:?}");
        assert!(!rendered.contains("SECRET"));
        assert!(rendered.contains("42"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Hello, World!", 5), "Hello...");
    }

    #[tokio::test]
    async fn test_send_error_on_unroutable_endpoint() {
        let Ok(notifier) = TelegramNotifier::new(
            "token",
            "42".to_owned(),
            Duration::from_secs(1),
        ) else {
            panic!("notifier should build");
        };
        // Point the notifier at a closed local port.
        let notifier = TelegramNotifier {
            url: "http://127.0.0.1:1/bottoken/sendMessage".to_owned(),
            ..notifier
        };

        let result = notifier.send_message("hello").await;
        assert!(matches!(result, Err(NotifyError::Send(_))));
    }
}
