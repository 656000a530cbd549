//! Notification module.
//!
//! Delivers composed messages to a single Telegram chat via the Bot API.

mod telegram;

pub use telegram::{NotifyError, TelegramNotifier};
