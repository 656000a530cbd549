//! Poller state management.

use std::time::{SystemTime, UNIX_EPOCH};

/// Gets current Unix timestamp in seconds.
fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// In-memory state owned by the poll loop.
///
/// Holds the `from_date` cursor for the next fetch window and the status
/// of the most recently notified homework. The state lives only in process
/// memory: on restart the cursor resets to the current time and the first
/// observed status is notified again.
#[derive(Debug, Clone)]
pub struct PollerState {
    /// Lower bound of the next fetch window (Unix seconds).
    cursor: u64,

    /// Status of the most recently notified homework.
    last_notified: Option<String>,
}

impl PollerState {
    /// Creates state with the cursor set to the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_cursor(now_unix())
    }

    /// Creates state with an explicit cursor.
    #[must_use]
    pub const fn with_cursor(cursor: u64) -> Self {
        Self {
            cursor,
            last_notified: None,
        }
    }

    /// Returns the current fetch cursor.
    #[must_use]
    pub const fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Checks whether a status differs from the last notified one.
    ///
    /// Consecutive identical statuses never re-trigger a send.
    #[must_use]
    pub fn is_new_status(&self, status: &str) -> bool {
        self.last_notified.as_deref() != Some(status)
    }

    /// Records a successful notification and advances the cursor.
    pub fn record_notified(&mut self, status: &str, cursor: u64) {
        self.last_notified = Some(status.to_owned());
        self.cursor = cursor;
    }
}

impl Default for PollerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_treats_any_status_as_new() {
        let state = PollerState::with_cursor(0);
        assert!(state.is_new_status("approved"));
        assert!(state.is_new_status("rejected"));
    }

    #[test]
    fn test_duplicate_status_is_suppressed() {
        let mut state = PollerState::with_cursor(0);

        // First cycle: the status is new, one notification goes out.
        assert!(state.is_new_status("reviewing"));
        state.record_notified("reviewing", 1000);

        // Second cycle with the same status: nothing to send.
        assert!(!state.is_new_status("reviewing"));
    }

    #[test]
    fn test_changed_status_notifies_again() {
        let mut state = PollerState::with_cursor(0);
        state.record_notified("reviewing", 1000);
        assert!(state.is_new_status("approved"));

        state.record_notified("approved", 2000);
        assert!(!state.is_new_status("approved"));
        assert!(state.is_new_status("reviewing"));
    }

    #[test]
    fn test_cursor_advances_only_on_notification() {
        let mut state = PollerState::with_cursor(500);
        assert_eq!(state.cursor(), 500);

        state.record_notified("approved", 1500);
        assert_eq!(state.cursor(), 1500);
    }

    #[test]
    fn test_new_initializes_cursor_to_now() {
        let state = PollerState::new();
        assert!(state.cursor() > 0);
        assert!(state.is_new_status("approved"));
    }
}
