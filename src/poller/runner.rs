//! Homework poller runner.
//!
//! Each cycle runs the three-stage pipeline:
//! 1. Fetch updates newer than the cursor
//! 2. Validate the response shape and take the most recent homework
//! 3. Translate its status into a notification sentence
//!
//! The message is sent only when the status differs from the last notified
//! one; the cursor and state advance only after a successful send. Every
//! cycle error is reported to the chat as a failure alert and the loop
//! keeps running. A duplicate status is a no-change event, never a reason
//! to stop polling.

use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::api::{check_response, extract_cursor, ApiError, PracticumClient, ResponseError};
use crate::notify::{NotifyError, TelegramNotifier};
use crate::status::{parse_status, StatusError};

use super::PollerState;

/// Messages that can be sent to the poller.
#[derive(Debug, Clone)]
pub enum PollerMessage {
    /// Trigger an immediate poll cycle.
    TriggerPoll,
    /// Stop the poller.
    Shutdown,
}

/// Errors a single poll cycle can produce.
///
/// All of them are non-fatal: the loop logs the cause, alerts the chat
/// best-effort and retries on the next scheduled cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Response(#[from] ResponseError),

    #[error(transparent)]
    Status(#[from] StatusError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Outcome of a successful poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A status change was notified.
    Notified,
    /// The status matches the last notified one; nothing was sent.
    NoChange,
    /// No homework updates in the fetch window.
    Idle,
}

/// Homework status poller.
pub struct HomeworkPoller {
    /// Review API client.
    client: PracticumClient,

    /// Chat notifier.
    notifier: TelegramNotifier,

    /// Cursor and duplicate-suppression state, owned exclusively here.
    state: PollerState,

    /// Interval between poll cycles.
    poll_interval: Duration,
}

impl HomeworkPoller {
    /// Creates a new homework poller.
    #[must_use]
    pub const fn new(
        client: PracticumClient,
        notifier: TelegramNotifier,
        state: PollerState,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client,
            notifier,
            state,
            poll_interval,
        }
    }

    /// Runs the polling loop until a shutdown message arrives.
    ///
    /// The first cycle runs immediately, then one per interval.
    pub async fn run(mut self, mut rx: mpsc::Receiver<PollerMessage>) {
        info!(
            "Homework poller started (interval: {:?})",
            self.poll_interval
        );

        let mut timer = interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.poll_once().await;
                }
                msg = rx.recv() => {
                    match msg {
                        Some(PollerMessage::TriggerPoll) => {
                            debug!("Received trigger poll message");
                            self.poll_once().await;
                        }
                        Some(PollerMessage::Shutdown) | None => {
                            info!("Poller shutting down");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Runs one cycle and reports failures to the chat.
    async fn poll_once(&mut self) {
        match self.tick().await {
            Ok(CycleOutcome::Notified) => {
                info!("Status change notified, next poll from {}", self.state.cursor());
            }
            Ok(CycleOutcome::NoChange) => {
                info!("Homework status unchanged, nothing to send");
            }
            Ok(CycleOutcome::Idle) => {
                debug!("No homework updates this cycle");
            }
            Err(err) => {
                error!("Poll cycle failed: {err}");
                let alert = format!("Сбой в работе программы: {err}");
                // A failure while reporting a failure is logged and swallowed
                // so the loop outlives it.
                if let Err(send_err) = self.notifier.send_message(&alert).await {
                    warn!("Failed to deliver failure alert: {send_err}");
                }
            }
        }
    }

    /// Single fetch-validate-translate-notify cycle.
    async fn tick(&mut self) -> Result<CycleOutcome, CycleError> {
        let response = self.client.fetch_updates(self.state.cursor()).await?;

        let Some(homework) = check_response(&response)? else {
            return Ok(CycleOutcome::Idle);
        };

        let update = parse_status(homework)?;

        if !self.state.is_new_status(update.status.as_str()) {
            return Ok(CycleOutcome::NoChange);
        }

        let next_cursor = extract_cursor(&response)?;

        self.notifier.send_message(&update.message()).await?;
        self.state.record_notified(update.status.as_str(), next_cursor);

        Ok(CycleOutcome::Notified)
    }

    /// Gets a reference to the poller state.
    #[must_use]
    pub const fn state(&self) -> &PollerState {
        &self.state
    }
}

impl std::fmt::Debug for HomeworkPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HomeworkPoller")
            .field("poll_interval", &self.poll_interval)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::api::check_response;
    use crate::status::parse_status;

    use super::*;

    /// Replays the decision half of `tick` against a canned response.
    fn decide(state: &PollerState, response: &serde_json::Value) -> Result<CycleOutcome, CycleError> {
        let Some(homework) = check_response(response)? else {
            return Ok(CycleOutcome::Idle);
        };
        let update = parse_status(homework)?;
        if state.is_new_status(update.status.as_str()) {
            Ok(CycleOutcome::Notified)
        } else {
            Ok(CycleOutcome::NoChange)
        }
    }

    #[test]
    fn test_empty_homeworks_is_idle() {
        let state = PollerState::with_cursor(0);
        let response = json!({"homeworks": [], "current_date": 1000});
        assert!(matches!(decide(&state, &response), Ok(CycleOutcome::Idle)));
    }

    #[test]
    fn test_same_status_twice_notifies_once() {
        let mut state = PollerState::with_cursor(0);
        let response = json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 1000
        });

        // First cycle notifies and records.
        assert!(matches!(
            decide(&state, &response),
            Ok(CycleOutcome::Notified)
        ));
        state.record_notified("approved", 1000);

        // Second cycle with the same status is a no-change event.
        assert!(matches!(
            decide(&state, &response),
            Ok(CycleOutcome::NoChange)
        ));
    }

    #[test]
    fn test_malformed_homeworks_is_a_cycle_error() {
        let state = PollerState::with_cursor(0);
        let response = json!({"homeworks": "not-a-list", "current_date": 1000});
        assert!(matches!(
            decide(&state, &response),
            Err(CycleError::Response(_))
        ));
    }

    #[test]
    fn test_unknown_status_is_a_cycle_error() {
        let state = PollerState::with_cursor(0);
        let response = json!({
            "homeworks": [{"homework_name": "hw1", "status": "paused"}],
            "current_date": 1000
        });
        assert!(matches!(
            decide(&state, &response),
            Err(CycleError::Status(_))
        ));
    }

    #[test]
    fn test_failure_alert_format() {
        let Err(shape_err) = check_response(&json!(42)) else {
            panic!("non-object must fail validation");
        };
        let err = CycleError::Response(shape_err);
        let alert = format!("Сбой в работе программы: {err}");
        assert!(alert.starts_with("Сбой в работе программы: "));
        assert!(alert.contains("42"));
    }
}
