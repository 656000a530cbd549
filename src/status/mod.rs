//! Review status translation.
//!
//! Maps the review verdict codes reported by the API to the fixed
//! human-readable sentences sent to the chat.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while translating a homework record.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("Homework record is missing the \"{0}\" field")]
    MissingField(&'static str),

    #[error("Unrecognized review status: {0}")]
    UnknownStatus(String),
}

/// Recognized review statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    /// The reviewer accepted the work.
    Approved,
    /// The reviewer picked the work up for review.
    Reviewing,
    /// The reviewer returned the work with remarks.
    Rejected,
}

impl HomeworkStatus {
    /// Parses a verdict code reported by the API.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns the verdict code as the API spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Returns the verdict sentence for this status.
    #[must_use]
    pub const fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl std::fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A translated status change for one homework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// Name of the homework as reported by the API.
    pub homework_name: String,

    /// Recognized review status.
    pub status: HomeworkStatus,
}

impl StatusUpdate {
    /// Composes the notification sentence for this update.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Изменился статус проверки работы \"{}\". {}",
            self.homework_name,
            self.status.verdict()
        )
    }
}

/// Extracts the name and status from a homework record.
///
/// # Errors
///
/// Returns an error if `homework_name` or `status` is absent (or not a
/// string), or if the status is not one of the recognized verdict codes.
/// An unrecognized verdict is a hard error: it cannot be translated into
/// user-facing text.
pub fn parse_status(homework: &Value) -> Result<StatusUpdate, StatusError> {
    debug!("Extracting status from homework record");

    let homework_name = homework
        .get("homework_name")
        .and_then(Value::as_str)
        .ok_or(StatusError::MissingField("homework_name"))?;

    let code = homework
        .get("status")
        .and_then(Value::as_str)
        .ok_or(StatusError::MissingField("status"))?;

    let status = HomeworkStatus::parse(code)
        .ok_or_else(|| StatusError::UnknownStatus(code.to_owned()))?;

    Ok(StatusUpdate {
        homework_name: homework_name.to_owned(),
        status,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_approved_message_exact() {
        let homework = json!({"homework_name": "hw1", "status": "approved"});
        let Ok(update) = parse_status(&homework) else {
            panic!("well-formed record should parse");
        };
        assert_eq!(
            update.message(),
            "Изменился статус проверки работы \"hw1\". \
             Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[test]
    fn test_message_contains_name_and_verdict() {
        for (code, status) in [
            ("approved", HomeworkStatus::Approved),
            ("reviewing", HomeworkStatus::Reviewing),
            ("rejected", HomeworkStatus::Rejected),
        ] {
            let homework = json!({"homework_name": "final project", "status": code});
            let Ok(update) = parse_status(&homework) else {
                panic!("status {code} should parse");
            };
            assert_eq!(update.status, status);
            let message = update.message();
            assert!(message.contains("final project"));
            assert!(message.contains(status.verdict()));
        }
    }

    #[test]
    fn test_unknown_status_is_a_hard_error() {
        let homework = json!({"homework_name": "hw1", "status": "on_fire"});
        let result = parse_status(&homework);
        let Err(StatusError::UnknownStatus(code)) = result else {
            panic!("unknown status must not translate");
        };
        assert_eq!(code, "on_fire");
    }

    #[test]
    fn test_missing_name() {
        let homework = json!({"status": "approved"});
        assert!(matches!(
            parse_status(&homework),
            Err(StatusError::MissingField("homework_name"))
        ));
    }

    #[test]
    fn test_missing_status() {
        let homework = json!({"homework_name": "hw1"});
        assert!(matches!(
            parse_status(&homework),
            Err(StatusError::MissingField("status"))
        ));
    }

    #[test]
    fn test_non_string_status_is_missing() {
        let homework = json!({"homework_name": "hw1", "status": 42});
        assert!(matches!(
            parse_status(&homework),
            Err(StatusError::MissingField("status"))
        ));
    }

    #[test]
    fn test_parse_round_trips_codes() {
        for code in ["approved", "reviewing", "rejected"] {
            let Some(status) = HomeworkStatus::parse(code) else {
                panic!("{code} is a recognized status");
            };
            assert_eq!(status.as_str(), code);
        }
        assert!(HomeworkStatus::parse("Approved").is_none());
    }
}
