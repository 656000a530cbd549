//! Shape validation for homework API responses.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while validating an API response.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("API response is not a key-value mapping: {snippet}")]
    NotAnObject { snippet: String },

    #[error("API response is missing the \"{0}\" field")]
    MissingField(&'static str),

    #[error("The \"homeworks\" field is not a list: {snippet}")]
    NotAList { snippet: String },

    #[error("The \"current_date\" field is not a timestamp: {snippet}")]
    NotATimestamp { snippet: String },
}

/// Checks an API response and extracts the most recent homework entry.
///
/// The response must be an object carrying both a `homeworks` list and a
/// `current_date` timestamp. An empty list is not an error: it means no
/// homework changed within the requested window and `Ok(None)` is returned.
///
/// # Errors
///
/// Returns an error if the response is not an object, if either required
/// field is absent, or if `homeworks` is not a list.
pub fn check_response(response: &Value) -> Result<Option<&Value>, ResponseError> {
    debug!("Validating API response shape");

    let Some(object) = response.as_object() else {
        return Err(ResponseError::NotAnObject {
            snippet: snippet(response),
        });
    };

    if !object.contains_key("current_date") {
        return Err(ResponseError::MissingField("current_date"));
    }

    let homeworks = object
        .get("homeworks")
        .ok_or(ResponseError::MissingField("homeworks"))?;

    let Some(list) = homeworks.as_array() else {
        return Err(ResponseError::NotAList {
            snippet: snippet(homeworks),
        });
    };

    match list.first() {
        Some(latest) => Ok(Some(latest)),
        None => {
            info!("No homework updates in the requested window");
            Ok(None)
        }
    }
}

/// Extracts the next poll cursor from a validated response.
///
/// The server reports the time of the answer in `current_date`; the poller
/// uses it as the `from_date` lower bound of the next fetch window.
///
/// # Errors
///
/// Returns an error if the field is absent or not an unsigned integer.
pub fn extract_cursor(response: &Value) -> Result<u64, ResponseError> {
    let date = response
        .get("current_date")
        .ok_or(ResponseError::MissingField("current_date"))?;

    date.as_u64().ok_or_else(|| ResponseError::NotATimestamp {
        snippet: snippet(date),
    })
}

/// Renders a short excerpt of a JSON value for error messages.
fn snippet(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.chars().count() <= 120 {
        rendered
    } else {
        format!("{}...", rendered.chars().take(120).collect::<String>())
    }
}
