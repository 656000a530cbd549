//! Homework review API module.
//!
//! Provides the HTTP client for the homework status endpoint and the
//! validator that checks the shape of its responses.

mod client;
mod response;

pub use client::{ApiError, PracticumClient};
pub use response::{check_response, extract_cursor, ResponseError};
