//! HTTP client for the homework review API.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while fetching homework updates.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Connection to the review API failed: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("Unexpected server response: http code = {status}; reason = {reason}; content = {body}")]
    ServerResponse {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Failed to decode response body as JSON: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Client for the homework status endpoint.
///
/// Issues one GET per poll cycle with a bearer token and a `from_date`
/// lower bound. The response body is returned as raw JSON; structural
/// checks belong to the validator.
pub struct PracticumClient {
    /// The underlying HTTP client, configured with a request timeout.
    http: reqwest::Client,

    /// API bearer token.
    token: String,

    /// Endpoint URL.
    endpoint: String,
}

impl PracticumClient {
    /// Creates a client for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        token: String,
        endpoint: String,
        request_timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            token,
            endpoint,
        })
    }

    /// Fetches homework updates newer than the given Unix timestamp.
    ///
    /// Returns the parsed response body verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, on a non-success HTTP status
    /// (carrying the status code, reason phrase and raw body), or when the
    /// body is not valid JSON.
    pub async fn fetch_updates(&self, from_date: u64) -> Result<Value, ApiError> {
        info!("Requesting homework updates since timestamp {}", from_date);

        let response = self
            .http
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(ApiError::Connection)?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .unwrap_or("unknown")
                .to_owned();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::ServerResponse {
                status: status.as_u16(),
                reason,
                body,
            });
        }

        debug!("Review API answered with status {}", status);

        response.json::<Value>().await.map_err(ApiError::Decode)
    }
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}
