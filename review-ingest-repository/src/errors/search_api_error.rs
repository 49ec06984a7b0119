//! Search API error types.
//!
//! This module defines the error types that can occur calling the outbound
//! search provider, and the retryability classification the shared retry
//! wrapper consults.

use thiserror::Error;

/// Errors that can occur during search provider operations.
#[derive(Error, Debug)]
pub enum SearchApiError {
    /// Network-level failure reaching the provider (DNS, connect, timeout).
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The provider answered with a non-success HTTP status.
    #[error("Status error {status}: {body}")]
    StatusError {
        /// HTTP status code of the response.
        status: u16,
        /// Response body or error description.
        body: String,
    },

    /// The response body could not be decoded as JSON.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The client could not be constructed.
    #[error("Build error: {0}")]
    BuildError(String),
}

impl SearchApiError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    /// Create a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::StatusError {
            status,
            body: body.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a build error.
    pub fn build(msg: impl Into<String>) -> Self {
        Self::BuildError(msg.into())
    }

    /// Whether a retry can plausibly succeed.
    ///
    /// Transport faults and provider-side statuses (429 and 5xx) are
    /// retryable; any other status and malformed response bodies are
    /// terminal and fail the call immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TransportError(_) => true,
            Self::StatusError { status, .. } => *status == 429 || (*status >= 500 && *status < 600),
            Self::ParseError(_) | Self::BuildError(_) => false,
        }
    }
}

impl From<reqwest::Error> for SearchApiError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::StatusError {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::TransportError(err.to_string())
        }
    }
}
