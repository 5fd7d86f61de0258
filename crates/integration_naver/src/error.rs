//! Naver API error types

use thiserror::Error;

/// Errors that can occur when talking to the Naver APIs
#[derive(Debug, Error)]
pub enum NaverError {
    /// Connection to the API failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The API answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Error message from the body, if any
        message: String,
    },

    /// Failed to parse a response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The query matched nothing
    #[error("No result for '{0}'")]
    NoResult(String),

    /// The directions API found no viable route
    #[error("No route found (code {code}): {message}")]
    NoRoute {
        /// Provider status code from the response body
        code: i64,
        /// Provider message
        message: String,
    },

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl NaverError {
    /// Returns true if a user-initiated retry may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP status, when the error came from one
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
