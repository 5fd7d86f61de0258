//! Auth API error types

use thiserror::Error;

/// Errors that can occur when calling the auth API
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// Connection to the auth API failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The API rejected the request
    ///
    /// `message` is the provider's own wording and is shown to the user as is.
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Provider error message
        message: String,
    },

    /// Failed to parse a response
    #[error("Parse error: {0}")]
    ParseError(String),

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

impl SupabaseError {
    /// HTTP status, when the API answered
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the token was rejected (expired or revoked)
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }
}
