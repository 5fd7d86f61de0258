//! Application-level errors
//!
//! Every failure surfaces to the page as a rejected operation carrying one
//! of these variants; nothing in the core presents it to the user.

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error (invalid coordinates, malformed fixed-point value)
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A remote service answered with a non-2xx status
    #[error("HTTP error: status {status}")]
    HttpError {
        /// HTTP status code
        status: u16,
    },

    /// Well-formed response with zero matches
    #[error("No result: {0}")]
    NoResult(String),

    /// The directions provider found no viable route
    #[error("No route found (provider code {code})")]
    NoRoute {
        /// Provider-specific status code
        code: i64,
    },

    /// Operation attempted before the map or auth session finished initializing
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Form-field constraint violation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Request exceeded its deadline
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout that elapsed
        timeout_secs: u64,
    },

    /// A newer route request was issued before this one completed
    #[error("Route request {token} was superseded by a newer request")]
    Superseded {
        /// Token of the stale request
        token: u64,
    },

    /// The owning component was torn down while the operation was pending
    #[error("Operation cancelled")]
    Cancelled,

    /// Auth provider rejected the operation
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Persistent storage failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Transport-level failure talking to an external service
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Whether the caller may sensibly retry by repeating the user action
    ///
    /// Nothing is retried automatically; this only drives the wording shown
    /// to the user.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::ExternalService(_) | Self::NotReady(_)
        ) || matches!(self, Self::HttpError { status } if *status >= 500 || *status == 429)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors() {
        assert!(ApplicationError::Timeout { timeout_secs: 10 }.is_transient());
        assert!(ApplicationError::HttpError { status: 503 }.is_transient());
        assert!(ApplicationError::HttpError { status: 429 }.is_transient());
        assert!(ApplicationError::NotReady("map".to_string()).is_transient());
    }

    #[test]
    fn permanent_errors() {
        assert!(!ApplicationError::HttpError { status: 401 }.is_transient());
        assert!(!ApplicationError::NoRoute { code: 1 }.is_transient());
        assert!(!ApplicationError::NoResult("x".to_string()).is_transient());
        assert!(!ApplicationError::Validation("x".to_string()).is_transient());
    }

    #[test]
    fn domain_errors_convert() {
        let err: ApplicationError = DomainError::ValidationError("bad".to_string()).into();
        assert!(matches!(err, ApplicationError::Domain(_)));
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            ApplicationError::HttpError { status: 401 }.to_string(),
            "HTTP error: status 401"
        );
        assert_eq!(
            ApplicationError::NoRoute { code: 2 }.to_string(),
            "No route found (provider code 2)"
        );
        assert!(ApplicationError::Superseded { token: 3 }
            .to_string()
            .contains("superseded"));
    }
}
