//! Error types shared by completion backends.

use thiserror::Error;

/// Errors returned by an [`Llm`](crate::Llm) backend.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LlmError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {seconds}s")]
    Timeout {
        /// The timeout that expired.
        seconds: u64,
    },

    /// The API rejected the credentials.
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// The API is throttling requests and retries were exhausted.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Any other non-success status returned by the API.
    #[error("API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error detail extracted from the response body.
        message: String,
    },

    /// The request could not be sent or the connection dropped.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a body that could not be interpreted.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The request itself was malformed before being sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl LlmError {
    /// Whether a retry has a reasonable chance of succeeding.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::RateLimited(_) | LlmError::Timeout { .. } | LlmError::Transport(_) => true,
            LlmError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// A convenience result type for completion calls.
pub type Result<T> = std::result::Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_throttling_are_retryable() {
        assert!(LlmError::RateLimited("slow down".into()).is_retryable());
        assert!(LlmError::Api { status: 503, message: "busy".into() }.is_retryable());
        assert!(LlmError::Timeout { seconds: 30 }.is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        assert!(!LlmError::Unauthorized("bad key".into()).is_retryable());
        assert!(!LlmError::Api { status: 400, message: "bad".into() }.is_retryable());
        assert!(!LlmError::InvalidResponse("no choices".into()).is_retryable());
    }
}
