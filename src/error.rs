//! Error types for the acquiring library

use thiserror::Error;

/// Result type alias for acquiring operations
pub type Result<T> = std::result::Result<T, AcquiringError>;

/// Logical failure reported by the API inside a structurally valid response.
///
/// Carries the upstream error code and diagnostic fields so callers can react
/// to specific conditions instead of a flattened message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("API error {code}: {message}")]
pub struct ApiError {
    /// Upstream error code ("0" signals success)
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Extended diagnostic details
    pub details: String,
}

/// Main error type for acquiring operations
#[derive(Error, Debug)]
pub enum AcquiringError {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status with a body that is not a valid API response
    #[error("unexpected HTTP status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body, for diagnostics
        body: String,
    },

    /// The API reported a logical failure
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Notification token does not match the recomputed value
    #[error("signature verification failed: {message}")]
    SignatureVerification {
        /// What was being verified
        message: String,
    },

    /// Configuration error
    #[error("configuration error: {message}")]
    Config {
        /// What is misconfigured
        message: String,
    },
}

impl AcquiringError {
    /// Create an unexpected-status error
    pub fn unexpected_status(status: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a signature verification error
    pub fn signature_verification(message: impl Into<String>) -> Self {
        Self::SignatureVerification {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
