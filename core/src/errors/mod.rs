//! Domain-specific error types and error handling.
//!
//! Expected session failures (bad credentials, unknown refresh token) are
//! reported through result values; `DomainError` is reserved for faults the
//! caller cannot recover from by retrying with other input.

mod types;

pub use types::{AuthError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The user directory refused an operation, with its own messages
    #[error("Request rejected: {}", .errors.join("; "))]
    Rejected { errors: Vec<String> },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Stable machine-readable code for the presentation layer
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::ValidationErr(_) => "VALIDATION_ERROR",
            DomainError::Configuration { .. } => "CONFIGURATION_ERROR",
            DomainError::Rejected { .. } => "REQUEST_REJECTED",
            DomainError::Unauthorized => "UNAUTHORIZED",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::Auth(_) => "AUTHENTICATION_FAILED",
            DomainError::Token(_) => "INVALID_TOKEN",
        }
    }

    /// Messages suitable for returning to a client
    pub fn client_messages(&self) -> Vec<String> {
        match self {
            DomainError::Rejected { errors } => errors.clone(),
            DomainError::Internal { .. } | DomainError::Configuration { .. } => {
                vec!["An internal error occurred".to_string()]
            }
            other => vec![other.to_string()],
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests;
