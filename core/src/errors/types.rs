//! Error types for authentication, token handling and input validation

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Shared by every login failure so callers cannot probe which part was wrong
    #[error("Invalid email or password")]
    AuthenticationFailed,

    #[error("User not found")]
    UserNotFound,

    #[error("Current password is incorrect")]
    InvalidCurrentPassword,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid claims")]
    InvalidClaims,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The {field} field is required")]
    RequiredField { field: String },

    #[error("Invalid email address")]
    InvalidEmail,
}
