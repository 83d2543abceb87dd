//! # Infrastructure Layer
//!
//! Concrete persistence for SessionKeeper: a MySQL-backed
//! `RefreshTokenStore`, connection pool management and the schema the
//! store expects.
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

pub use sk_core::errors::{DomainError, DomainResult};

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        match error {
            InfrastructureError::Config(message) => DomainError::Configuration { message },
            other => DomainError::Internal {
                message: other.to_string(),
            },
        }
    }
}
