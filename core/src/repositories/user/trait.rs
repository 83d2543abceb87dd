//! User directory trait: the identity capability the session service consumes.
//!
//! Password storage, hashing and policy belong to the directory; the session
//! service only asks it to check or replace credentials.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::user::{NewUser, User};
use crate::errors::DomainError;

/// Result of a credential check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    Valid,
    Invalid,
    /// Too many failed attempts; the password was not evaluated
    LockedOut,
}

impl CredentialCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, CredentialCheck::Valid)
    }
}

/// Directory of user accounts
///
/// Policy rejections (duplicate email, weak password) are reported as
/// `DomainError::Rejected` carrying human-readable messages. Any other error
/// is treated as an infrastructure fault.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by normalized email address
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Check a password, counting failures toward lockout
    async fn verify_password(&self, user: &User, password: &str) -> Result<CredentialCheck, DomainError>;

    /// Create an account with the given password
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError::Rejected)` - Email taken or password refused by policy
    async fn create(&self, new_user: NewUser, password: &str) -> Result<User, DomainError>;

    /// Replace a user's password
    async fn update_password(&self, user: &User, new_password: &str) -> Result<(), DomainError>;

    /// Record a successful login at `at` and return the updated user
    async fn record_login(&self, user: &User, at: DateTime<Utc>) -> Result<User, DomainError>;
}
