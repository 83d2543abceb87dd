//! Refresh token store trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Outcome of an atomic rotation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The old record was retired and the successor stored
    Rotated,
    /// The old record was no longer active; nothing was written
    Stale,
}

/// Store trait for RefreshToken persistence operations
///
/// Records are looked up by the SHA-256 of the token value; the value itself
/// never reaches the store. Instants are supplied by the caller so that a
/// single clock governs expiry decisions.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a newly issued refresh token
    ///
    /// # Returns
    /// * `Ok(())` - Token stored
    /// * `Err(DomainError)` - Storage failed (e.g., duplicate hash)
    async fn add(&self, token: &RefreshToken) -> Result<(), DomainError>;

    /// Find a refresh token by its hashed value, whatever its state
    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Find a refresh token by its ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>, DomainError>;

    /// All tokens of a user that are active at `now`
    async fn find_active_by_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Vec<RefreshToken>, DomainError>;

    /// Revoke one token if it is still active at `now`
    ///
    /// # Returns
    /// * `Ok(true)` - Token was revoked
    /// * `Ok(false)` - Token unknown, already revoked or expired; nothing changed
    async fn revoke(&self, id: Uuid, reason: &str, now: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Revoke every token of a user active at `now`, with one timestamp and reason
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens revoked
    async fn revoke_all_for_user(&self, user_id: Uuid, reason: &str, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Atomically retire `old_id` in favour of `successor`
    ///
    /// Marks the old record revoked with reason "Rotated" and links it to the
    /// successor, guarded by the old record still being active at `now`, and
    /// inserts the successor. Both writes happen or neither does.
    async fn rotate(&self, old_id: Uuid, successor: &RefreshToken, now: DateTime<Utc>) -> Result<RotationOutcome, DomainError>;

    /// Count active tokens for a user
    async fn count_active_by_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let tokens = self.find_active_by_user(user_id, now).await?;
        Ok(tokens.len())
    }
}
