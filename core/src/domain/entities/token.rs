//! Token entities for session lifecycle management.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::user::User;

/// Number of random bytes behind every refresh token value
pub const REFRESH_TOKEN_BYTES: usize = 64;

/// Revocation reason recorded on a token replaced through rotation
pub const REVOKE_REASON_ROTATED: &str = "Rotated";

/// Revocation reason recorded when a rotated-out token is presented again
pub const REVOKE_REASON_REUSE_DETECTED: &str = "Possible token reuse detected";

/// Default reason for revoking a single token
pub const REVOKE_REASON_BY_USER: &str = "Revoked by user";

/// Default reason for revoking every token of a user
pub const REVOKE_REASON_ALL: &str = "Revoked all tokens";

/// Reason recorded on logout
pub const REVOKE_REASON_LOGOUT: &str = "User logged out";

/// Reason recorded when a user signs out of every device
pub const REVOKE_REASON_USER_ALL: &str = "User revoked all tokens";

/// Claims structure for the access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// User email
    pub email: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    /// User name
    pub name: String,

    #[serde(rename = "firstName")]
    pub first_name: String,

    #[serde(rename = "lastName")]
    pub last_name: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer, present only when configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience, present only when configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    /// Creates access token claims for a user
    ///
    /// # Arguments
    ///
    /// * `user` - The authenticated user
    /// * `jti` - Unique token identifier
    /// * `issued_at` - Issuance instant
    /// * `expires_at` - Expiry instant
    /// * `issuer` / `audience` - Optional registered claims
    pub fn for_user(
        user: &User,
        jti: Uuid,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        issuer: Option<String>,
        audience: Option<String>,
    ) -> Self {
        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            jti: jti.to_string(),
            name: user.user_name.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer,
            aud: audience,
        }
    }

    /// Checks if the claims have expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    ///
    /// # Returns
    ///
    /// `Ok(Uuid)` if the subject can be parsed as a UUID, `Err` otherwise
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// A signed access token together with its lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Encoded JWT
    pub token: String,
    pub jti: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Refresh token record stored by the token store
///
/// Only the SHA-256 of the token value is kept; the value itself is handed
/// to the client once and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the refresh token
    pub id: Uuid,

    /// User ID this token belongs to
    pub user_id: Uuid,

    /// Hex SHA-256 of the token value
    pub token_hash: String,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Timestamp when the token was revoked
    pub revoked_at: Option<DateTime<Utc>>,

    /// Why the token was revoked
    pub revoked_reason: Option<String>,

    /// Successor created when this token was rotated
    pub replaced_by_token_id: Option<Uuid>,
}

impl RefreshToken {
    /// Creates a new, active refresh token
    ///
    /// # Arguments
    ///
    /// * `user_id` - The owning user's UUID
    /// * `token_hash` - The hashed token value
    /// * `created_at` - Creation instant
    /// * `expires_at` - Expiry instant
    pub fn new(
        user_id: Uuid,
        token_hash: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            created_at,
            expires_at,
            revoked_at: None,
            revoked_reason: None,
            replaced_by_token_id: None,
        }
    }

    /// Checks if the refresh token has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the token has been revoked
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// A token is active iff it is not revoked and `now < expires_at`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired_at(now)
    }

    /// Revokes the token
    ///
    /// Revocation is terminal: returns `false` and leaves the record
    /// untouched if it was already revoked.
    pub fn revoke(&mut self, at: DateTime<Utc>, reason: &str) -> bool {
        if self.is_revoked() {
            return false;
        }
        self.revoked_at = Some(at);
        self.revoked_reason = Some(reason.to_string());
        true
    }

    /// Marks the token as rotated into `successor_id`
    ///
    /// Succeeds only while the token is still active at `at`.
    pub fn rotate_to(&mut self, successor_id: Uuid, at: DateTime<Utc>) -> bool {
        if !self.is_active_at(at) || self.replaced_by_token_id.is_some() {
            return false;
        }
        self.revoke(at, REVOKE_REASON_ROTATED);
        self.replaced_by_token_id = Some(successor_id);
        true
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

/// Freshly generated refresh token: the client-facing value and the record to persist
#[derive(Clone)]
pub struct IssuedRefreshToken {
    /// Base64 token value, delivered to the client only
    pub value: String,
    pub record: RefreshToken,
}

impl std::fmt::Debug for IssuedRefreshToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedRefreshToken")
            .field("value", &"<redacted>")
            .field("record", &self.record)
            .finish()
    }
}

/// Hashes a refresh token value for storage and lookup
pub fn hash_token_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}
