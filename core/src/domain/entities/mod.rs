//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{
    hash_token_value, AccessToken, Claims, IssuedRefreshToken, RefreshToken,
    REFRESH_TOKEN_BYTES, REVOKE_REASON_ALL, REVOKE_REASON_BY_USER, REVOKE_REASON_LOGOUT,
    REVOKE_REASON_REUSE_DETECTED, REVOKE_REASON_ROTATED, REVOKE_REASON_USER_ALL,
};
pub use user::{NewUser, User, UserProfile};
