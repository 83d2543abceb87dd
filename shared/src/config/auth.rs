//! Token signing and session lifetime configuration

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default access token lifetime in minutes
pub const DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 60;

/// Default refresh token lifetime in days
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Longest accepted access token lifetime (one day)
pub const MAX_ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 24 * 60;

/// Longest accepted refresh token lifetime
pub const MAX_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 365;

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret for HMAC signing. Required; a missing secret is fatal at startup.
    #[serde(default)]
    pub secret: Option<String>,

    /// JWT issuer claim
    #[serde(default)]
    pub issuer: Option<String>,

    /// JWT audience claim
    #[serde(default)]
    pub audience: Option<String>,

    /// Access token expiry time in minutes
    #[serde(default = "default_access_expiry_minutes")]
    pub access_token_expiry_minutes: i64,

    /// Refresh token expiry time in days
    #[serde(default = "default_refresh_expiry_days")]
    pub refresh_token_expiry_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            issuer: None,
            audience: None,
            access_token_expiry_minutes: DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES,
            refresh_token_expiry_days: DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS,
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            ..Default::default()
        }
    }

    /// Create from environment variables
    ///
    /// Unset or unparseable lifetimes fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            secret: non_empty_var("JWT_SECRET"),
            issuer: non_empty_var("JWT_ISSUER"),
            audience: non_empty_var("JWT_AUDIENCE"),
            access_token_expiry_minutes: parse_or(
                std::env::var("JWT_EXPIRATION_MINUTES").ok().as_deref(),
                DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES,
            ),
            refresh_token_expiry_days: parse_or(
                std::env::var("JWT_REFRESH_EXPIRATION_DAYS").ok().as_deref(),
                DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS,
            ),
        }
    }

    /// Set the issuer claim
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the audience claim
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry_minutes = minutes;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry_days = days;
        self
    }

    /// Signing secret, or `None` when unset or blank
    pub fn signing_secret(&self) -> Option<&str> {
        self.secret.as_deref().filter(|s| !s.trim().is_empty())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parses a positive lifetime, falling back to `default` when absent, malformed or not positive.
pub(crate) fn parse_or<T>(raw: Option<&str>, default: T) -> T
where
    T: FromStr + PartialOrd + Default,
{
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
        .unwrap_or(default)
}

fn default_access_expiry_minutes() -> i64 {
    DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES
}

fn default_refresh_expiry_days() -> i64 {
    DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS
}
