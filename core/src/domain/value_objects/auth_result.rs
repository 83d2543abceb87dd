//! Structured results returned by the session service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::token::AccessToken;
use crate::domain::entities::user::UserProfile;

/// Authentication result rendered uniformly for register, login and refresh
///
/// Expected failures (bad credentials, invalid refresh token, rejected
/// registration) are carried here with `success == false`, never as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResult {
    pub success: bool,

    /// JWT access token for API authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Access token expiration instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,

    /// Human-readable error messages
    #[serde(default)]
    pub errors: Vec<String>,
}

impl AuthResult {
    /// Successful result carrying a fresh access token
    pub fn succeeded(access_token: AccessToken, user: UserProfile) -> Self {
        Self {
            success: true,
            access_token: Some(access_token.token),
            expires_at: Some(access_token.expires_at),
            user: Some(user),
            errors: Vec::new(),
        }
    }

    /// Failed result with the given messages
    pub fn failed<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            success: false,
            access_token: None,
            expires_at: None,
            user: None,
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of a session operation plus the refresh token value to deliver
///
/// The refresh token travels outside the JSON body (an HTTP-only cookie),
/// so it is kept apart from `result`.
#[derive(Clone, PartialEq)]
pub struct AuthOutcome {
    pub result: AuthResult,
    pub refresh_token: Option<String>,
}

impl AuthOutcome {
    pub fn success(result: AuthResult, refresh_token: String) -> Self {
        Self {
            result,
            refresh_token: Some(refresh_token),
        }
    }

    pub fn failure<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            result: AuthResult::failed(errors),
            refresh_token: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.success
    }
}

impl std::fmt::Debug for AuthOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthOutcome")
            .field("result", &self.result)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Outcome of a password change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ChangePasswordResult {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            errors: Vec::new(),
        }
    }

    pub fn failed<I, S>(errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            success: false,
            message: None,
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }
}
