//! User entity as exposed by the user directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Normalized email address
    pub email: String,

    /// Login name; defaults to the email address
    pub user_name: String,

    pub first_name: String,

    pub last_name: String,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the user's last login
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new User instance
    pub fn new(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let email = email.into();
        Self {
            id: Uuid::new_v4(),
            user_name: email.clone(),
            email,
            first_name: first_name.into(),
            last_name: last_name.into(),
            created_at,
            last_login_at: None,
        }
    }

    /// Updates the last login timestamp
    pub fn update_last_login(&mut self, at: DateTime<Utc>) {
        self.last_login_at = Some(at);
    }

    /// "First Last", trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Account data handed to the user directory on registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Read model of a user returned to API callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            user_name: user.user_name.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}
