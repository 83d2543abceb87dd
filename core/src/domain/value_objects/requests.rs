//! Credential payloads accepted by the session service.
//!
//! Full request validation lives at the API boundary; `validate` only
//! guards the invariants the core relies on (non-blank fields, email shape).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::domain::entities::user::NewUser;
use crate::errors::ValidationError;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Lowercases and trims an email for lookup and storage
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn require(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.trim().is_empty() {
        errors.push(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }
}

fn require_email(email: &str, errors: &mut Vec<ValidationError>) {
    if email.trim().is_empty() {
        require("email", email, errors);
    } else if !EMAIL_REGEX.is_match(email.trim()) {
        errors.push(ValidationError::InvalidEmail);
    }
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Registration request
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterRequest {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        require_email(&self.email, &mut errors);
        require("password", &self.password, &mut errors);
        require("firstName", &self.first_name, &mut errors);
        require("lastName", &self.last_name, &mut errors);
        into_result(errors)
    }

    /// Account data for the user directory, with the email normalized
    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            email: normalize_email(&self.email),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        }
    }
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

/// Login request
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        require_email(&self.email, &mut errors);
        require("password", &self.password, &mut errors);
        into_result(errors)
    }
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Password change request for an authenticated user
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn new(current_password: impl Into<String>, new_password: impl Into<String>) -> Self {
        Self {
            current_password: current_password.into(),
            new_password: new_password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        require("currentPassword", &self.current_password, &mut errors);
        require("newPassword", &self.new_password, &mut errors);
        into_result(errors)
    }
}

impl std::fmt::Debug for ChangePasswordRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ChangePasswordRequest { .. }")
    }
}
