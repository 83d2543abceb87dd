//! Main session service implementation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{
    hash_token_value, AccessToken, RefreshToken, REVOKE_REASON_ALL, REVOKE_REASON_BY_USER, REVOKE_REASON_LOGOUT,
    REVOKE_REASON_REUSE_DETECTED, REVOKE_REASON_USER_ALL,
};
use crate::domain::entities::user::{User, UserProfile};
use crate::domain::value_objects::requests::normalize_email;
use crate::domain::value_objects::{
    AuthOutcome, AuthResult, ChangePasswordRequest, ChangePasswordResult, LoginRequest,
    RegisterRequest,
};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::{CredentialCheck, RefreshTokenStore, RotationOutcome, UserDirectory};
use crate::services::token::TokenSigner;

/// Message returned after a successful password change
pub const PASSWORD_CHANGED_MESSAGE: &str = "Password changed successfully";

/// Session service coordinating the signer, the refresh token store and the user directory
///
/// Expected failures are returned as unsuccessful results; `Err` is reserved
/// for infrastructure faults raised by the store or the directory.
pub struct SessionService<S, U>
where
    S: RefreshTokenStore,
    U: UserDirectory,
{
    /// Refresh token persistence
    store: Arc<S>,
    /// Identity and credential checks
    users: Arc<U>,
    /// Access token signing and refresh token generation
    signer: Arc<TokenSigner>,
}

impl<S, U> SessionService<S, U>
where
    S: RefreshTokenStore,
    U: UserDirectory,
{
    /// Create a new session service
    ///
    /// # Arguments
    ///
    /// * `store` - Refresh token store
    /// * `users` - User directory
    /// * `signer` - Token signer; its clock governs every expiry decision
    pub fn new(store: Arc<S>, users: Arc<U>, signer: Arc<TokenSigner>) -> Self {
        Self { store, users, signer }
    }

    /// Register a new account and open its first session
    ///
    /// Directory rejections (duplicate email, password policy) come back as a
    /// failed outcome carrying the directory's messages; no tokens are issued.
    pub async fn register(&self, request: RegisterRequest) -> DomainResult<AuthOutcome> {
        if let Err(errors) = request.validate() {
            return Ok(AuthOutcome::failure(messages(errors)));
        }

        let user = match self.users.create(request.to_new_user(), &request.password).await {
            Ok(user) => user,
            Err(DomainError::Rejected { errors }) => {
                tracing::info!(event = "registration_rejected", reasons = errors.len(), "Registration rejected by user directory");
                return Ok(AuthOutcome::failure(errors));
            }
            Err(e) => return Err(e),
        };

        let (access_token, refresh_token) = self.open_session(&user).await?;
        tracing::info!(user_id = %user.id, event = "user_registered", "User registered");
        Ok(AuthOutcome::success(
            AuthResult::succeeded(access_token, UserProfile::from(&user)),
            refresh_token,
        ))
    }

    /// Authenticate with email and password
    ///
    /// Unknown email, wrong password and a locked-out account are
    /// indistinguishable to the caller.
    pub async fn login(&self, request: LoginRequest) -> DomainResult<AuthOutcome> {
        if let Err(errors) = request.validate() {
            return Ok(AuthOutcome::failure(messages(errors)));
        }

        let email = normalize_email(&request.email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::debug!(event = "login_failed", reason = "unknown_email", "Login failed");
            return Ok(login_failure());
        };

        match self.users.verify_password(&user, &request.password).await? {
            CredentialCheck::Valid => {}
            CredentialCheck::Invalid => {
                tracing::info!(user_id = %user.id, event = "login_failed", reason = "invalid_password", "Login failed");
                return Ok(login_failure());
            }
            CredentialCheck::LockedOut => {
                tracing::warn!(user_id = %user.id, event = "login_locked_out", "Login attempt on locked-out account");
                return Ok(login_failure());
            }
        }

        let user = self.users.record_login(&user, self.signer.now()).await?;
        let (access_token, refresh_token) = self.open_session(&user).await?;

        tracing::info!(user_id = %user.id, event = "login_succeeded", "User logged in");
        Ok(AuthOutcome::success(
            AuthResult::succeeded(access_token, UserProfile::from(&user)),
            refresh_token,
        ))
    }

    /// Exchange a refresh token for a new access token and a rotated refresh token
    ///
    /// Presenting a token that was already revoked revokes every active
    /// token of its owner.
    pub async fn refresh_token(&self, presented: &str) -> DomainResult<AuthOutcome> {
        if presented.trim().is_empty() {
            return Ok(refresh_failure());
        }

        let Some(current) = self.store.find_by_token_hash(&hash_token_value(presented)).await? else {
            tracing::debug!(event = "refresh_failed", reason = "unknown_token", "Refresh token not found");
            return Ok(refresh_failure());
        };

        let now = self.signer.now();
        if !current.is_active_at(now) {
            if current.is_revoked() {
                self.contain_reuse(&current, now).await;
            } else {
                tracing::debug!(token_id = %current.id, user_id = %current.user_id, event = "refresh_failed", reason = "expired", "Refresh token expired");
            }
            return Ok(refresh_failure());
        }

        let Some(user) = self.users.find_by_id(current.user_id).await? else {
            tracing::warn!(token_id = %current.id, user_id = %current.user_id, event = "refresh_failed", reason = "owner_missing", "Refresh token owner no longer exists");
            return Ok(refresh_failure());
        };

        let access_token = self.signer.issue_access_token(&user)?;
        let successor = self.signer.issue_refresh_token(user.id)?;

        match self.store.rotate(current.id, &successor.record, now).await? {
            RotationOutcome::Rotated => {
                tracing::info!(
                    user_id = %user.id,
                    token_id = %current.id,
                    successor_id = %successor.record.id,
                    event = "refresh_token_rotated",
                    "Refresh token rotated"
                );
                Ok(AuthOutcome::success(
                    AuthResult::succeeded(access_token, UserProfile::from(&user)),
                    successor.value,
                ))
            }
            RotationOutcome::Stale => {
                tracing::info!(token_id = %current.id, user_id = %user.id, event = "refresh_failed", reason = "concurrent_rotation", "Refresh token was rotated concurrently");
                Ok(refresh_failure())
            }
        }
    }

    /// Revoke a single refresh token
    ///
    /// Unknown, expired or already revoked tokens are left untouched.
    ///
    /// # Returns
    ///
    /// `true` if a token was revoked by this call
    pub async fn revoke_token(&self, token: &str, reason: Option<&str>) -> DomainResult<bool> {
        let Some(record) = self.store.find_by_token_hash(&hash_token_value(token)).await? else {
            return Ok(false);
        };

        let now = self.signer.now();
        if !record.is_active_at(now) {
            return Ok(false);
        }

        let reason = reason.unwrap_or(REVOKE_REASON_BY_USER);
        let revoked = self.store.revoke(record.id, reason, now).await?;
        if revoked {
            tracing::info!(user_id = %record.user_id, token_id = %record.id, reason = reason, event = "refresh_token_revoked", "Refresh token revoked");
        }
        Ok(revoked)
    }

    /// Revoke every active refresh token of a user
    ///
    /// # Returns
    ///
    /// The number of tokens revoked
    pub async fn revoke_all_user_tokens(&self, user_id: Uuid, reason: Option<&str>) -> DomainResult<usize> {
        let reason = reason.unwrap_or(REVOKE_REASON_ALL);
        let revoked = self
            .store
            .revoke_all_for_user(user_id, reason, self.signer.now())
            .await?;

        if revoked > 0 {
            tracing::info!(user_id = %user_id, revoked = revoked, reason = reason, event = "refresh_tokens_revoked", "Revoked all refresh tokens of user");
        }
        Ok(revoked)
    }

    /// End the session behind a refresh token
    pub async fn logout(&self, token: &str) -> DomainResult<bool> {
        self.revoke_token(token, Some(REVOKE_REASON_LOGOUT)).await
    }

    /// End every session of a user
    pub async fn logout_all(&self, user_id: Uuid) -> DomainResult<usize> {
        self.revoke_all_user_tokens(user_id, Some(REVOKE_REASON_USER_ALL)).await
    }

    /// Change a user's password after checking the current one
    ///
    /// Existing sessions stay open; revoking them is up to the caller.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        request: ChangePasswordRequest,
    ) -> DomainResult<ChangePasswordResult> {
        if let Err(errors) = request.validate() {
            return Ok(ChangePasswordResult::failed(messages(errors)));
        }

        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(ChangePasswordResult::failed([AuthError::UserNotFound.to_string()]));
        };

        if !self
            .users
            .verify_password(&user, &request.current_password)
            .await?
            .is_valid()
        {
            return Ok(ChangePasswordResult::failed([AuthError::InvalidCurrentPassword.to_string()]));
        }

        match self.users.update_password(&user, &request.new_password).await {
            Ok(()) => {
                tracing::info!(user_id = %user.id, event = "password_changed", "Password changed");
                Ok(ChangePasswordResult::succeeded(PASSWORD_CHANGED_MESSAGE))
            }
            Err(DomainError::Rejected { errors }) => Ok(ChangePasswordResult::failed(errors)),
            Err(e) => Err(e),
        }
    }

    /// Profile of a user, if the user exists
    pub async fn get_user_profile(&self, user_id: Uuid) -> DomainResult<Option<UserProfile>> {
        let user = self.users.find_by_id(user_id).await?;
        Ok(user.as_ref().map(UserProfile::from))
    }

    /// Resolve the user behind an access token
    ///
    /// # Returns
    ///
    /// * `Ok(Uuid)` - The token's subject
    /// * `Err(DomainError::Unauthorized)` - The token failed verification
    pub async fn authenticate(&self, access_token: &str) -> DomainResult<Uuid> {
        let claims = self.signer.verify_access_token(access_token).map_err(|e| {
            tracing::debug!(error = %e, event = "access_token_rejected", "Access token rejected");
            DomainError::Unauthorized
        })?;

        claims.user_id().map_err(|_| DomainError::Unauthorized)
    }

    /// Mint a token pair and persist its refresh token
    async fn open_session(&self, user: &User) -> DomainResult<(AccessToken, String)> {
        let access_token = self.signer.issue_access_token(user)?;
        let issued = self.signer.issue_refresh_token(user.id)?;
        self.store.add(&issued.record).await?;

        Ok((access_token, issued.value))
    }

    /// Revoke every active token of the owner of a replayed token
    ///
    /// Failures are logged; the caller still gets the generic refresh failure.
    async fn contain_reuse(&self, replayed: &RefreshToken, now: DateTime<Utc>) {
        match self
            .store
            .revoke_all_for_user(replayed.user_id, REVOKE_REASON_REUSE_DETECTED, now)
            .await
        {
            Ok(revoked) => tracing::warn!(
                user_id = %replayed.user_id,
                token_id = %replayed.id,
                revoked = revoked,
                event = "refresh_token_reuse_detected",
                "Revoked refresh token presented again; revoked all sessions of user"
            ),
            Err(e) => tracing::error!(
                user_id = %replayed.user_id,
                token_id = %replayed.id,
                error = %e,
                event = "refresh_token_reuse_containment_failed",
                "Failed to revoke sessions after refresh token reuse"
            ),
        }
    }
}

fn messages(errors: Vec<ValidationError>) -> Vec<String> {
    errors.iter().map(ToString::to_string).collect()
}

fn login_failure() -> AuthOutcome {
    AuthOutcome::failure([AuthError::AuthenticationFailed.to_string()])
}

fn refresh_failure() -> AuthOutcome {
    AuthOutcome::failure([TokenError::InvalidRefreshToken.to_string()])
}
