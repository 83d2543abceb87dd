//! In-memory refresh token store
//!
//! Suitable for tests and single-process deployments. Every mutation runs
//! under one write lock, which makes `rotate` a true compare-and-set.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

use super::r#trait::{RefreshTokenStore, RotationOutcome};

/// Refresh tokens keyed by token hash
#[derive(Clone, Default)]
pub struct InMemoryRefreshTokenStore {
    tokens: Arc<RwLock<HashMap<String, RefreshToken>>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, active or not
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }

    /// Snapshot of every record belonging to a user
    pub async fn all_for_user(&self, user_id: Uuid) -> Vec<RefreshToken> {
        let tokens = self.tokens.read().await;
        tokens.values().filter(|t| t.user_id == user_id).cloned().collect()
    }
}

fn duplicate(token: &RefreshToken) -> DomainError {
    DomainError::Internal {
        message: format!("Refresh token {} already stored", token.id),
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn add(&self, token: &RefreshToken) -> Result<(), DomainError> {
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&token.token_hash) {
            return Err(duplicate(token));
        }

        tokens.insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token_hash).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.values().find(|t| t.id == id).cloned())
    }

    async fn find_active_by_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Vec<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .filter(|t| t.user_id == user_id && t.is_active_at(now))
            .cloned()
            .collect())
    }

    async fn revoke(&self, id: Uuid, reason: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;

        match tokens.values_mut().find(|t| t.id == id) {
            Some(token) if token.is_active_at(now) => Ok(token.revoke(now, reason)),
            _ => Ok(false),
        }
    }

    async fn revoke_all_for_user(&self, user_id: Uuid, reason: &str, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;

        let revoked = tokens
            .values_mut()
            .filter(|t| t.user_id == user_id && t.is_active_at(now))
            .map(|t| t.revoke(now, reason))
            .filter(|changed| *changed)
            .count();

        Ok(revoked)
    }

    async fn rotate(&self, old_id: Uuid, successor: &RefreshToken, now: DateTime<Utc>) -> Result<RotationOutcome, DomainError> {
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&successor.token_hash) {
            return Err(duplicate(successor));
        }

        let rotated = match tokens.values_mut().find(|t| t.id == old_id) {
            Some(old) => old.rotate_to(successor.id, now),
            None => false,
        };

        if !rotated {
            return Ok(RotationOutcome::Stale);
        }

        tokens.insert(successor.token_hash.clone(), successor.clone());
        Ok(RotationOutcome::Rotated)
    }
}
