//! Unit tests for the in-memory refresh token store

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::token::{hash_token_value, RefreshToken, REVOKE_REASON_ROTATED};
use crate::repositories::token::{InMemoryRefreshTokenStore, RefreshTokenStore, RotationOutcome};

fn token_for(user_id: Uuid, value: &str) -> RefreshToken {
    let now = Utc::now();
    RefreshToken::new(user_id, hash_token_value(value), now, now + Duration::days(7))
}

#[tokio::test]
async fn test_add_and_find_refresh_token() {
    let store = InMemoryRefreshTokenStore::new();
    let token = token_for(Uuid::new_v4(), "value-1");

    store.add(&token).await.unwrap();

    let by_hash = store.find_by_token_hash(&token.token_hash).await.unwrap();
    assert_eq!(by_hash.as_ref().map(|t| t.id), Some(token.id));

    let by_id = store.find_by_id(token.id).await.unwrap();
    assert_eq!(by_id, Some(token));

    assert!(store.find_by_token_hash("unknown").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_hash_is_rejected() {
    let store = InMemoryRefreshTokenStore::new();
    let user_id = Uuid::new_v4();

    store.add(&token_for(user_id, "same")).await.unwrap();
    assert!(store.add(&token_for(user_id, "same")).await.is_err());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_find_active_skips_revoked_and_expired() {
    let store = InMemoryRefreshTokenStore::new();
    let user_id = Uuid::new_v4();
    let now = Utc::now();

    let active = token_for(user_id, "a");
    let revoked = token_for(user_id, "b");
    let mut expired = token_for(user_id, "c");
    expired.expires_at = now - Duration::seconds(1);

    for token in [&active, &revoked, &expired] {
        store.add(token).await.unwrap();
    }
    store.add(&token_for(Uuid::new_v4(), "other-user")).await.unwrap();
    assert!(store.revoke(revoked.id, "test", now).await.unwrap());

    let found = store.find_active_by_user(user_id, now).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, active.id);
    assert_eq!(store.count_active_by_user(user_id, now).await.unwrap(), 1);
}

#[tokio::test]
async fn test_revoke_is_idempotent_and_keeps_first_reason() {
    let store = InMemoryRefreshTokenStore::new();
    let token = token_for(Uuid::new_v4(), "value");
    store.add(&token).await.unwrap();

    let first = Utc::now();
    assert!(store.revoke(token.id, "first", first).await.unwrap());
    assert!(!store.revoke(token.id, "second", first + Duration::minutes(1)).await.unwrap());

    let stored = store.find_by_id(token.id).await.unwrap().unwrap();
    assert_eq!(stored.revoked_reason.as_deref(), Some("first"));
    assert_eq!(stored.revoked_at, Some(first));
}

#[tokio::test]
async fn test_revoke_all_for_user_uses_one_timestamp() {
    let store = InMemoryRefreshTokenStore::new();
    let user_id = Uuid::new_v4();
    let other = token_for(Uuid::new_v4(), "other");
    store.add(&other).await.unwrap();
    for value in ["a", "b", "c"] {
        store.add(&token_for(user_id, value)).await.unwrap();
    }

    let now = Utc::now();
    assert_eq!(store.revoke_all_for_user(user_id, "bulk", now).await.unwrap(), 3);
    assert_eq!(store.revoke_all_for_user(user_id, "bulk", now).await.unwrap(), 0);

    for token in store.all_for_user(user_id).await {
        assert_eq!(token.revoked_at, Some(now));
        assert_eq!(token.revoked_reason.as_deref(), Some("bulk"));
    }
    assert!(store.find_by_id(other.id).await.unwrap().unwrap().is_active_at(now));
}

#[tokio::test]
async fn test_rotate_links_old_to_successor() {
    let store = InMemoryRefreshTokenStore::new();
    let user_id = Uuid::new_v4();
    let old = token_for(user_id, "old");
    let successor = token_for(user_id, "new");
    store.add(&old).await.unwrap();

    let now = Utc::now();
    let outcome = store.rotate(old.id, &successor, now).await.unwrap();
    assert_eq!(outcome, RotationOutcome::Rotated);

    let old = store.find_by_id(old.id).await.unwrap().unwrap();
    assert_eq!(old.revoked_reason.as_deref(), Some(REVOKE_REASON_ROTATED));
    assert_eq!(old.replaced_by_token_id, Some(successor.id));
    assert!(store.find_by_id(successor.id).await.unwrap().unwrap().is_active_at(now));
}

#[tokio::test]
async fn test_rotate_stale_token_writes_nothing() {
    let store = InMemoryRefreshTokenStore::new();
    let user_id = Uuid::new_v4();
    let old = token_for(user_id, "old");
    store.add(&old).await.unwrap();
    store.revoke(old.id, "gone", Utc::now()).await.unwrap();

    let successor = token_for(user_id, "new");
    let outcome = store.rotate(old.id, &successor, Utc::now()).await.unwrap();

    assert_eq!(outcome, RotationOutcome::Stale);
    assert!(store.find_by_id(successor.id).await.unwrap().is_none());

    let unknown = store.rotate(Uuid::new_v4(), &successor, Utc::now()).await.unwrap();
    assert_eq!(unknown, RotationOutcome::Stale);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rotation_has_single_winner() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    let user_id = Uuid::new_v4();
    let old = token_for(user_id, "contested");
    store.add(&old).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        let old_id = old.id;
        handles.push(tokio::spawn(async move {
            let successor = token_for(user_id, &format!("successor-{}", i));
            store.rotate(old_id, &successor, Utc::now()).await.unwrap()
        }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() == RotationOutcome::Rotated {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(store.count_active_by_user(user_id, Utc::now()).await.unwrap(), 1);
}
