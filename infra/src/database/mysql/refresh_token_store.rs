//! MySQL implementation of the RefreshTokenStore trait.
//!
//! Rotation runs in a single transaction: the successor is inserted and the
//! old row is retired by an UPDATE guarded on the row still being active.
//! InnoDB's row lock makes the second of two concurrent rotations see the
//! committed revocation and affect no rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, Row};
use uuid::Uuid;

use sk_core::domain::entities::token::{RefreshToken, REVOKE_REASON_ROTATED};
use sk_core::errors::DomainError;
use sk_core::repositories::{RefreshTokenStore, RotationOutcome};

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, token_hash, created_at, expires_at,
           revoked_at, revoked_reason, replaced_by_token_id
    FROM refresh_tokens
"#;

const INSERT_TOKEN: &str = r#"
    INSERT INTO refresh_tokens (
        id, user_id, token_hash, created_at, expires_at,
        revoked_at, revoked_reason, replaced_by_token_id
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// MySQL implementation of RefreshTokenStore
pub struct MySqlRefreshTokenStore {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRefreshTokenStore {
    /// Create a new MySQL refresh token store
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        let id: String = row.try_get("id").map_err(column_error("id"))?;
        let user_id: String = row.try_get("user_id").map_err(column_error("user_id"))?;
        let replaced_by: Option<String> = row
            .try_get("replaced_by_token_id")
            .map_err(column_error("replaced_by_token_id"))?;

        Ok(RefreshToken {
            id: parse_uuid(&id)?,
            user_id: parse_uuid(&user_id)?,
            token_hash: row.try_get("token_hash").map_err(column_error("token_hash"))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(column_error("created_at"))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(column_error("expires_at"))?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(column_error("revoked_at"))?,
            revoked_reason: row
                .try_get("revoked_reason")
                .map_err(column_error("revoked_reason"))?,
            replaced_by_token_id: replaced_by.as_deref().map(parse_uuid).transpose()?,
        })
    }

    fn insert<'q>(token: &'q RefreshToken) -> sqlx::query::Query<'q, MySql, sqlx::mysql::MySqlArguments> {
        sqlx::query(INSERT_TOKEN)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(&token.token_hash)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.revoked_at)
            .bind(&token.revoked_reason)
            .bind(token.replaced_by_token_id.map(|id| id.to_string()))
    }

    async fn find_one(&self, filter: &str, value: String) -> Result<Option<RefreshToken>, DomainError> {
        let query = format!("{} WHERE {} = ? LIMIT 1", SELECT_COLUMNS, filter);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error("find refresh token"))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID '{}': {}", raw, e),
    })
}

fn column_error(column: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::Internal {
        message: format!("Failed to get {}: {}", column, e),
    }
}

fn query_error(action: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::Internal {
        message: format!("Failed to {}: {}", action, e),
    }
}

#[async_trait]
impl RefreshTokenStore for MySqlRefreshTokenStore {
    async fn add(&self, token: &RefreshToken) -> Result<(), DomainError> {
        Self::insert(token)
            .execute(&self.pool)
            .await
            .map_err(query_error("save refresh token"))?;

        Ok(())
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        self.find_one("token_hash", token_hash.to_string()).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>, DomainError> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_active_by_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Vec<RefreshToken>, DomainError> {
        let query = format!(
            "{} WHERE user_id = ? AND revoked_at IS NULL AND expires_at > ? ORDER BY created_at DESC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("find user tokens"))?;

        rows.iter().map(Self::row_to_token).collect()
    }

    async fn revoke(&self, id: Uuid, reason: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked_at = ?, revoked_reason = ?
            WHERE id = ? AND revoked_at IS NULL AND expires_at > ?
        "#;

        let result = sqlx::query(query)
            .bind(now)
            .bind(reason)
            .bind(id.to_string())
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(query_error("revoke token"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: Uuid, reason: &str, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked_at = ?, revoked_reason = ?
            WHERE user_id = ? AND revoked_at IS NULL AND expires_at > ?
        "#;

        let result = sqlx::query(query)
            .bind(now)
            .bind(reason)
            .bind(user_id.to_string())
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(query_error("revoke user tokens"))?;

        Ok(result.rows_affected() as usize)
    }

    async fn rotate(&self, old_id: Uuid, successor: &RefreshToken, now: DateTime<Utc>) -> Result<RotationOutcome, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(query_error("begin rotation"))?;

        Self::insert(successor)
            .execute(&mut *tx)
            .await
            .map_err(query_error("insert successor token"))?;

        let retired = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = ?, revoked_reason = ?, replaced_by_token_id = ?
            WHERE id = ?
                AND revoked_at IS NULL
                AND replaced_by_token_id IS NULL
                AND expires_at > ?
            "#,
        )
        .bind(now)
        .bind(REVOKE_REASON_ROTATED)
        .bind(successor.id.to_string())
        .bind(old_id.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(query_error("retire rotated token"))?;

        if retired.rows_affected() != 1 {
            tx.rollback().await.map_err(query_error("roll back rotation"))?;
            tracing::debug!(token_id = %old_id, "Rotation guard failed; token no longer active");
            return Ok(RotationOutcome::Stale);
        }

        tx.commit().await.map_err(query_error("commit rotation"))?;
        Ok(RotationOutcome::Rotated)
    }
}
