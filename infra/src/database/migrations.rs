//! Schema for the refresh token store

/// Refresh token table
///
/// UUIDs are stored as `CHAR(36)`; timestamps keep microseconds so that a
/// bulk revocation writes one identical instant to every row.
pub const CREATE_REFRESH_TOKENS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS refresh_tokens (
    id CHAR(36) NOT NULL PRIMARY KEY,
    user_id CHAR(36) NOT NULL,
    token_hash CHAR(64) NOT NULL,
    created_at DATETIME(6) NOT NULL,
    expires_at DATETIME(6) NOT NULL,
    revoked_at DATETIME(6) NULL,
    revoked_reason VARCHAR(255) NULL,
    replaced_by_token_id CHAR(36) NULL,
    UNIQUE KEY uq_refresh_tokens_token_hash (token_hash),
    KEY idx_refresh_tokens_user_active (user_id, revoked_at, expires_at)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
"#;

/// Statements applied in order by `DatabasePool::run_migrations`
pub const MIGRATIONS: &[(&str, &str)] = &[("create_refresh_tokens", CREATE_REFRESH_TOKENS_TABLE)];
