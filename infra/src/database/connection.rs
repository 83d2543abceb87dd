//! Database connection pool management
//!
//! Wraps an SQLx MySQL pool with health checks, statistics and schema setup.

use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    ConnectOptions, MySqlPool,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::log::LevelFilter;

use sk_shared::DatabaseConfig;

use super::migrations::MIGRATIONS;
use crate::InfrastructureError;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DatabasePool {
    /// SQLx MySQL connection pool
    pool: MySqlPool,
}

impl DatabasePool {
    /// Create a new database connection pool
    ///
    /// # Arguments
    /// * `config` - Database configuration settings
    ///
    /// # Returns
    /// * `Result<Self, InfrastructureError>` - Database pool or error
    pub async fn new(config: DatabaseConfig) -> Result<Self, InfrastructureError> {
        tracing::info!(
            max_connections = config.max_connections,
            "Creating database connection pool"
        );

        let connect_options = MySqlConnectOptions::from_str(&config.url)
            .map_err(|e| InfrastructureError::Config(format!("Invalid database URL: {}", e)))?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(
                LevelFilter::Warn,
                Duration::from_millis(config.slow_query_threshold),
            );

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(Duration::from_secs(config.idle_timeout))
            .max_lifetime(Duration::from_secs(config.max_lifetime))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create database pool");
                InfrastructureError::Database(e)
            })?;

        tracing::info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    /// Get a reference to the underlying SQLx pool
    pub fn get_pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Check if the database connection is healthy
    ///
    /// # Returns
    /// * `Result<bool, InfrastructureError>` - True if healthy, error otherwise
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        tracing::debug!("Performing database health check");

        let result = sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database health check failed");
                InfrastructureError::Database(e)
            })?;

        let value: i32 = sqlx::Row::try_get(&result, 0).unwrap_or(0);

        if value == 1 {
            tracing::debug!("Database health check passed");
            Ok(true)
        } else {
            tracing::warn!(value = value, "Database health check returned unexpected value");
            Ok(false)
        }
    }

    /// Get connection pool statistics
    pub fn get_statistics(&self) -> PoolStatistics {
        PoolStatistics {
            connections: self.pool.size(),
            idle_connections: self.pool.num_idle(),
            max_connections: self.pool.options().get_max_connections(),
        }
    }

    /// Close all connections in the pool
    ///
    /// This should be called during application shutdown.
    pub async fn close(&self) {
        tracing::info!("Closing database connection pool");
        self.pool.close().await;
        tracing::info!("Database connection pool closed");
    }

    /// Create the tables the refresh token store needs
    ///
    /// Every statement is idempotent, so this is safe to call on each startup.
    pub async fn run_migrations(&self) -> Result<(), InfrastructureError> {
        tracing::info!("Running database migrations");

        for (name, statement) in MIGRATIONS {
            sqlx::query(statement).execute(&self.pool).await.map_err(|e| {
                tracing::error!(migration = *name, error = %e, "Migration failed");
                InfrastructureError::Database(e)
            })?;
            tracing::debug!(migration = *name, "Migration applied");
        }

        tracing::info!("Database migrations completed");
        Ok(())
    }
}

/// Connection pool statistics
#[derive(Debug, Clone)]
pub struct PoolStatistics {
    /// Total number of connections in the pool
    pub connections: u32,
    /// Number of idle connections
    pub idle_connections: usize,
    /// Maximum allowed connections
    pub max_connections: u32,
}

impl std::fmt::Display for PoolStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pool Stats: {}/{} connections ({} idle)",
            self.connections, self.max_connections, self.idle_connections
        )
    }
}
