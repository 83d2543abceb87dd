//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Token signing secret, claims and lifetimes
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration

pub mod auth;
pub mod database;
pub mod environment;

use serde::{Deserialize, Serialize};

pub use auth::{JwtConfig, DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES, DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Token signing configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the process environment, reading `.env` first if present
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        let mut logging = LoggingConfig::for_environment(environment);
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            logging.level = level;
        }

        Self {
            environment,
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            logging,
        }
    }
}
