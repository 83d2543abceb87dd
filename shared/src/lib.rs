//! Shared configuration and telemetry for SessionKeeper
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Tracing subscriber setup

pub mod config;
pub mod telemetry;

// Re-export commonly used items at crate root
pub use config::{AppConfig, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig};
pub use telemetry::init_tracing;
