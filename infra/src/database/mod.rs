//! Database module - MySQL implementations using SQLx
//!
//! This module provides:
//! - Connection pool management
//! - The refresh token schema
//! - The MySQL refresh token store with transactional rotation

pub mod connection;
pub mod migrations;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlRefreshTokenStore;
