//! # SessionKeeper Core
//!
//! Session lifecycle domain for SessionKeeper: access token signing,
//! refresh token rotation with reuse containment, and revocation.
//! This crate holds the domain entities, store and directory traits,
//! services, and error types; persistence backends live in `sk_infra`.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod errors;

// Re-export commonly used types for convenience
pub use domain::*;
pub use services::*;
pub use repositories::*;
pub use errors::*;
