//! Value objects representing immutable domain concepts.

pub mod auth_result;
pub mod requests;

// Re-export commonly used types
pub use auth_result::{AuthOutcome, AuthResult, ChangePasswordResult};
pub use requests::{ChangePasswordRequest, LoginRequest, RegisterRequest};
