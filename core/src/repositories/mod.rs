pub mod token;
pub mod user;

pub use token::{InMemoryRefreshTokenStore, RefreshTokenStore, RotationOutcome};
pub use user::{CredentialCheck, UserDirectory};
