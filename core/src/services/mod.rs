//! Business services containing domain logic and use cases.

pub mod clock;
pub mod random;
pub mod session;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use random::{OsSecureRandom, SecureRandom};
pub use session::SessionService;
pub use token::TokenSigner;
