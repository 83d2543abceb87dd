//! Token signing module
//!
//! Mints HS256 access tokens and generates refresh token values. Nothing
//! here touches persistence; storing refresh tokens is the session
//! service's job.

mod signer;


pub use signer::TokenSigner;
