//! Session lifecycle service
//!
//! Registration, login, refresh-token rotation with reuse containment,
//! revocation and password changes.

mod service;

#[cfg(test)]
mod tests;

pub use service::SessionService;
