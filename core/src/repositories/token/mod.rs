pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod memory;

pub use memory::InMemoryRefreshTokenStore;
pub use r#trait::{RefreshTokenStore, RotationOutcome};

#[cfg(test)]
mod tests;
