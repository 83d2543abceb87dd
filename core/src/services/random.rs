//! Cryptographically secure randomness for refresh token values

use rand::rngs::OsRng;
use rand::RngCore;

/// Source of unpredictable bytes
pub trait SecureRandom: Send + Sync {
    fn fill_bytes(&self, dest: &mut [u8]);
}

/// Operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsSecureRandom;

impl SecureRandom for OsSecureRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        OsRng.fill_bytes(dest);
    }
}
