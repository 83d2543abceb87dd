//! Deterministic time and randomness sources for tests

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::clock::Clock;
use super::random::SecureRandom;

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// A fixed, second-aligned starting instant
    pub fn fixed() -> Self {
        Self::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Byte source producing a distinct, predictable fill on every call
pub struct FixedRandom {
    next: AtomicU8,
}

impl FixedRandom {
    pub fn new(seed: u8) -> Self {
        Self { next: AtomicU8::new(seed) }
    }
}

impl Default for FixedRandom {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SecureRandom for FixedRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        let fill = self.next.fetch_add(1, Ordering::SeqCst);
        for (i, byte) in dest.iter_mut().enumerate() {
            *byte = fill.wrapping_add(i as u8);
        }
    }
}
