//! Time adapters.
//!
//! Code crash if there is a physical inconsistency (unrecoverable state).

use std::sync::atomic::{AtomicU64, Ordering};

use application::ports::outbound::Clock;

/// System clock using the OS time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time before Unix epoch")
            .as_secs()
    }
}

/// Manually driven clock for tests and deterministic harnesses.
#[derive(Default)]
pub struct FixedClock {
    timestamp: AtomicU64,
}

impl FixedClock {
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp: AtomicU64::new(timestamp),
        }
    }

    /// Move the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.timestamp.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.timestamp.load(Ordering::SeqCst)
    }
}
