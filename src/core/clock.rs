//! Millisecond time source shared by the frame loop and the modes.

use std::time::Instant;

/// Monotonic milliseconds since some fixed origin.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from the moment it was created. Copies share the origin.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Returns true once at least `cooldown_ms` have passed since `last_ms`.
///
/// A `now_ms` earlier than `last_ms` (clock handed in out of order) never
/// satisfies the cooldown.
pub fn cooldown_elapsed(last_ms: u64, now_ms: u64, cooldown_ms: u64) -> bool {
    now_ms >= last_ms && now_ms - last_ms >= cooldown_ms
}
