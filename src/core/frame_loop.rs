//! Fixed-tick accumulator scheduler.
//!
//! Elapsed wall time is added to an accumulator; every whole tick interval in
//! it pays for exactly one update + render pass. After a stall the loop
//! catches up at most `max_catch_up` ticks and drops the rest, so movement
//! never time-warps.

use std::time::Duration;

use super::constants::{MAX_CATCH_UP_TICKS, TICKS_PER_SECOND};

#[derive(Debug, Clone)]
pub struct FrameLoop {
    interval: Duration,
    accumulator: Duration,
    max_catch_up: u32,
}

impl FrameLoop {
    pub fn new(ticks_per_second: u32, max_catch_up: u32) -> Self {
        let ticks_per_second = ticks_per_second.max(1);
        Self {
            interval: Duration::from_secs_f64(1.0 / ticks_per_second as f64),
            accumulator: Duration::ZERO,
            max_catch_up: max_catch_up.max(1),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Adds `elapsed` to the accumulator and returns how many ticks are due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;

        let mut due = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            due += 1;

            if due == self.max_catch_up {
                // Stall: forget the backlog instead of replaying it.
                if self.accumulator >= self.interval {
                    self.accumulator = Duration::ZERO;
                }
                break;
            }
        }
        due
    }

    /// Time left until the next tick is due.
    pub fn until_next_tick(&self) -> Duration {
        self.interval.saturating_sub(self.accumulator)
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(TICKS_PER_SECOND, MAX_CATCH_UP_TICKS)
    }
}
