//! Logical clock driving a single simulation run
use std::time::Duration;

/// Simulated time in whole seconds since the configured epoch.
///
/// The clock never consults wall-clock time and only moves forward in fixed ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedClock {
    elapsed_secs: u64,
    tick_secs: u64,
}

impl SimulatedClock {
    pub fn new(tick: Duration) -> Self {
        Self {
            elapsed_secs: 0,
            tick_secs: tick.as_secs().max(1),
        }
    }

    pub fn now(&self) -> u64 {
        self.elapsed_secs
    }

    /// Advances by one tick without passing `end`. Returns `false` once the clock already sits at `end`.
    pub fn advance_until(&mut self, end: u64) -> bool {
        if self.elapsed_secs >= end {
            return false;
        }

        self.elapsed_secs = self
            .elapsed_secs
            .checked_add(self.tick_secs)
            .expect("simulated clock overflowed")
            .min(end);
        true
    }
}
