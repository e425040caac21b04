//! Periodic emission streams
use crate::{jitter::JitterGenerator, telegram::Telegram};
use chrono::{NaiveDateTime, TimeDelta};

mod mobile;
mod static_stream;

pub use mobile::MobileStream;
pub use static_stream::StaticStream;

/// A periodic event source polled by the generator's clock loop.
pub trait EmissionStream {
    /// Pushes every telegram whose nominal emission time is at or before `now_secs`.
    fn poll(&mut self, now_secs: u64, out: &mut Vec<Telegram>);
}

/// Fixed-period schedule shared by both streams.
///
/// Nominal times are always whole multiples of the interval, so jitter offsets never accumulate.
/// Emissions never leave the `[0, end_secs]` window of the run.
#[derive(Debug, Clone)]
struct Schedule {
    epoch: NaiveDateTime,
    end_secs: u64,
    interval_secs: u64,
    next_due_secs: u64,
    jitter: JitterGenerator,
}

impl Schedule {
    fn new(
        epoch: NaiveDateTime,
        end_secs: u64,
        interval_secs: u64,
        jitter: JitterGenerator,
    ) -> Self {
        Self {
            epoch,
            end_secs,
            interval_secs,
            next_due_secs: 0,
            jitter,
        }
    }

    /// Returns the emission timestamp of the next due event, if any.
    fn next_due(&mut self, now_secs: u64) -> Option<NaiveDateTime> {
        if self.next_due_secs > now_secs.min(self.end_secs) {
            return None;
        }

        let emitted_secs = self.jitter.perturb(self.next_due_secs, self.end_secs);
        self.next_due_secs = self
            .next_due_secs
            .checked_add(self.interval_secs)
            .expect("stream schedule overflowed");

        let offset = i64::try_from(emitted_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .expect("emission offsets are bounded by the validated duration");
        Some(
            self.epoch
                .checked_add_signed(offset)
                .expect("emission timestamps are bounded by the validated duration"),
        )
    }
}
