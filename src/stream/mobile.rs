use super::{EmissionStream, Schedule};
use crate::{
    config::MobileConfig,
    jitter::JitterGenerator,
    telegram::{MobileReading, Telegram},
};
use chrono::NaiveDateTime;
use tracing::trace;

/// Volume-reporting stream. The first reading carries the start sentinel and every later one
/// adds exactly one increment.
#[derive(Debug, Clone)]
pub struct MobileStream {
    schedule: Schedule,
    initial_volume: f64,
    increment: f64,
    emitted: u64,
}

impl MobileStream {
    pub fn new(
        epoch: NaiveDateTime,
        end_secs: u64,
        cfg: &MobileConfig,
        jitter: JitterGenerator,
    ) -> Self {
        Self {
            schedule: Schedule::new(epoch, end_secs, cfg.interval.as_secs(), jitter),
            initial_volume: cfg.initial_volume,
            increment: cfg.increment,
            emitted: 0,
        }
    }

    fn volume(&self) -> f64 {
        // Derived from the emission count rather than summed, so rounding error cannot build up.
        self.initial_volume + self.emitted as f64 * self.increment
    }
}

impl EmissionStream for MobileStream {
    fn poll(&mut self, now_secs: u64, out: &mut Vec<Telegram>) {
        while let Some(timestamp) = self.schedule.next_due(now_secs) {
            let volume = self.volume();
            self.emitted += 1;

            trace!(%timestamp, volume, "mobile reading");
            out.push(Telegram::Mobile(MobileReading { timestamp, volume }));
        }
    }
}
