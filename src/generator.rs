//! Telegram generation over a logical clock
use crate::{
    clock::SimulatedClock,
    config::Config,
    jitter::JitterGenerator,
    stream::{EmissionStream, MobileStream, StaticStream},
    telegram::Telegram,
};
use chrono::TimeDelta;
use thiserror::Error;
use tracing::debug;

const SECS_PER_MINUTE: i64 = 60;

/// Invalid arguments to a generator run. Raised before any telegram is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("duration must not be negative, got {0} minutes")]
    NegativeDuration(i64),
    #[error("duration of {0} minutes runs past the representable time range")]
    DurationOverflow(i64),
}

/// Simulates one meter for a requested number of minutes.
///
/// Each call to [TelegramGenerator::telegrams] owns a fresh clock, fresh streams and freshly
/// seeded jitter, so repeated calls with the same duration produce identical output.
#[derive(Debug, Clone)]
pub struct TelegramGenerator {
    config: Config,
}

impl Default for TelegramGenerator {
    fn default() -> Self {
        Self {
            config: Config::default(),
        }
    }
}

impl TelegramGenerator {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generates every telegram emitted in `[0, duration_minutes]`, ordered by timestamp with
    /// Mobile telegrams ahead of Static ones that share a timestamp.
    pub fn telegrams(&self, duration_minutes: i64) -> Result<Vec<Telegram>, GeneratorError> {
        let end_secs = self.end_secs(duration_minutes)?;
        let jitter = &self.config.jitter;

        let mut streams: [Box<dyn EmissionStream>; 2] = [
            Box::new(MobileStream::new(
                self.config.start,
                end_secs,
                &self.config.mobile,
                JitterGenerator::new(jitter.mobile, jitter.seed),
            )),
            Box::new(StaticStream::new(
                self.config.start,
                end_secs,
                &self.config.static_,
                JitterGenerator::new(jitter.static_, jitter.seed.wrapping_add(1)),
            )),
        ];

        let mut clock = SimulatedClock::new(self.config.tick);
        let mut telegrams = Vec::new();
        loop {
            for stream in streams.iter_mut() {
                stream.poll(clock.now(), &mut telegrams);
            }
            if !clock.advance_until(end_secs) {
                break;
            }
        }

        // Jitter can move an emission past a neighbour from the other stream, so merge explicitly.
        // The sort is stable, which keeps each stream's own order intact.
        telegrams.sort_by_key(Telegram::order_key);

        debug!(
            duration_minutes,
            n_telegrams = telegrams.len(),
            "generated telegrams"
        );

        Ok(telegrams)
    }

    /// Generates and renders every telegram emitted in `[0, duration_minutes]`.
    pub fn record(&self, duration_minutes: i64) -> Result<Vec<String>, GeneratorError> {
        Ok(self
            .telegrams(duration_minutes)?
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    /// Resolves the run length in seconds and checks that the end of the run stays
    /// representable. Jittered emissions are clamped to the run, so they need no headroom.
    fn end_secs(&self, duration_minutes: i64) -> Result<u64, GeneratorError> {
        if duration_minutes < 0 {
            return Err(GeneratorError::NegativeDuration(duration_minutes));
        }

        let overflow = GeneratorError::DurationOverflow(duration_minutes);
        let end_secs = duration_minutes
            .checked_mul(SECS_PER_MINUTE)
            .ok_or(overflow)?;

        TimeDelta::try_seconds(end_secs)
            .and_then(|end| self.config.start.checked_add_signed(end))
            .ok_or(overflow)?;

        Ok(end_secs as u64)
    }
}

/// Records the telegrams of a default meter over `duration_minutes`.
pub fn record_telegrams(duration_minutes: i64) -> Result<Vec<String>, GeneratorError> {
    TelegramGenerator::default().record(duration_minutes)
}
