//! Bounded timing jitter for telegram emissions
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JitterConfig {
    #[serde(default)]
    pub seed: u64,
    #[serde(default, with = "humantime_serde")]
    pub mobile: Option<Duration>,
    #[serde(default, rename = "static", with = "humantime_serde")]
    pub static_: Option<Duration>,
}

impl JitterConfig {
    pub fn is_enabled(&self) -> bool {
        self.mobile.is_some_and(|amplitude| amplitude.as_secs() > 0)
            || self.static_.is_some_and(|amplitude| amplitude.as_secs() > 0)
    }
}

/// Draws per-emission offsets around a nominal tick.
///
/// A generator without an amplitude always yields zero and never touches its RNG, so the
/// exact-tick path stays independent of the seed.
#[derive(Debug, Clone)]
pub struct JitterGenerator {
    amplitude_secs: i64,
    rng: StdRng,
}

impl JitterGenerator {
    pub fn new(amplitude: Option<Duration>, seed: u64) -> Self {
        Self {
            amplitude_secs: amplitude.map_or(0, |amplitude| amplitude.as_secs() as i64),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn offset_secs(&mut self) -> i64 {
        if self.amplitude_secs == 0 {
            return 0;
        }

        self.rng
            .random_range(-self.amplitude_secs..=self.amplitude_secs)
    }

    /// Applies an offset to a nominal emission time, clamped to the run's `[0, end_secs]` window.
    pub fn perturb(&mut self, nominal_secs: u64, end_secs: u64) -> u64 {
        nominal_secs
            .saturating_add_signed(self.offset_secs())
            .min(end_secs)
    }
}
