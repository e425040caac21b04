use crate::{jitter::JitterConfig, verify::Tolerances};
use anyhow::{Error, ensure};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_start")]
    pub start: NaiveDateTime,
    #[serde(default = "default_tick", with = "humantime_serde")]
    pub tick: Duration,
    #[serde(default)]
    pub mobile: MobileConfig,
    #[serde(default, rename = "static")]
    pub static_: StaticConfig,
    #[serde(default)]
    pub jitter: JitterConfig,
    #[serde(default)]
    pub verify: Tolerances,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MobileConfig {
    #[serde(default = "default_mobile_interval", with = "humantime_serde")]
    pub interval: Duration,
    #[serde(default = "default_initial_volume")]
    pub initial_volume: f64,
    #[serde(default = "default_increment")]
    pub increment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticConfig {
    #[serde(default = "default_static_interval", with = "humantime_serde")]
    pub interval: Duration,
}

pub fn default_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .expect("2024-01-01 is a valid date")
        .and_time(NaiveTime::MIN)
}

fn default_tick() -> Duration {
    Duration::from_secs(60)
}

fn default_mobile_interval() -> Duration {
    Duration::from_secs(60)
}

/// Start sentinel. Deliberately not zero, so "measurement started" differs from "no flow".
fn default_initial_volume() -> f64 {
    1e-6
}

fn default_increment() -> f64 {
    10.0
}

fn default_static_interval() -> Duration {
    Duration::from_secs(3600)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start: default_start(),
            tick: default_tick(),
            mobile: Default::default(),
            static_: Default::default(),
            jitter: Default::default(),
            verify: Default::default(),
        }
    }
}

impl Default for MobileConfig {
    fn default() -> Self {
        Self {
            interval: default_mobile_interval(),
            initial_volume: default_initial_volume(),
            increment: default_increment(),
        }
    }
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            interval: default_static_interval(),
        }
    }
}

impl Config {
    /// Parses a YAML document into a validated [Config]
    pub fn parse_yaml(base: Value) -> anyhow::Result<Config> {
        // An empty file deserializes to null, which means "all defaults"
        let base = match base {
            Value::Null => Value::Mapping(Default::default()),
            Value::Mapping(_) => base,
            _ => return Err(Error::msg("config file must be a mapping")),
        };

        let config: Config = serde_yaml::from_value(base)?;
        config.validate()?;
        config.log();

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let tick = self.tick.as_secs();
        ensure!(tick > 0, "tick must be at least one second");
        if self.tick.subsec_nanos() != 0 {
            warn!(tick=?self.tick, "sub-second tick precision is ignored");
        }

        for (name, interval, amplitude) in [
            ("mobile", self.mobile.interval, self.jitter.mobile),
            ("static", self.static_.interval, self.jitter.static_),
        ] {
            let interval = interval.as_secs();
            ensure!(interval > 0, "{name} interval must be at least one second");
            ensure!(
                interval % tick == 0,
                "{name} interval of {interval}s is not a whole multiple of the {tick}s tick"
            );

            // Two neighbouring emissions could swap places at half an interval or more
            if let Some(amplitude) = amplitude {
                ensure!(
                    amplitude.subsec_nanos() == 0,
                    "{name} jitter of {amplitude:?} is not a whole number of seconds"
                );
                ensure!(
                    amplitude.as_secs().saturating_mul(2) < interval,
                    "{name} jitter of {}s must stay below half of the {interval}s interval",
                    amplitude.as_secs()
                );
            }
        }

        ensure!(
            self.mobile.initial_volume.is_finite() && self.mobile.initial_volume >= 0.0,
            "mobile initial volume must be a non-negative number"
        );
        ensure!(
            self.mobile.increment.is_finite() && self.mobile.increment >= 0.0,
            "mobile increment must be a non-negative number"
        );
        ensure!(
            self.verify.mobile_min_gap <= self.verify.mobile_max_gap
                && self.verify.static_min_gap <= self.verify.static_max_gap,
            "verification gap bounds must not be inverted"
        );

        Ok(())
    }

    fn log(&self) {
        info!(start=%self.start, tick=?self.tick, "simulation clock");
        info!(config=%serde_json::to_string(&self.mobile).unwrap_or_default(), "mobile stream");
        info!(config=%serde_json::to_string(&self.static_).unwrap_or_default(), "static stream");
        if self.jitter.is_enabled() {
            info!(config=%serde_json::to_string(&self.jitter).unwrap_or_default(), "timing jitter");
        }
    }
}
