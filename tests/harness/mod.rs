#![allow(dead_code)]

use chrono::NaiveDateTime;
use std::path::PathBuf;
use water_meter_mock::{Args, generator::TelegramGenerator};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Builds the CLI arguments for a run over `duration_minutes`, optionally configured by a YAML
/// file located in `tests/data/config`.
pub fn args(config_file_name: Option<&str>, duration_minutes: i64) -> Args {
    let pkg_root = env!("CARGO_MANIFEST_DIR");
    Args {
        config: config_file_name
            .map(|name| PathBuf::from(format!("{pkg_root}/tests/data/config/{name}"))),
        duration_minutes,
        verify: false,
        artifacts: None,
    }
}

/// Initializes a generator from the optional config file name that maps to a YAML config located
/// in `tests/data/config`.
///
/// If no config file name is provided, the default will be used.
pub fn initialize(config_file_name: Option<&str>) -> anyhow::Result<TelegramGenerator> {
    args(config_file_name, 0).init()
}

// The helpers below read telegrams purely as text, the same way downstream harnesses split them.

fn parse_timestamp(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .unwrap_or_else(|err| panic!("invalid timestamp {raw:?}: {err}"))
}

pub fn mobile_times(telegrams: &[String]) -> Vec<NaiveDateTime> {
    telegrams
        .iter()
        .filter(|telegram| telegram.contains("Mobile telegram"))
        .map(|telegram| {
            let after_at = telegram.split(" at ").nth(1).expect("mobile telegram has ' at '");
            parse_timestamp(after_at.split(" Volume:").next().unwrap())
        })
        .collect()
}

pub fn static_times(telegrams: &[String]) -> Vec<NaiveDateTime> {
    telegrams
        .iter()
        .filter(|telegram| telegram.starts_with("Static"))
        .map(|telegram| {
            let after_at = telegram.split(" at ").nth(1).expect("static telegram has ' at '");
            parse_timestamp(after_at.split(" STATUS").next().unwrap())
        })
        .collect()
}

pub fn all_times(telegrams: &[String]) -> Vec<NaiveDateTime> {
    telegrams
        .iter()
        .map(|telegram| {
            let after_at = telegram.split(" at ").nth(1).expect("telegram has ' at '");
            parse_timestamp(&after_at[..19])
        })
        .collect()
}

pub fn volumes(telegrams: &[String]) -> Vec<f64> {
    telegrams
        .iter()
        .filter(|telegram| telegram.starts_with("Mobile"))
        .map(|telegram| {
            telegram
                .split_whitespace()
                .last()
                .and_then(|volume| volume.parse().ok())
                .unwrap_or_else(|| panic!("no volume in {telegram:?}"))
        })
        .collect()
}

pub fn gaps_secs(times: &[NaiveDateTime]) -> Vec<i64> {
    times
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds())
        .collect()
}
