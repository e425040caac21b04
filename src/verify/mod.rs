//! Harness checks over a recorded telegram sequence
//!
//! Every check only looks at rendered telegrams and records what it measured as named
//! [Artifact]s, so a failing run can be inspected without rerunning the generator.
use anyhow::Context;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};
use tracing::{info, warn};

mod parse;

pub use parse::{ParsedTelegram, Payload, parse_telegram};

pub const MOBILE_TIMING: &str = "mobile telegram timing";
pub const STATIC_STATUS: &str = "static telegram status";
pub const STATIC_TIMING: &str = "static telegram timing";
pub const FIRST_VOLUME: &str = "first mobile volume";
pub const VOLUME_INCREMENTS: &str = "mobile volume increments";

pub const MOBILE_GAPS_ARTIFACT: &str = "Time Differences Between Mobile Telegrams";
pub const STATIC_TELEGRAMS_ARTIFACT: &str = "All Static Telegrams";
pub const BAD_STATUS_ARTIFACT: &str = "Static Telegrams with Incorrect Status";
pub const STATIC_INTERVALS_ARTIFACT: &str = "Static Telegram Intervals";

const EXPECTED_STATUS: &str = "OK";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    #[serde(default = "default_mobile_min_gap", with = "humantime_serde")]
    pub mobile_min_gap: Duration,
    #[serde(default = "default_mobile_max_gap", with = "humantime_serde")]
    pub mobile_max_gap: Duration,
    #[serde(default = "default_static_min_gap", with = "humantime_serde")]
    pub static_min_gap: Duration,
    #[serde(default = "default_static_max_gap", with = "humantime_serde")]
    pub static_max_gap: Duration,
    #[serde(default = "default_first_volume")]
    pub first_volume: f64,
    #[serde(default = "default_volume_increment")]
    pub volume_increment: f64,
    #[serde(default = "default_volume_tolerance")]
    pub volume_tolerance: f64,
}

fn default_mobile_min_gap() -> Duration {
    Duration::from_secs(54)
}

fn default_mobile_max_gap() -> Duration {
    Duration::from_secs(66)
}

fn default_static_min_gap() -> Duration {
    Duration::from_secs(3540)
}

fn default_static_max_gap() -> Duration {
    Duration::from_secs(3660)
}

fn default_first_volume() -> f64 {
    1e-6
}

fn default_volume_increment() -> f64 {
    10.0
}

fn default_volume_tolerance() -> f64 {
    0.01
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            mobile_min_gap: default_mobile_min_gap(),
            mobile_max_gap: default_mobile_max_gap(),
            static_min_gap: default_static_min_gap(),
            static_max_gap: default_static_max_gap(),
            first_volume: default_first_volume(),
            volume_increment: default_volume_increment(),
            volume_tolerance: default_volume_tolerance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub failures: Vec<String>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A named text attachment describing what a check measured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub name: &'static str,
    pub body: String,
}

impl Artifact {
    /// File name used when writing the artifact to disk, e.g. `all-static-telegrams.txt`
    pub fn file_name(&self) -> String {
        let slug: Vec<String> = self
            .name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        format!("{}.txt", slug.join("-"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub checks: Vec<CheckOutcome>,
    #[serde(skip)]
    pub artifacts: Vec<Artifact>,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(CheckOutcome::passed)
    }

    pub fn check(&self, name: &str) -> Option<&CheckOutcome> {
        self.checks.iter().find(|check| check.name == name)
    }

    pub fn artifact(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|artifact| artifact.name == name)
    }

    /// Writes every artifact as a text file and the check outcomes as `report.json`.
    pub fn write_artifacts(&self, dir: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create artifact directory {}", dir.display()))?;

        for artifact in &self.artifacts {
            let path = dir.join(artifact.file_name());
            fs::write(&path, &artifact.body)
                .with_context(|| format!("failed to write artifact {}", path.display()))?;
        }

        let path = dir.join("report.json");
        fs::write(&path, serde_json::to_vec_pretty(self)?)
            .with_context(|| format!("failed to write report {}", path.display()))?;

        info!(dir=%dir.display(), n_artifacts = self.artifacts.len(), "wrote diagnostic artifacts");
        Ok(())
    }

    fn attach(&mut self, name: &'static str, body: String) {
        self.artifacts.push(Artifact { name, body });
    }

    fn record(&mut self, name: &'static str, failures: Vec<String>) {
        if failures.is_empty() {
            info!(check = name, "passed");
        } else {
            warn!(check = name, n_failures = failures.len(), "failed");
        }
        self.checks.push(CheckOutcome { name, failures });
    }
}

/// Parses `telegrams` and runs every harness check against them.
///
/// Only malformed telegrams are errors. Failed checks are reported through the returned [Report].
pub fn verify<S: AsRef<str>>(telegrams: &[S], tolerances: &Tolerances) -> anyhow::Result<Report> {
    let parsed = telegrams
        .iter()
        .map(|line| parse_telegram(line.as_ref()))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut mobile_times = Vec::new();
    let mut volumes = Vec::new();
    let mut static_times = Vec::new();
    let mut static_lines = Vec::new();
    let mut bad_status_lines = Vec::new();

    for (telegram, line) in parsed.iter().zip(telegrams) {
        match &telegram.payload {
            Payload::Volume(volume) => {
                mobile_times.push(telegram.timestamp);
                volumes.push(*volume);
            }
            Payload::Status(status) => {
                static_times.push(telegram.timestamp);
                static_lines.push(line.as_ref());
                if status != EXPECTED_STATUS {
                    bad_status_lines.push(line.as_ref());
                }
            }
        }
    }

    let mut report = Report::default();
    check_mobile_timing(&mut report, &mobile_times, tolerances);
    check_static_status(&mut report, &static_lines, &bad_status_lines);
    check_static_timing(&mut report, &static_times, tolerances);
    check_first_volume(&mut report, &parsed, tolerances);
    check_volume_increments(&mut report, &volumes, tolerances);

    Ok(report)
}

fn gaps_secs(times: &[NaiveDateTime]) -> Vec<f64> {
    times
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_seconds() as f64)
        .collect()
}

fn within(gap: f64, min: Duration, max: Duration) -> bool {
    (min.as_secs_f64()..=max.as_secs_f64()).contains(&gap)
}

fn check_mobile_timing(report: &mut Report, times: &[NaiveDateTime], tolerances: &Tolerances) {
    let gaps = gaps_secs(times);
    report.attach(
        MOBILE_GAPS_ARTIFACT,
        gaps.iter()
            .map(|gap| gap.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
    );

    let failures = gaps
        .iter()
        .filter(|gap| !within(**gap, tolerances.mobile_min_gap, tolerances.mobile_max_gap))
        .map(|gap| format!("Telegram time diff {gap}s out of bounds"))
        .collect();
    report.record(MOBILE_TIMING, failures);
}

fn check_static_status(report: &mut Report, static_lines: &[&str], bad_status_lines: &[&str]) {
    report.attach(STATIC_TELEGRAMS_ARTIFACT, static_lines.join("\n"));

    let mut failures = Vec::new();
    if !bad_status_lines.is_empty() {
        report.attach(BAD_STATUS_ARTIFACT, bad_status_lines.join("\n"));
        failures.push(format!(
            "{} static telegram(s) had incorrect status.",
            bad_status_lines.len()
        ));
    }
    report.record(STATIC_STATUS, failures);
}

fn check_static_timing(report: &mut Report, times: &[NaiveDateTime], tolerances: &Tolerances) {
    let gaps = gaps_secs(times);
    report.attach(
        STATIC_INTERVALS_ARTIFACT,
        gaps.iter()
            .map(|gap| format!("{gap:.1} seconds"))
            .collect::<Vec<_>>()
            .join("\n"),
    );

    let failures = gaps
        .iter()
        .filter(|gap| !within(**gap, tolerances.static_min_gap, tolerances.static_max_gap))
        .map(|gap| format!("Static telegram timing incorrect: interval = {gap:.1} seconds"))
        .collect();
    report.record(STATIC_TIMING, failures);
}

fn check_first_volume(report: &mut Report, parsed: &[ParsedTelegram], tolerances: &Tolerances) {
    // The very first telegram must carry the volume, which also pins Mobile ahead of Static at t=0
    let failures = match parsed.first().map(|telegram| &telegram.payload) {
        Some(Payload::Volume(volume)) if *volume == tolerances.first_volume => Vec::new(),
        Some(Payload::Volume(volume)) => vec![format!(
            "First volume should be {}, got {volume}",
            tolerances.first_volume
        )],
        Some(Payload::Status(_)) => vec!["First telegram is not a mobile telegram".to_owned()],
        None => vec!["No telegram was recorded".to_owned()],
    };
    report.record(FIRST_VOLUME, failures);
}

fn check_volume_increments(report: &mut Report, volumes: &[f64], tolerances: &Tolerances) {
    let mut failures = Vec::new();

    for (i, pair) in volumes.windows(2).enumerate() {
        let delta = pair[1] - pair[0];
        if delta < 0.0 {
            failures.push(format!(
                "Volume decreased at #{}: {} -> {}",
                i + 1,
                pair[0],
                pair[1]
            ));
        } else if (delta - tolerances.volume_increment).abs() > tolerances.volume_tolerance {
            failures.push(format!("Unexpected increment at #{}: got {delta}", i + 1));
        }
    }
    report.record(VOLUME_INCREMENTS, failures);
}
