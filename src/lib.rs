use config::Config;
use generator::TelegramGenerator;
use std::{fs, io::Write, path::PathBuf};
use tracing::info;
use verify::{Report, verify};

pub mod clock;
pub mod config;
pub mod generator;
pub mod jitter;
pub mod stream;
pub mod telegram;
pub mod verify;

pub use generator::{GeneratorError, record_telegrams};

/// A deterministic water-meter telegram emitter.
#[derive(Debug, clap::Parser)]
#[clap(about, name = "water-meter-mock", long_about = None)]
pub struct Args {
    /// Path to the config file that should be used to configure the simulated meter
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Simulated duration in minutes
    #[arg(short, long, allow_negative_numbers = true)]
    pub duration_minutes: i64,

    /// Run the harness checks against the recorded telegrams
    #[arg(long)]
    pub verify: bool,

    /// Directory to write diagnostic artifacts into. Implies `--verify`
    #[arg(short, long)]
    pub artifacts: Option<PathBuf>,
}

impl Args {
    /// Load and validate the configuration based on command line args
    pub fn init(&self) -> anyhow::Result<TelegramGenerator> {
        let config = match &self.config {
            Some(path) => {
                info!(path=%path.display(), "loading and parsing config file");
                Config::parse_yaml(serde_yaml::from_slice(&fs::read(path)?)?)?
            }
            None => {
                info!("using default config");
                Config::default()
            }
        };

        TelegramGenerator::new(config)
    }

    pub fn should_verify(&self) -> bool {
        self.verify || self.artifacts.is_some()
    }
}

/// Records telegrams for the requested duration, writes them to `out` one per line and runs
/// the harness checks when requested.
///
/// Nothing is written when the duration is rejected.
pub fn record_and_report(
    args: &Args,
    generator: &TelegramGenerator,
    mut out: impl Write,
) -> anyhow::Result<Option<Report>> {
    let telegrams = generator.record(args.duration_minutes)?;
    info!(
        duration_minutes = args.duration_minutes,
        n_telegrams = telegrams.len(),
        "recorded telegrams"
    );

    for telegram in &telegrams {
        writeln!(out, "{telegram}")?;
    }
    out.flush()?;

    if !args.should_verify() {
        return Ok(None);
    }

    let report = verify(&telegrams, &generator.config().verify)?;
    if let Some(dir) = &args.artifacts {
        report.write_artifacts(dir)?;
    }

    Ok(Some(report))
}
