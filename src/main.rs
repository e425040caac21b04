use anyhow::bail;
use clap::Parser;
use std::{io, panic::set_hook};
use tracing::error;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    prelude::*,
};
use water_meter_mock::{Args, record_and_report};

fn main() -> anyhow::Result<()> {
    // Telegrams go to stdout, so logs stay on stderr
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .try_init()
        .expect("unable to set a global tracing subscriber");

    set_hook(Box::new(|panic| {
        if let Some(loc) = panic.location() {
            error!(
                message=%panic,
                panic.file=loc.file(),
                panic.line=loc.line(),
                panic.column=loc.column()
            );
        } else {
            error!(message=%panic);
        }
    }));

    let args = Args::parse();
    let generator = args.init()?;

    if let Some(report) = record_and_report(&args, &generator, io::stdout().lock())?
        && !report.passed()
    {
        let failures: Vec<_> = report
            .checks
            .iter()
            .flat_map(|check| check.failures.iter().map(move |f| format!("{}: {f}", check.name)))
            .collect();
        bail!("verification failed:\n{}", failures.join("\n"));
    }

    Ok(())
}
