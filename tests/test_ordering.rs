use chrono::{NaiveDate, TimeDelta};
use harness::all_times;
use pretty_assertions::assert_eq;
use std::time::Duration;
use water_meter_mock::{
    GeneratorError,
    config::Config,
    generator::TelegramGenerator,
    record_telegrams,
    telegram::StreamKind,
};

mod harness;

#[test]
fn zero_duration_yields_bootstrap_telegrams() -> anyhow::Result<()> {
    assert_eq!(
        vec![
            "Mobile telegram sent at 2024-01-01 00:00:00 Volume: 1e-6".to_owned(),
            "Static telegram sent at 2024-01-01 00:00:00 STATUS: OK".to_owned(),
        ],
        record_telegrams(0)?
    );
    Ok(())
}

#[test]
fn mobile_precedes_static_on_shared_timestamps() -> anyhow::Result<()> {
    let telegrams = record_telegrams(180)?;

    for hour in ["00", "01", "02", "03"] {
        let at = format!(" at 2024-01-01 {hour}:00:00 ");
        let kinds: Vec<_> = telegrams
            .iter()
            .filter(|telegram| telegram.contains(&at))
            .map(|telegram| telegram.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(vec!["Mobile", "Static"], kinds);
    }
    Ok(())
}

#[test]
fn telegrams_are_time_ordered() -> anyhow::Result<()> {
    let telegrams = record_telegrams(600)?;
    let times = all_times(&telegrams);

    assert_eq!(601 + 11, times.len());
    assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
    Ok(())
}

#[test]
fn repeated_runs_are_identical() -> anyhow::Result<()> {
    assert_eq!(record_telegrams(1440)?, record_telegrams(1440)?);
    Ok(())
}

#[test]
fn negative_duration_is_rejected() {
    assert_eq!(Err(GeneratorError::NegativeDuration(-1)), record_telegrams(-1));
}

#[test]
fn unrepresentable_duration_is_rejected() {
    assert_eq!(
        Err(GeneratorError::DurationOverflow(i64::MAX)),
        record_telegrams(i64::MAX)
    );
}

#[test]
fn concurrent_runs_do_not_interfere() -> anyhow::Result<()> {
    let expected = record_telegrams(120)?;

    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| record_telegrams(120)))
        .collect();
    for handle in handles {
        let telegrams = handle.join().expect("generator thread panicked")?;
        assert_eq!(expected, telegrams);
    }
    Ok(())
}

#[test]
fn runs_past_the_end_of_the_calendar_are_rejected() -> anyhow::Result<()> {
    let mut config = Config::default();
    config.start = NaiveDate::MAX.and_hms_opt(23, 0, 0).unwrap();
    config.jitter.mobile = Some(Duration::from_secs(20));
    let generator = TelegramGenerator::new(config)?;

    assert_eq!(
        Err(GeneratorError::DurationOverflow(60)),
        generator.record(60)
    );

    // The last representable minute still works, and jitter cannot push past it
    let telegrams = generator.telegrams(59)?;
    let end = generator.config().start + TimeDelta::minutes(59);
    assert_eq!(
        60,
        telegrams
            .iter()
            .filter(|telegram| telegram.kind() == StreamKind::Mobile)
            .count()
    );
    assert!(telegrams.iter().all(|telegram| telegram.timestamp() <= end));
    Ok(())
}
