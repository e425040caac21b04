use harness::volumes;
use water_meter_mock::record_telegrams;

mod harness;

#[test]
fn first_volume_is_the_start_sentinel() -> anyhow::Result<()> {
    let telegrams = record_telegrams(60)?;
    let first_volume: f64 = telegrams[0]
        .split_whitespace()
        .last()
        .expect("telegram has a payload")
        .parse()?;

    assert_eq!(1e-6, first_volume);
    assert_ne!(0.0, first_volume);
    Ok(())
}

#[test]
fn volume_increases_by_ten_per_minute() -> anyhow::Result<()> {
    let telegrams = record_telegrams(100)?;
    let volumes = volumes(&telegrams);
    assert_eq!(101, volumes.len());

    let mut errors = Vec::new();
    for i in 1..volumes.len() {
        let delta = volumes[i] - volumes[i - 1];
        if delta < 0.0 {
            errors.push(format!("Volume decreased at #{i}: {} -> {}", volumes[i - 1], volumes[i]));
        } else if (delta - 10.0).abs() > 0.01 {
            errors.push(format!("Unexpected increment at #{i}: got {delta}"));
        }
    }

    assert!(errors.is_empty(), "Volume errors:\n{}", errors.join("\n"));
    Ok(())
}

#[test]
fn hour_long_run_ends_at_six_hundred_units() -> anyhow::Result<()> {
    let telegrams = record_telegrams(60)?;
    let mobile: Vec<_> = telegrams
        .iter()
        .filter(|telegram| telegram.starts_with("Mobile"))
        .collect();

    assert_eq!(
        "Mobile telegram sent at 2024-01-01 00:01:00 Volume: 10.000001",
        mobile[1]
    );
    assert_eq!(
        "Mobile telegram sent at 2024-01-01 01:00:00 Volume: 600.000001",
        mobile[60]
    );
    Ok(())
}

#[test]
fn volume_does_not_drift_over_long_runs() -> anyhow::Result<()> {
    let telegrams = record_telegrams(100_000)?;
    let last = volumes(&telegrams).pop().expect("at least one mobile telegram");

    assert!((last - 1_000_000.000001).abs() < 1e-6, "got {last}");
    Ok(())
}
