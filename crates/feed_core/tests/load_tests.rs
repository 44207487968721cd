//! Full-size runs. Ignored by default; run with `cargo run -p xtask -- load-test`.

use std::time::Instant;

use feed_core::export::{read_passenger_requests_parquet, validate_dataset};
use feed_core::scenario::{run, GenerationConfig, GenerationMode};

#[test]
#[ignore]
fn default_sized_matched_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = GenerationConfig::default()
        .with_seed(2024)
        .with_output_dir(dir.path());

    let started = Instant::now();
    let dataset = run(&config).expect("default run should succeed");
    eprintln!("matched run took {:?}", started.elapsed());

    assert_eq!(dataset.drivers.len(), 5_000);
    assert_eq!(dataset.requests.len(), 10_000);
    assert!(validate_dataset(&dataset.drivers, &dataset.requests).is_empty());
    assert_eq!(
        read_passenger_requests_parquet(&config.outputs.requests_parquet).unwrap(),
        dataset.requests
    );
}

#[test]
#[ignore]
fn large_paired_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = GenerationConfig::default()
        .with_seed(2025)
        .with_mode(GenerationMode::Paired)
        .with_counts(0, 50_000)
        .with_output_dir(dir.path());

    let started = Instant::now();
    let dataset = run(&config).expect("paired run should succeed");
    eprintln!("paired run took {:?}", started.elapsed());

    assert_eq!(dataset.drivers.len(), 50_000);
    assert!(validate_dataset(&dataset.drivers, &dataset.requests).is_empty());
}
