use std::path::Path;

use feed_core::generator::FeedGenerator;
use feed_core::records::{DriverEvent, DriverStatus, PassengerRequest};
use feed_core::scenario::GenerationConfig;
use feed_core::test_helpers::seeded_generator;

/// Seeded config with small counts, writing into `dir`.
pub fn small_run_config(dir: &Path, seed: u64) -> GenerationConfig {
    GenerationConfig::default()
        .with_seed(seed)
        .with_counts(25, 60)
        .with_output_dir(dir)
}

/// `n` generated drivers, all forced to `available`.
pub fn available_fleet(generator: &mut FeedGenerator, n: usize) -> Vec<DriverEvent> {
    let mut drivers = generator.generate_fleet(n);
    for driver in &mut drivers {
        driver.release();
    }
    drivers
}

pub fn generator_with_seed(seed: u64) -> FeedGenerator {
    seeded_generator(&GenerationConfig::default().with_seed(seed))
}

pub fn count_status(requests: &[PassengerRequest], status: feed_core::records::RequestStatus) -> usize {
    requests.iter().filter(|r| r.status == status).count()
}

pub fn all_available(drivers: &[DriverEvent]) -> bool {
    drivers
        .iter()
        .all(|d| d.status == DriverStatus::Available && d.ride_id.is_none())
}
