use std::collections::HashMap;

use feed_core::clock::TimestampStrategy;
use feed_core::export::validate_dataset;
use feed_core::ids::IdScheme;
use feed_core::records::{Location, RequestStatus};
use feed_core::scenario::{generate_dataset, GenerationConfig, GenerationMode, DEFAULT_CENTER};
use feed_core::spatial::{haversine_km, GeoSampler, LocationStrategy};

fn config(seed: u64) -> GenerationConfig {
    GenerationConfig::default().with_seed(seed).with_counts(60, 150)
}

fn assert_clean(config: &GenerationConfig) {
    let dataset = generate_dataset(config).expect("config should validate");
    let violations = validate_dataset(&dataset.drivers, &dataset.requests);
    assert!(violations.is_empty(), "{violations:#?}");
}

#[test]
fn default_matched_dataset_has_no_violations() {
    assert_clean(&config(1));
}

#[test]
fn every_configuration_variant_has_no_violations() {
    assert_clean(&config(2).with_location_strategy(LocationStrategy::Gaussian));
    assert_clean(&config(3).with_timestamps(TimestampStrategy::HourWeighted {
        day_start: 1_700_000_000 - 1_700_000_000 % 86_400,
    }));
    assert_clean(&config(4).with_id_scheme(IdScheme::Uuid));
    assert_clean(&config(5).with_mode(GenerationMode::Paired));
    assert_clean(&config(6).with_matching_enabled(false));
}

#[test]
fn locations_stay_within_radius_bound() {
    for strategy in [LocationStrategy::UniformDisk, LocationStrategy::Gaussian] {
        let config = config(7).with_location_strategy(strategy);
        let bound = GeoSampler::try_new(config.city_center, config.city_radius_km, strategy)
            .unwrap()
            .max_offset_km()
            + 0.05;
        let dataset = generate_dataset(&config).unwrap();
        let points = dataset
            .drivers
            .iter()
            .map(|d| d.location)
            .chain(dataset.requests.iter().flat_map(|r| [r.pickup_location, r.dropoff_location]));
        for point in points {
            let distance = haversine_km(DEFAULT_CENTER, point);
            assert!(distance <= bound, "{point:?} is {distance} km out ({strategy:?})");
        }
    }
}

#[test]
fn estimates_respect_clamps() {
    let dataset = generate_dataset(&config(8)).unwrap();
    for request in &dataset.requests {
        let minutes = request.duration_estimate.unwrap() / 60;
        assert!((1..=90).contains(&minutes));
        let fare = request.fare_estimate.unwrap();
        assert!((5.0..=100.0).contains(&fare));
        assert_eq!((fare * 100.0).round() / 100.0, fare);
    }
}

#[test]
fn same_seed_reproduces_the_dataset() {
    let a = generate_dataset(&config(9)).unwrap();
    let b = generate_dataset(&config(9)).unwrap();
    let c = generate_dataset(&config(10)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a.requests, c.requests);
}

#[test]
fn uuid_scheme_changes_ids_but_not_records() {
    let sequential = generate_dataset(&config(11)).unwrap();
    let uuid = generate_dataset(&config(11).with_id_scheme(IdScheme::Uuid)).unwrap();
    assert_eq!(sequential.requests.len(), uuid.requests.len());
    for (s, u) in sequential.requests.iter().zip(&uuid.requests) {
        assert_eq!(s.pickup_location, u.pickup_location);
        assert_eq!(s.status, u.status);
        assert_ne!(s.request_id, u.request_id);
        assert_eq!(u.request_id.len(), 36);
    }
}

#[test]
fn paired_mode_sessions_map_one_to_one() {
    let config = config(12).with_mode(GenerationMode::Paired);
    let dataset = generate_dataset(&config).unwrap();

    let mut sessions: HashMap<&str, &str> = HashMap::new();
    let mut drivers: HashMap<&str, &str> = HashMap::new();
    for event in &dataset.drivers {
        assert_eq!(
            *sessions.entry(&event.driver_id).or_insert(&event.driver_session_id),
            event.driver_session_id
        );
        assert_eq!(
            *drivers.entry(&event.driver_session_id).or_insert(&event.driver_id),
            event.driver_id
        );
    }
    // Reuse probability 0.5 over 150 records.
    assert!(sessions.len() < dataset.drivers.len());

    for (event, request) in dataset.drivers.iter().zip(&dataset.requests) {
        assert_eq!(request.status, RequestStatus::Accepted);
        assert_eq!(request.driver_id.as_deref(), Some(event.driver_id.as_str()));
    }
}

#[test]
fn ride_ids_link_at_most_one_driver_event() {
    let dataset = generate_dataset(&config(13).with_mode(GenerationMode::Paired)).unwrap();
    let mut seen = std::collections::HashSet::new();
    for event in &dataset.drivers {
        let ride = event.ride_id.as_deref().expect("paired events are engaged");
        assert!(seen.insert(ride), "ride {ride} reused");
    }
}

#[test]
fn custom_center_moves_every_point() {
    let london = Location::new(51.5074, -0.1278);
    let config = config(14).with_city(london, 5.0);
    let dataset = generate_dataset(&config).unwrap();
    for driver in &dataset.drivers {
        assert!(haversine_km(london, driver.location) <= 5.05);
    }
}
