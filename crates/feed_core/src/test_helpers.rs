//! Test helpers for hand-built records and seeded generators.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::generator::FeedGenerator;
use crate::ids::SequentialIds;
use crate::records::{
    DriverEvent, DriverStatus, Location, PassengerRequest, RequestStatus, RideType,
    TrafficCondition, VehicleType,
};
use crate::scenario::{GenerationConfig, DEFAULT_CENTER};

pub const TEST_SEED: u64 = 42;

/// An available sedan at the default city center, ids derived from `index`.
pub fn available_driver(index: usize) -> DriverEvent {
    DriverEvent {
        event_id: format!("E{index:06}"),
        driver_id: format!("D{index:06}"),
        timestamp: 1_600_000_000 + index as i64,
        location: DEFAULT_CENTER,
        status: DriverStatus::Available,
        ride_id: None,
        vehicle_type: VehicleType::Sedan,
        driver_session_id: format!("S{index:06}"),
        traffic_condition: Some(TrafficCondition::Light),
    }
}

/// A pending standard ride from the center to a point about 1.1 km north.
pub fn pending_request(index: usize) -> PassengerRequest {
    PassengerRequest {
        request_id: format!("REQ{index:06}"),
        passenger_id: format!("P{index:06}"),
        timestamp: 1_600_000_000 + index as i64,
        pickup_location: DEFAULT_CENTER,
        dropoff_location: Location::new(DEFAULT_CENTER.latitude + 0.01, DEFAULT_CENTER.longitude),
        status: RequestStatus::Requested,
        cancellation_reason: None,
        driver_id: None,
        ride_type: RideType::Standard,
        duration_estimate: Some(120),
        fare_estimate: Some(8.88),
        feedback: None,
    }
}

/// Small seeded config: 20 drivers, 40 requests.
pub fn small_config() -> GenerationConfig {
    GenerationConfig::default()
        .with_seed(TEST_SEED)
        .with_counts(20, 40)
}

/// Generator with sequential ids and a fixed seed.
///
/// # Panics
///
/// Panics if `config` fails validation.
pub fn seeded_generator(config: &GenerationConfig) -> FeedGenerator {
    FeedGenerator::with_sources(
        config,
        StdRng::seed_from_u64(config.seed.unwrap_or(TEST_SEED)),
        Box::new(SequentialIds::new()),
    )
    .expect("test config should validate")
}
