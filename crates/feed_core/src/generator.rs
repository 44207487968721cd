//! Entity generators for driver events and passenger requests.
//!
//! [`FeedGenerator`] owns everything a run draws from: the seeded random
//! source, the id source, the driver session registry and the passenger
//! repeat pool. All records of a run come from one generator so that a seed
//! fully determines the output.

mod registry;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::clock::TimestampSampler;
use crate::error::FeedResult;
use crate::ids::{IdKind, IdSource};
use crate::matching::{MatchSummary, Matcher};
use crate::phrases::{cancellation_reason, sample_feedback};
use crate::pricing::PricingConfig;
use crate::records::{DriverEvent, PassengerRequest, RequestStatus, RideType, VehicleType};
use crate::scenario::{DropoffAnchor, GenerationConfig, RatingRange};
use crate::spatial::{haversine_km, GeoSampler};
use crate::speed::SpeedTable;
use crate::traffic::ContextModel;
use crate::weighted::WeightedTable;

pub use registry::{PassengerPool, SessionRegistry};

/// Caller-fixed fields for one passenger request. Anything left `None` is
/// sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub status: RequestStatus,
    pub driver_id: Option<String>,
    pub timestamp: Option<i64>,
    pub ride_type: Option<RideType>,
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self::requested()
    }
}

impl RequestSpec {
    /// A pending request with every field sampled.
    pub fn requested() -> Self {
        Self {
            status: RequestStatus::Requested,
            driver_id: None,
            timestamp: None,
            ride_type: None,
        }
    }

    pub fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_driver(mut self, driver_id: impl Into<String>) -> Self {
        self.driver_id = Some(driver_id.into());
        self
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_ride_type(mut self, ride_type: RideType) -> Self {
        self.ride_type = Some(ride_type);
        self
    }
}

#[derive(Debug)]
pub struct FeedGenerator {
    rng: StdRng,
    ids: Box<dyn IdSource>,
    sessions: SessionRegistry,
    passengers: PassengerPool,
    geo: GeoSampler,
    context: ContextModel,
    timestamps: TimestampSampler,
    speeds: SpeedTable,
    pricing: PricingConfig,
    vehicles: WeightedTable<VehicleType>,
    ride_types: WeightedTable<RideType>,
    dropoff_anchor: DropoffAnchor,
    direct_ratings: RatingRange,
    driver_reuse_probability: f64,
}

impl FeedGenerator {
    /// Build a generator from `config`, seeding the random source from
    /// `config.seed` (or entropy) and the id source from `config.id_scheme`.
    pub fn new(config: &GenerationConfig) -> FeedResult<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_sources(config, rng, config.id_scheme.build(config.seed))
    }

    /// Build a generator with an injected random source and id source.
    pub fn with_sources(
        config: &GenerationConfig,
        rng: StdRng,
        ids: Box<dyn IdSource>,
    ) -> FeedResult<Self> {
        config.check_scalars()?;
        let context = ContextModel::try_from_config(&config.context)?;
        let timestamps = TimestampSampler::try_new(config.timestamps, &context)?;
        let geo = GeoSampler::try_new(
            config.city_center,
            config.city_radius_km,
            config.location_strategy,
        )?;
        let vehicles =
            WeightedTable::try_new("vehicle type", VehicleType::ALL.to_vec(), &config.vehicle_weights)?;
        let ride_types =
            WeightedTable::try_new("ride type", RideType::ALL.to_vec(), &config.ride_type_weights)?;

        Ok(Self {
            rng,
            ids,
            sessions: SessionRegistry::new(),
            passengers: PassengerPool::new(config.repeat_passenger_probability),
            geo,
            context,
            timestamps,
            speeds: config.speeds,
            pricing: config.pricing,
            vehicles,
            ride_types,
            dropoff_anchor: config.dropoff_anchor,
            direct_ratings: config.direct_ratings,
            driver_reuse_probability: config.driver_reuse_probability,
        })
    }

    pub fn context(&self) -> &ContextModel {
        &self.context
    }

    pub fn geo(&self) -> &GeoSampler {
        &self.geo
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn passengers(&self) -> &PassengerPool {
        &self.passengers
    }

    pub fn next_id(&mut self, kind: IdKind) -> String {
        self.ids.next_id(kind)
    }

    /// One status update for `driver_id`.
    ///
    /// A supplied `ride_id` puts the driver on that ride (`engaged`).
    /// Otherwise the status is drawn from the hour-of-day context, and a fresh
    /// ride id is attached when the drawn status carries one.
    pub fn generate_driver_event(
        &mut self,
        driver_id: &str,
        ride_id: Option<String>,
        timestamp: Option<i64>,
        session_id: Option<String>,
    ) -> DriverEvent {
        let timestamp = timestamp.unwrap_or_else(|| self.timestamps.sample(&mut self.rng));
        let hour = self.context.hour_of_day(timestamp);

        let mut event = DriverEvent {
            event_id: self.ids.next_id(IdKind::Event),
            driver_id: driver_id.to_string(),
            timestamp,
            location: self.geo.sample_location(&mut self.rng),
            status: self.context.driver_status(hour, &mut self.rng),
            ride_id: None,
            vehicle_type: self.vehicles.sample(&mut self.rng),
            driver_session_id: self.sessions.resolve(driver_id, session_id, self.ids.as_mut()),
            traffic_condition: Some(self.context.traffic_for_hour(hour, &mut self.rng)),
        };

        match ride_id {
            Some(ride_id) => event.engage(ride_id),
            None if event.status.has_ride() => event.ride_id = Some(self.ids.next_id(IdKind::Ride)),
            None => {}
        }
        event
    }

    /// One passenger request shaped by `spec`.
    ///
    /// Locations, ride type, duration and fare are always sampled or derived.
    /// Completed requests get feedback rated from the direct rating range;
    /// canceled requests get a reason. Accepted and completed requests without
    /// a caller-supplied driver get a fresh driver id.
    pub fn generate_passenger_request(&mut self, spec: RequestSpec) -> PassengerRequest {
        let timestamp = spec
            .timestamp
            .unwrap_or_else(|| self.timestamps.sample(&mut self.rng));
        let request_id = self.ids.next_id(IdKind::Request);
        let passenger_id = self.passengers.next_passenger(self.ids.as_mut(), &mut self.rng);

        let pickup = self.geo.sample_location(&mut self.rng);
        let dropoff = match self.dropoff_anchor {
            DropoffAnchor::Center => self.geo.sample_location(&mut self.rng),
            DropoffAnchor::Pickup => self.geo.sample_near(pickup, &mut self.rng),
        };
        let ride_type = spec
            .ride_type
            .unwrap_or_else(|| self.ride_types.sample(&mut self.rng));
        let traffic = Some(self.context.traffic_condition(timestamp, &mut self.rng));
        let distance_km = haversine_km(pickup, dropoff);

        let driver_id = match spec.status {
            RequestStatus::Accepted | RequestStatus::Completed => Some(
                spec.driver_id
                    .unwrap_or_else(|| self.ids.next_id(IdKind::Driver)),
            ),
            RequestStatus::Canceled => spec.driver_id,
            RequestStatus::Requested => {
                if let Some(driver_id) = spec.driver_id {
                    warn!(%driver_id, "dropping driver from a request that is still pending");
                }
                None
            }
        };

        let mut request = PassengerRequest {
            request_id,
            passenger_id,
            timestamp,
            pickup_location: pickup,
            dropoff_location: dropoff,
            status: RequestStatus::Requested,
            cancellation_reason: None,
            driver_id,
            ride_type,
            duration_estimate: Some(self.speeds.estimate_duration_secs(distance_km, traffic)),
            fare_estimate: Some(self.pricing.estimate_fare(distance_km, ride_type, traffic)),
            feedback: None,
        };

        match spec.status {
            RequestStatus::Completed => {
                let feedback = sample_feedback(self.direct_ratings.as_range(), &mut self.rng);
                request.complete(feedback);
            }
            RequestStatus::Canceled => request.cancel(cancellation_reason(&mut self.rng)),
            RequestStatus::Accepted => request.status = RequestStatus::Accepted,
            RequestStatus::Requested => {}
        }
        request
    }

    /// `count` drivers, one status update each.
    pub fn generate_fleet(&mut self, count: usize) -> Vec<DriverEvent> {
        (0..count)
            .map(|_| {
                let driver_id = self.ids.next_id(IdKind::Driver);
                self.generate_driver_event(&driver_id, None, None, None)
            })
            .collect()
    }

    /// `count` pending requests, sorted by timestamp so matching sees them in
    /// arrival order.
    pub fn generate_requests(&mut self, count: usize) -> Vec<PassengerRequest> {
        let mut requests: Vec<_> = (0..count)
            .map(|_| self.generate_passenger_request(RequestSpec::requested()))
            .collect();
        requests.sort_by_key(|request| request.timestamp);
        requests
    }

    /// `count` linked records: each driver event is engaged on a fresh ride and
    /// the request it serves is accepted at the same timestamp. Earlier drivers
    /// are reused with the configured probability, so sessions recur.
    pub fn generate_paired(&mut self, count: usize) -> (Vec<DriverEvent>, Vec<PassengerRequest>) {
        let mut drivers = Vec::with_capacity(count);
        let mut requests = Vec::with_capacity(count);
        for _ in 0..count {
            let timestamp = self.timestamps.sample(&mut self.rng);
            let ride_id = self.ids.next_id(IdKind::Ride);
            let driver_id = self.reuse_or_new_driver();
            let event =
                self.generate_driver_event(&driver_id, Some(ride_id), Some(timestamp), None);
            let request = self.generate_passenger_request(
                RequestSpec::requested()
                    .with_status(RequestStatus::Accepted)
                    .with_driver(driver_id)
                    .at(timestamp),
            );
            drivers.push(event);
            requests.push(request);
        }
        debug!(
            records = count,
            distinct_drivers = self.sessions.len(),
            "generated paired records"
        );
        (drivers, requests)
    }

    /// Run `matcher` over the records with this generator's id and random
    /// sources.
    pub fn run_matcher(
        &mut self,
        matcher: &mut Matcher,
        drivers: &mut [DriverEvent],
        requests: &mut [PassengerRequest],
    ) -> MatchSummary {
        matcher.match_requests(drivers, requests, self.ids.as_mut(), &mut self.rng)
    }

    fn reuse_or_new_driver(&mut self) -> String {
        let known = self.sessions.drivers();
        if !known.is_empty() && self.rng.gen_bool(self.driver_reuse_probability) {
            let idx = self.rng.gen_range(0..known.len());
            return known[idx].clone();
        }
        self.ids.next_id(IdKind::Driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::DriverStatus;
    use crate::scenario::GenerationConfig;
    use crate::test_helpers::{seeded_generator, small_config};
    use std::collections::HashMap;

    #[test]
    fn supplied_ride_id_engages_driver() {
        let mut generator = seeded_generator(&small_config());
        let event = generator.generate_driver_event("D9", Some("R9".into()), Some(0), None);
        assert_eq!(event.status, DriverStatus::Engaged);
        assert_eq!(event.ride_id.as_deref(), Some("R9"));
        assert_eq!(event.timestamp, 0);
    }

    #[test]
    fn ride_id_present_iff_status_carries_a_ride() {
        let mut generator = seeded_generator(&small_config());
        for event in generator.generate_fleet(500) {
            assert_eq!(event.ride_id.is_some(), event.status.has_ride(), "{event:?}");
            assert!(event.traffic_condition.is_some());
        }
    }

    #[test]
    fn session_is_stable_per_driver() {
        let mut generator = seeded_generator(&small_config());
        let first = generator.generate_driver_event("D1", None, None, None);
        let second = generator.generate_driver_event("D1", None, None, None);
        let other = generator.generate_driver_event("D2", None, None, None);
        assert_eq!(first.driver_session_id, second.driver_session_id);
        assert_ne!(first.driver_session_id, other.driver_session_id);
    }

    #[test]
    fn supplied_session_is_used_for_new_driver() {
        let mut generator = seeded_generator(&small_config());
        let event = generator.generate_driver_event("D1", None, None, Some("shift-1".into()));
        assert_eq!(event.driver_session_id, "shift-1");
    }

    #[test]
    fn request_status_drives_optional_fields() {
        let mut generator = seeded_generator(&small_config());

        let pending = generator.generate_passenger_request(RequestSpec::requested());
        assert!(pending.driver_id.is_none());
        assert!(pending.feedback.is_none() && pending.cancellation_reason.is_none());

        let completed = generator
            .generate_passenger_request(RequestSpec::requested().with_status(RequestStatus::Completed));
        assert!(completed.driver_id.is_some());
        let feedback = completed.feedback.expect("completed requests carry feedback");
        assert!((1..=5).contains(&feedback.rating));
        assert!(completed.cancellation_reason.is_none());

        let canceled = generator
            .generate_passenger_request(RequestSpec::requested().with_status(RequestStatus::Canceled));
        assert!(canceled.cancellation_reason.is_some());
        assert!(canceled.feedback.is_none());
    }

    #[test]
    fn pending_request_drops_supplied_driver() {
        let mut generator = seeded_generator(&small_config());
        let request = generator.generate_passenger_request(RequestSpec::requested().with_driver("D1"));
        assert!(request.driver_id.is_none());
    }

    #[test]
    fn estimates_stay_in_bounds() {
        let mut generator = seeded_generator(&small_config());
        for request in generator.generate_requests(500) {
            let duration = request.duration_estimate.expect("duration is always set");
            assert!((60..=90 * 60).contains(&duration));
            assert_eq!(duration % 60, 0);
            let fare = request.fare_estimate.expect("fare is always set");
            assert!((5.0..=100.0).contains(&fare), "fare {fare}");
        }
    }

    #[test]
    fn requests_are_in_arrival_order() {
        let mut generator = seeded_generator(&small_config());
        let requests = generator.generate_requests(200);
        assert!(requests.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn fixed_ride_type_is_respected() {
        let mut generator = seeded_generator(&small_config());
        let request =
            generator.generate_passenger_request(RequestSpec::requested().with_ride_type(RideType::Pool));
        assert_eq!(request.ride_type, RideType::Pool);
    }

    #[test]
    fn pickup_anchored_dropoff_stays_near_pickup() {
        let config = small_config().with_dropoff_anchor(DropoffAnchor::Pickup);
        let mut generator = seeded_generator(&config);
        let bound = generator.geo().max_offset_km() + 0.05;
        for request in generator.generate_requests(300) {
            let distance = haversine_km(request.pickup_location, request.dropoff_location);
            assert!(distance <= bound, "dropoff {distance} km from pickup");
        }
    }

    #[test]
    fn repeat_passengers_appear() {
        let config = GenerationConfig {
            repeat_passenger_probability: 0.9,
            ..small_config()
        };
        let mut generator = seeded_generator(&config);
        let requests = generator.generate_requests(100);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for request in &requests {
            *counts.entry(request.passenger_id.as_str()).or_default() += 1;
        }
        assert!(counts.len() < requests.len());
        assert_eq!(generator.passengers().len(), counts.len());
    }

    #[test]
    fn paired_records_share_driver_and_timestamp() {
        let mut generator = seeded_generator(&small_config());
        let (drivers, requests) = generator.generate_paired(100);
        assert_eq!(drivers.len(), requests.len());
        for (driver, request) in drivers.iter().zip(&requests) {
            assert_eq!(driver.status, DriverStatus::Engaged);
            assert!(driver.ride_id.is_some());
            assert_eq!(request.status, RequestStatus::Accepted);
            assert_eq!(request.driver_id.as_deref(), Some(driver.driver_id.as_str()));
            assert_eq!(request.timestamp, driver.timestamp);
        }
        // Reuse probability 0.5 makes repeat drivers all but certain over 100 records.
        assert!(generator.sessions().len() < 100);
    }

    #[test]
    fn same_seed_same_records() {
        let mut a = seeded_generator(&small_config());
        let mut b = seeded_generator(&small_config());
        assert_eq!(a.generate_fleet(50), b.generate_fleet(50));
        assert_eq!(a.generate_requests(50), b.generate_requests(50));
    }
}
