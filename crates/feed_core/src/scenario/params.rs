use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clock::TimestampStrategy;
use crate::error::{FeedError, FeedResult};
use crate::export::OutputPaths;
use crate::ids::IdScheme;
use crate::pricing::PricingConfig;
use crate::records::Location;
use crate::spatial::LocationStrategy;
use crate::speed::SpeedTable;
use crate::traffic::{ContextConfig, HourWindow};

/// Default city center: New York City.
pub const DEFAULT_CENTER: Location = Location {
    latitude: 40.7128,
    longitude: -74.0060,
};

/// Default sampling radius, roughly lower Manhattan.
pub const DEFAULT_RADIUS_KM: f64 = 3.3;

/// Vehicle weights in `VehicleType::ALL` order: sedan, suv, hatchback, van, truck.
pub const DEFAULT_VEHICLE_WEIGHTS: [f64; 5] = [0.65, 0.20, 0.10, 0.03, 0.02];

/// Ride type weights in `RideType::ALL` order: standard, premium, pool.
pub const DEFAULT_RIDE_TYPE_WEIGHTS: [f64; 3] = [1.0, 1.0, 1.0];

/// How the two record streams relate to each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// A driver fleet and an independent request stream, then round-robin matching.
    #[default]
    Matched,
    /// One driver event and one accepted request per record, sharing a ride id.
    Paired,
}

impl std::str::FromStr for GenerationMode {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "matched" => Ok(GenerationMode::Matched),
            "paired" => Ok(GenerationMode::Paired),
            other => Err(FeedError::Config(format!(
                "unknown generation mode '{other}' (expected matched or paired)"
            ))),
        }
    }
}

/// Where dropoff points are sampled around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropoffAnchor {
    #[default]
    Center,
    Pickup,
}

/// Inclusive star-rating range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRange {
    pub min: i32,
    pub max: i32,
}

impl RatingRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn as_range(&self) -> RangeInclusive<i32> {
        self.min..=self.max
    }

    pub fn validate(&self, name: &str) -> FeedResult<()> {
        if !(1 <= self.min && self.min <= self.max && self.max <= 5) {
            return Err(FeedError::Config(format!(
                "{name} ratings {}..={} must lie within 1..=5",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Round-robin matching and how matched rides end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Run the matcher after generating the request stream (matched mode only).
    pub enabled: bool,
    /// Probability (0.0–1.0) that a matched ride completes rather than cancels.
    pub completion_probability: f64,
    /// Ratings given to rides completed by the matcher.
    pub completed_ratings: RatingRange,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            completion_probability: 0.8,
            completed_ratings: RatingRange::new(3, 5),
        }
    }
}

/// Parameters for one generation run.
///
/// Every field has a default, so a JSON config file may supply any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub mode: GenerationMode,
    /// Drivers in the fleet (matched mode).
    pub num_drivers: usize,
    /// Passenger requests (matched mode) or paired records (paired mode).
    pub num_requests: usize,
    pub seed: Option<u64>,
    pub id_scheme: IdScheme,
    pub city_center: Location,
    pub city_radius_km: f64,
    pub location_strategy: LocationStrategy,
    pub dropoff_anchor: DropoffAnchor,
    pub timestamps: TimestampStrategy,
    pub context: ContextConfig,
    pub speeds: SpeedTable,
    pub pricing: PricingConfig,
    /// Weights in [`DEFAULT_VEHICLE_WEIGHTS`] order.
    pub vehicle_weights: Vec<f64>,
    /// Weights in [`DEFAULT_RIDE_TYPE_WEIGHTS`] order.
    pub ride_type_weights: Vec<f64>,
    /// Probability that a request comes from a passenger seen earlier in the run.
    pub repeat_passenger_probability: f64,
    /// Paired mode: probability that a record reuses an earlier driver (and session).
    pub driver_reuse_probability: f64,
    pub matching: MatchingConfig,
    /// Ratings for requests generated directly in the completed state.
    pub direct_ratings: RatingRange,
    pub outputs: OutputPaths,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::default(),
            num_drivers: 5_000,
            num_requests: 10_000,
            seed: None,
            id_scheme: IdScheme::default(),
            city_center: DEFAULT_CENTER,
            city_radius_km: DEFAULT_RADIUS_KM,
            location_strategy: LocationStrategy::default(),
            dropoff_anchor: DropoffAnchor::default(),
            timestamps: TimestampStrategy::default(),
            context: ContextConfig::default(),
            speeds: SpeedTable::default(),
            pricing: PricingConfig::default(),
            vehicle_weights: DEFAULT_VEHICLE_WEIGHTS.to_vec(),
            ride_type_weights: DEFAULT_RIDE_TYPE_WEIGHTS.to_vec(),
            repeat_passenger_probability: 0.3,
            driver_reuse_probability: 0.5,
            matching: MatchingConfig::default(),
            direct_ratings: RatingRange::new(1, 5),
            outputs: OutputPaths::default(),
        }
    }
}

impl GenerationConfig {
    /// Load a config from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> FeedResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_counts(mut self, num_drivers: usize, num_requests: usize) -> Self {
        self.num_drivers = num_drivers;
        self.num_requests = num_requests;
        self
    }

    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_id_scheme(mut self, id_scheme: IdScheme) -> Self {
        self.id_scheme = id_scheme;
        self
    }

    /// Sample locations within `radius_km` of `center`.
    pub fn with_city(mut self, center: Location, radius_km: f64) -> Self {
        self.city_center = center;
        self.city_radius_km = radius_km;
        self
    }

    pub fn with_location_strategy(mut self, strategy: LocationStrategy) -> Self {
        self.location_strategy = strategy;
        self
    }

    pub fn with_dropoff_anchor(mut self, anchor: DropoffAnchor) -> Self {
        self.dropoff_anchor = anchor;
        self
    }

    pub fn with_timestamps(mut self, strategy: TimestampStrategy) -> Self {
        self.timestamps = strategy;
        self
    }

    pub fn with_rush_hours(mut self, windows: Vec<HourWindow>) -> Self {
        self.context.rush_hours = windows;
        self
    }

    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_completion_probability(mut self, probability: f64) -> Self {
        self.matching.completion_probability = probability;
        self
    }

    pub fn with_matching_enabled(mut self, enabled: bool) -> Self {
        self.matching.enabled = enabled;
        self
    }

    pub fn with_repeat_passenger_probability(mut self, probability: f64) -> Self {
        self.repeat_passenger_probability = probability;
        self
    }

    pub fn with_driver_reuse_probability(mut self, probability: f64) -> Self {
        self.driver_reuse_probability = probability;
        self
    }

    /// Write all four artifacts into `dir` with the default file names.
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.outputs = OutputPaths::in_dir(dir);
        self
    }

    /// Reject settings a run cannot start with. Builds every sampler once, so
    /// table and window errors surface here rather than mid-run.
    pub fn validate(&self) -> FeedResult<()> {
        crate::generator::FeedGenerator::new(self).map(|_| ())
    }

    /// Scalar checks shared by [`validate`](Self::validate) and generator construction.
    pub(crate) fn check_scalars(&self) -> FeedResult<()> {
        check_probability("repeat passenger probability", self.repeat_passenger_probability)?;
        check_probability("driver reuse probability", self.driver_reuse_probability)?;
        check_probability("completion probability", self.matching.completion_probability)?;
        self.matching.completed_ratings.validate("matched completion")?;
        self.direct_ratings.validate("direct completion")?;
        self.speeds.validate()?;
        self.pricing.validate()?;
        Ok(())
    }
}

fn check_probability(name: &str, value: f64) -> FeedResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(FeedError::Config(format!(
            "{name} {value} must be within [0, 1]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        GenerationConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{"num_drivers": 7, "seed": 3, "mode": "paired"}"#).unwrap();
        assert_eq!(config.num_drivers, 7);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.mode, GenerationMode::Paired);
        assert_eq!(config.num_requests, 10_000);
        assert_eq!(config.city_center, DEFAULT_CENTER);
        assert_eq!(config.matching.completion_probability, 0.8);
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let config = GenerationConfig::default().with_completion_probability(1.5);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("completion probability"), "{err}");
    }

    #[test]
    fn bad_radius_is_rejected() {
        let config = GenerationConfig::default().with_city(DEFAULT_CENTER, 0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn vehicle_weight_length_mismatch_is_rejected() {
        let config = GenerationConfig {
            vehicle_weights: vec![0.5, 0.5],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(FeedError::WeightMismatch {
                labels: 5,
                weights: 2,
                ..
            })
        ));
    }

    #[test]
    fn rating_range_outside_one_to_five_is_rejected() {
        let config = GenerationConfig {
            direct_ratings: RatingRange::new(0, 5),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn mode_parses_from_cli_symbols() {
        assert_eq!("paired".parse::<GenerationMode>().unwrap(), GenerationMode::Paired);
        assert!("batch".parse::<GenerationMode>().is_err());
    }
}
