//! Fare estimates for passenger requests.
//!
//! Formula: `fare = ride_rate * traffic_multiplier * distance_km * per_km_factor`,
//! rounded to cents, then floored at `min_fare` and capped at `max_fare`.

use serde::{Deserialize, Serialize};

use crate::error::{FeedError, FeedResult};
use crate::records::{RideType, TrafficCondition};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RideTypeRates {
    pub standard: f64,
    pub premium: f64,
    pub pool: f64,
}

impl Default for RideTypeRates {
    fn default() -> Self {
        Self {
            standard: 1.0,
            premium: 1.5,
            pool: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficMultipliers {
    pub light: f64,
    pub moderate: f64,
    pub heavy: f64,
    pub gridlock: f64,
    pub unknown: f64,
    /// Applied when the condition is missing or unrecognised.
    pub fallback: f64,
}

impl Default for TrafficMultipliers {
    fn default() -> Self {
        Self {
            light: 1.0,
            moderate: 1.2,
            heavy: 1.5,
            gridlock: 1.8,
            unknown: 1.1,
            fallback: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub ride_rates: RideTypeRates,
    pub traffic_multipliers: TrafficMultipliers,
    pub per_km_factor: f64,
    pub min_fare: f64,
    /// `None` leaves fares uncapped.
    pub max_fare: Option<f64>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            ride_rates: RideTypeRates::default(),
            traffic_multipliers: TrafficMultipliers::default(),
            per_km_factor: 8.0,
            min_fare: 5.0,
            max_fare: Some(100.0),
        }
    }
}

impl PricingConfig {
    pub fn validate(&self) -> FeedResult<()> {
        let factors = [
            ("standard rate", self.ride_rates.standard),
            ("premium rate", self.ride_rates.premium),
            ("pool rate", self.ride_rates.pool),
            ("light multiplier", self.traffic_multipliers.light),
            ("moderate multiplier", self.traffic_multipliers.moderate),
            ("heavy multiplier", self.traffic_multipliers.heavy),
            ("gridlock multiplier", self.traffic_multipliers.gridlock),
            ("unknown multiplier", self.traffic_multipliers.unknown),
            ("fallback multiplier", self.traffic_multipliers.fallback),
            ("per-km factor", self.per_km_factor),
        ];
        for (name, value) in factors {
            if !(value.is_finite() && value >= 0.0) {
                return Err(FeedError::Config(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if !(self.min_fare.is_finite() && self.min_fare >= 0.0) {
            return Err(FeedError::Config(format!(
                "minimum fare must be non-negative, got {}",
                self.min_fare
            )));
        }
        if let Some(max) = self.max_fare {
            if max.is_nan() || max < self.min_fare {
                return Err(FeedError::Config(format!(
                    "fare cap {max} is below the minimum fare {}",
                    self.min_fare
                )));
            }
        }
        Ok(())
    }

    pub fn ride_rate(&self, ride_type: RideType) -> f64 {
        match ride_type {
            RideType::Standard => self.ride_rates.standard,
            RideType::Premium => self.ride_rates.premium,
            RideType::Pool => self.ride_rates.pool,
        }
    }

    pub fn traffic_multiplier(&self, traffic: Option<TrafficCondition>) -> f64 {
        let m = &self.traffic_multipliers;
        match traffic {
            Some(TrafficCondition::Light) => m.light,
            Some(TrafficCondition::Moderate) => m.moderate,
            Some(TrafficCondition::Heavy) => m.heavy,
            Some(TrafficCondition::Gridlock) => m.gridlock,
            Some(TrafficCondition::Unknown) => m.unknown,
            None => m.fallback,
        }
    }

    pub fn estimate_fare(
        &self,
        distance_km: f64,
        ride_type: RideType,
        traffic: Option<TrafficCondition>,
    ) -> f64 {
        let rate = self.ride_rate(ride_type) * self.traffic_multiplier(traffic);
        let raw = round_cents(rate * distance_km * self.per_km_factor);
        // f64::max ignores NaN, so a NaN distance lands on the floor.
        let fare = raw.max(self.min_fare);
        match self.max_fare {
            Some(cap) => fare.min(cap),
            None => fare,
        }
    }

    /// Fare for free-form ride type and traffic names. Unknown ride types are
    /// priced as standard; unknown traffic uses the fallback multiplier.
    pub fn estimate_fare_by_name(&self, distance_km: f64, ride_type: &str, traffic: &str) -> f64 {
        let ride_type = RideType::from_symbol(ride_type).unwrap_or(RideType::Standard);
        self.estimate_fare(distance_km, ride_type, TrafficCondition::from_symbol(traffic))
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fare_follows_formula_between_bounds() {
        let pricing = PricingConfig::default();
        // 1.5 * 1.2 * 3 km * 8 = 43.2
        let fare = pricing.estimate_fare(3.0, RideType::Premium, Some(TrafficCondition::Moderate));
        assert!((fare - 43.2).abs() < 1e-9);
    }

    #[test]
    fn fare_has_floor_and_cap() {
        let pricing = PricingConfig::default();
        assert_eq!(
            pricing.estimate_fare(0.1, RideType::Pool, Some(TrafficCondition::Light)),
            5.0
        );
        assert_eq!(
            pricing.estimate_fare(40.0, RideType::Premium, Some(TrafficCondition::Gridlock)),
            100.0
        );
        assert_eq!(pricing.estimate_fare(f64::NAN, RideType::Standard, None), 5.0);
        assert_eq!(pricing.estimate_fare(-2.0, RideType::Standard, None), 5.0);
        assert_eq!(pricing.estimate_fare(f64::INFINITY, RideType::Standard, None), 100.0);
    }

    #[test]
    fn fare_stays_in_bounds_across_inputs() {
        let pricing = PricingConfig::default();
        for step in 0..300 {
            let distance = step as f64 * 0.21;
            for ride_type in RideType::ALL {
                for traffic in TrafficCondition::ALL {
                    let fare = pricing.estimate_fare(distance, *ride_type, Some(*traffic));
                    assert!((5.0..=100.0).contains(&fare), "fare {fare} out of bounds");
                }
            }
        }
    }

    #[test]
    fn uncapped_fare_can_exceed_hundred() {
        let pricing = PricingConfig {
            max_fare: None,
            ..Default::default()
        };
        let fare = pricing.estimate_fare(40.0, RideType::Premium, Some(TrafficCondition::Gridlock));
        assert!((fare - 864.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_names_use_documented_defaults() {
        let pricing = PricingConfig::default();
        // Standard rate (1.0) and fallback multiplier (1.0): 2 km * 8 = 16.
        assert_eq!(pricing.estimate_fare_by_name(2.0, "limousine", "sleet"), 16.0);
        // Known "unknown" traffic symbol keeps its own multiplier.
        assert!((pricing.estimate_fare_by_name(2.0, "standard", "unknown") - 17.6).abs() < 1e-9);
    }

    #[test]
    fn cap_below_floor_is_rejected() {
        let pricing = PricingConfig {
            min_fare: 10.0,
            max_fare: Some(5.0),
            ..Default::default()
        };
        assert!(pricing.validate().is_err());
        assert!(PricingConfig::default().validate().is_ok());
    }
}
