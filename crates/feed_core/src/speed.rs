//! Trip duration estimates from distance and traffic.

use serde::{Deserialize, Serialize};

use crate::error::{FeedError, FeedResult};
use crate::records::TrafficCondition;

/// Shortest estimate reported, in minutes.
pub const MIN_DURATION_MINUTES: i32 = 1;
/// Longest estimate reported, in minutes.
pub const MAX_DURATION_MINUTES: i32 = 90;

/// Average travel speed (km/h) per traffic condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedTable {
    pub light_kmh: f64,
    pub moderate_kmh: f64,
    pub heavy_kmh: f64,
    pub gridlock_kmh: f64,
    pub unknown_kmh: f64,
    /// Used when the condition is missing or unrecognised.
    pub fallback_kmh: f64,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            light_kmh: 50.0,
            moderate_kmh: 30.0,
            heavy_kmh: 20.0,
            gridlock_kmh: 10.0,
            unknown_kmh: 25.0,
            fallback_kmh: 25.0,
        }
    }
}

impl SpeedTable {
    pub fn validate(&self) -> FeedResult<()> {
        let speeds = [
            ("light", self.light_kmh),
            ("moderate", self.moderate_kmh),
            ("heavy", self.heavy_kmh),
            ("gridlock", self.gridlock_kmh),
            ("unknown", self.unknown_kmh),
            ("fallback", self.fallback_kmh),
        ];
        for (name, kmh) in speeds {
            if !(kmh.is_finite() && kmh > 0.0) {
                return Err(FeedError::Config(format!(
                    "speed for {name} traffic must be positive, got {kmh}"
                )));
            }
        }
        Ok(())
    }

    pub fn speed_kmh(&self, traffic: Option<TrafficCondition>) -> f64 {
        match traffic {
            Some(TrafficCondition::Light) => self.light_kmh,
            Some(TrafficCondition::Moderate) => self.moderate_kmh,
            Some(TrafficCondition::Heavy) => self.heavy_kmh,
            Some(TrafficCondition::Gridlock) => self.gridlock_kmh,
            Some(TrafficCondition::Unknown) => self.unknown_kmh,
            None => self.fallback_kmh,
        }
    }

    /// Minutes to cover `distance_km`, truncated and clamped to
    /// [`MIN_DURATION_MINUTES`, `MAX_DURATION_MINUTES`].
    pub fn estimate_duration_minutes(
        &self,
        distance_km: f64,
        traffic: Option<TrafficCondition>,
    ) -> i32 {
        let minutes = (distance_km / self.speed_kmh(traffic)) * 60.0;
        // `as` saturates and maps NaN to 0, so the clamp covers every input.
        (minutes as i32).clamp(MIN_DURATION_MINUTES, MAX_DURATION_MINUTES)
    }

    /// Same as [`Self::estimate_duration_minutes`] for a free-form condition
    /// name; unrecognised names use the fallback speed.
    pub fn estimate_duration_minutes_by_name(&self, distance_km: f64, traffic: &str) -> i32 {
        self.estimate_duration_minutes(distance_km, TrafficCondition::from_symbol(traffic))
    }

    /// Duration estimate as stored on a request, in seconds.
    pub fn estimate_duration_secs(&self, distance_km: f64, traffic: Option<TrafficCondition>) -> i32 {
        self.estimate_duration_minutes(distance_km, traffic) * 60
    }
}
