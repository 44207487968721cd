//! Temporal context model: hour-of-day buckets and the traffic and driver
//! status likelihoods attached to them.
//!
//! Three buckets exist. Rush hours (configurable windows, 07–10 and 16–19 by
//! default) push traffic towards heavy/gridlock and drivers towards being busy.
//! Late night (00–05) takes most drivers offline. Every other hour uses the
//! normal tables. Rush hours win when windows overlap.

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::clock::hour_of_day;
use crate::error::{FeedError, FeedResult};
use crate::records::{DriverStatus, TrafficCondition};
use crate::weighted::WeightedTable;

/// Outcome order for the rush-hour traffic weights.
pub const RUSH_TRAFFIC_OUTCOMES: [TrafficCondition; 4] = [
    TrafficCondition::Heavy,
    TrafficCondition::Gridlock,
    TrafficCondition::Moderate,
    TrafficCondition::Light,
];

/// Outcome order for the off-peak traffic weights.
pub const NORMAL_TRAFFIC_OUTCOMES: [TrafficCondition; 5] = [
    TrafficCondition::Light,
    TrafficCondition::Moderate,
    TrafficCondition::Heavy,
    TrafficCondition::Gridlock,
    TrafficCondition::Unknown,
];

/// Outcome order for every driver status weight vector.
pub const STATUS_OUTCOMES: [DriverStatus; 4] = [
    DriverStatus::Available,
    DriverStatus::EnRoute,
    DriverStatus::Engaged,
    DriverStatus::Offline,
];

/// Inclusive range of hours. `start > end` wraps past midnight.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl HourWindow {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        if self.start <= self.end {
            self.start <= hour && hour <= self.end
        } else {
            hour >= self.start || hour <= self.end
        }
    }

    pub fn validate(&self) -> FeedResult<()> {
        if self.start > 23 || self.end > 23 {
            return Err(FeedError::Config(format!(
                "hour window {self} must use hours 0-23"
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for HourWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for HourWindow {
    type Err = FeedError;

    /// Parses `"7-10"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| FeedError::Config(format!("hour window '{s}' must look like 7-10")))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| FeedError::Config(format!("'{part}' in hour window '{s}' is not an hour")))
        };
        let window = Self::new(parse(start)?, parse(end)?);
        window.validate()?;
        Ok(window)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContextConfig {
    pub rush_hours: Vec<HourWindow>,
    pub late_night: HourWindow,
    /// Offset applied to unix timestamps before bucketing by hour.
    pub utc_offset_hours: i32,
    /// Weights in [`RUSH_TRAFFIC_OUTCOMES`] order.
    pub rush_traffic_weights: Vec<f64>,
    /// Weights in [`NORMAL_TRAFFIC_OUTCOMES`] order.
    pub normal_traffic_weights: Vec<f64>,
    /// Weights in [`STATUS_OUTCOMES`] order.
    pub rush_status_weights: Vec<f64>,
    pub late_night_status_weights: Vec<f64>,
    pub normal_status_weights: Vec<f64>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            rush_hours: vec![HourWindow::new(7, 10), HourWindow::new(16, 19)],
            late_night: HourWindow::new(0, 5),
            utc_offset_hours: 0,
            rush_traffic_weights: vec![0.4, 0.3, 0.2, 0.1],
            normal_traffic_weights: vec![0.4, 0.3, 0.15, 0.05, 0.1],
            rush_status_weights: vec![0.15, 0.35, 0.45, 0.05],
            late_night_status_weights: vec![0.1, 0.1, 0.2, 0.6],
            normal_status_weights: vec![0.3, 0.3, 0.3, 0.1],
        }
    }
}

/// Hour-of-day bucket used to pick a weight table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HourBucket {
    Rush,
    LateNight,
    Normal,
}

#[derive(Clone, Debug)]
pub struct ContextModel {
    rush_hours: Vec<HourWindow>,
    late_night: HourWindow,
    utc_offset_hours: i32,
    rush_traffic: WeightedTable<TrafficCondition>,
    normal_traffic: WeightedTable<TrafficCondition>,
    rush_status: WeightedTable<DriverStatus>,
    late_night_status: WeightedTable<DriverStatus>,
    normal_status: WeightedTable<DriverStatus>,
}

impl ContextModel {
    pub fn try_from_config(config: &ContextConfig) -> FeedResult<Self> {
        for window in &config.rush_hours {
            window.validate()?;
        }
        config.late_night.validate()?;
        if !(-12..=14).contains(&config.utc_offset_hours) {
            return Err(FeedError::Config(format!(
                "UTC offset {} is outside -12..=14",
                config.utc_offset_hours
            )));
        }

        Ok(Self {
            rush_hours: config.rush_hours.clone(),
            late_night: config.late_night,
            utc_offset_hours: config.utc_offset_hours,
            rush_traffic: WeightedTable::try_new(
                "rush-hour traffic",
                RUSH_TRAFFIC_OUTCOMES.to_vec(),
                &config.rush_traffic_weights,
            )?,
            normal_traffic: WeightedTable::try_new(
                "off-peak traffic",
                NORMAL_TRAFFIC_OUTCOMES.to_vec(),
                &config.normal_traffic_weights,
            )?,
            rush_status: WeightedTable::try_new(
                "rush-hour driver status",
                STATUS_OUTCOMES.to_vec(),
                &config.rush_status_weights,
            )?,
            late_night_status: WeightedTable::try_new(
                "late-night driver status",
                STATUS_OUTCOMES.to_vec(),
                &config.late_night_status_weights,
            )?,
            normal_status: WeightedTable::try_new(
                "off-peak driver status",
                STATUS_OUTCOMES.to_vec(),
                &config.normal_status_weights,
            )?,
        })
    }

    pub fn rush_hours(&self) -> &[HourWindow] {
        &self.rush_hours
    }

    pub fn is_rush_hour(&self, hour: u32) -> bool {
        self.rush_hours.iter().any(|window| window.contains(hour))
    }

    pub fn is_late_night(&self, hour: u32) -> bool {
        self.late_night.contains(hour)
    }

    pub fn bucket(&self, hour: u32) -> HourBucket {
        if self.is_rush_hour(hour) {
            HourBucket::Rush
        } else if self.is_late_night(hour) {
            HourBucket::LateNight
        } else {
            HourBucket::Normal
        }
    }

    pub fn hour_of_day(&self, timestamp: i64) -> u32 {
        hour_of_day(timestamp, self.utc_offset_hours)
    }

    pub fn traffic_condition<R: Rng + ?Sized>(&self, timestamp: i64, rng: &mut R) -> TrafficCondition {
        self.traffic_for_hour(self.hour_of_day(timestamp), rng)
    }

    /// Traffic depends only on rush versus off-peak; late night uses the
    /// off-peak table.
    pub fn traffic_for_hour<R: Rng + ?Sized>(&self, hour: u32, rng: &mut R) -> TrafficCondition {
        if self.is_rush_hour(hour) {
            self.rush_traffic.sample(rng)
        } else {
            self.normal_traffic.sample(rng)
        }
    }

    pub fn driver_status<R: Rng + ?Sized>(&self, hour: u32, rng: &mut R) -> DriverStatus {
        match self.bucket(hour) {
            HourBucket::Rush => self.rush_status.sample(rng),
            HourBucket::LateNight => self.late_night_status.sample(rng),
            HourBucket::Normal => self.normal_status.sample(rng),
        }
    }
}
