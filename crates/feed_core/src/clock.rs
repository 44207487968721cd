//! Timestamps for generated records.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FeedError, FeedResult};
use crate::traffic::ContextModel;
use crate::weighted::WeightedTable;

pub const SECS_PER_HOUR: i64 = 3_600;
pub const SECS_PER_DAY: i64 = 86_400;

/// 2020-01-01T00:00:00Z.
pub const DEFAULT_EPOCH_START: i64 = 1_577_836_800;
/// 2025-01-01T00:00:00Z.
pub const DEFAULT_EPOCH_END: i64 = 1_735_689_600;

/// Relative hourly weights for [`TimestampStrategy::HourWeighted`].
pub const RUSH_HOUR_WEIGHT: f64 = 8.0;
pub const LATE_NIGHT_WEIGHT: f64 = 2.0;
pub const NORMAL_HOUR_WEIGHT: f64 = 4.0;

/// Hour of day (0–23) for a unix timestamp shifted by `utc_offset_hours`.
pub fn hour_of_day(timestamp: i64, utc_offset_hours: i32) -> u32 {
    let local = timestamp + i64::from(utc_offset_hours) * SECS_PER_HOUR;
    (local.rem_euclid(SECS_PER_DAY) / SECS_PER_HOUR) as u32
}

/// How a timestamp is chosen when the caller does not supply one.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimestampStrategy {
    /// Wall-clock time at generation.
    Now,
    /// Uniform over `[start, end]` unix seconds.
    Uniform { start: i64, end: i64 },
    /// One day starting at `day_start` (a local midnight), with rush hours
    /// weighted 8, late night 2 and other hours 4.
    HourWeighted { day_start: i64 },
}

impl Default for TimestampStrategy {
    fn default() -> Self {
        TimestampStrategy::Uniform {
            start: DEFAULT_EPOCH_START,
            end: DEFAULT_EPOCH_END,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TimestampSampler {
    strategy: TimestampStrategy,
    hours: Option<WeightedTable<u32>>,
}

impl TimestampSampler {
    pub fn try_new(strategy: TimestampStrategy, context: &ContextModel) -> FeedResult<Self> {
        let hours = match strategy {
            TimestampStrategy::Now => None,
            TimestampStrategy::Uniform { start, end } => {
                if start > end {
                    return Err(FeedError::Config(format!(
                        "timestamp range start {start} is after end {end}"
                    )));
                }
                None
            }
            TimestampStrategy::HourWeighted { .. } => {
                let hours: Vec<u32> = (0..24).collect();
                let weights: Vec<f64> = hours
                    .iter()
                    .map(|&hour| {
                        if context.is_rush_hour(hour) {
                            RUSH_HOUR_WEIGHT
                        } else if context.is_late_night(hour) {
                            LATE_NIGHT_WEIGHT
                        } else {
                            NORMAL_HOUR_WEIGHT
                        }
                    })
                    .collect();
                Some(WeightedTable::try_new("hour of day", hours, &weights)?)
            }
        };
        Ok(Self { strategy, hours })
    }

    pub fn strategy(&self) -> TimestampStrategy {
        self.strategy
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        match (self.strategy, &self.hours) {
            (TimestampStrategy::Uniform { start, end }, _) => rng.gen_range(start..=end),
            (TimestampStrategy::HourWeighted { day_start }, Some(hours)) => {
                let hour = i64::from(hours.sample(rng));
                day_start + hour * SECS_PER_HOUR + rng.gen_range(0..SECS_PER_HOUR)
            }
            _ => Utc::now().timestamp(),
        }
    }
}
