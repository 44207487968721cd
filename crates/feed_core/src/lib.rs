//! Synthetic ride-hailing feed generation: driver availability events,
//! passenger requests, round-robin matching, and JSON/Parquet output.

pub mod clock;
pub mod error;
pub mod export;
pub mod generator;
pub mod ids;
pub mod matching;
pub mod phrases;
pub mod pricing;
pub mod records;
pub mod scenario;
pub mod spatial;
pub mod speed;
pub mod traffic;
pub mod weighted;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use error::{FeedError, FeedResult};
