//! Run configuration and dataset assembly.

mod build;
mod params;

pub use build::{generate_dataset, generate_dataset_with, run, Dataset};
pub use params::{
    DropoffAnchor, GenerationConfig, GenerationMode, MatchingConfig, RatingRange,
    DEFAULT_CENTER, DEFAULT_RADIUS_KM, DEFAULT_RIDE_TYPE_WEIGHTS, DEFAULT_VEHICLE_WEIGHTS,
};
