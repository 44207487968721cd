//! Record sink: a pretty-printed JSON array and a Parquet file per entity kind,
//! plus readers and record validation.

mod drivers;
mod json;
mod requests;
mod utils;
mod validate;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::FeedResult;
use crate::scenario::Dataset;

pub use drivers::{driver_event_schema, read_driver_events_parquet, write_driver_events_parquet};
pub use json::{read_json_records, write_json_records};
pub use requests::{
    passenger_request_schema, read_passenger_requests_parquet, write_passenger_requests_parquet,
};
pub use validate::{validate_dataset, validate_driver_event, validate_passenger_request};

pub const DRIVERS_JSON: &str = "drivers.json";
pub const DRIVERS_PARQUET: &str = "drivers.parquet";
pub const REQUESTS_JSON: &str = "passenger_requests.json";
pub const REQUESTS_PARQUET: &str = "passenger_requests.parquet";

/// Destinations of the four artifacts of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub drivers_json: PathBuf,
    pub drivers_parquet: PathBuf,
    pub requests_json: PathBuf,
    pub requests_parquet: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::in_dir(".")
    }
}

impl OutputPaths {
    /// The default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            drivers_json: dir.join(DRIVERS_JSON),
            drivers_parquet: dir.join(DRIVERS_PARQUET),
            requests_json: dir.join(REQUESTS_JSON),
            requests_parquet: dir.join(REQUESTS_PARQUET),
        }
    }
}

/// Write both entity kinds in both formats. Missing parent directories are
/// created; any I/O failure aborts.
pub fn write_dataset(dataset: &Dataset, paths: &OutputPaths) -> FeedResult<()> {
    write_json_records(&paths.drivers_json, &dataset.drivers)?;
    write_driver_events_parquet(&paths.drivers_parquet, &dataset.drivers)?;
    write_json_records(&paths.requests_json, &dataset.requests)?;
    write_passenger_requests_parquet(&paths.requests_parquet, &dataset.requests)?;
    info!(
        drivers_parquet = %paths.drivers_parquet.display(),
        requests_parquet = %paths.requests_parquet.display(),
        "wrote feed artifacts"
    );
    Ok(())
}
