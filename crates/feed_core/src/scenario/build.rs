use tracing::{info, warn};

use crate::error::FeedResult;
use crate::export::{validate_dataset, write_dataset};
use crate::generator::FeedGenerator;
use crate::matching::{MatchSummary, Matcher, OutcomePolicy};
use crate::records::{DriverEvent, PassengerRequest};
use crate::scenario::params::{GenerationConfig, GenerationMode};

/// Every record produced by one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub drivers: Vec<DriverEvent>,
    pub requests: Vec<PassengerRequest>,
    /// Present when the matcher ran.
    pub match_summary: Option<MatchSummary>,
}

/// Validate `config` and generate its dataset in memory.
pub fn generate_dataset(config: &GenerationConfig) -> FeedResult<Dataset> {
    let mut generator = FeedGenerator::new(config)?;
    Ok(generate_dataset_with(&mut generator, config))
}

/// Generate with an already-built generator (for injected random or id sources).
pub fn generate_dataset_with(generator: &mut FeedGenerator, config: &GenerationConfig) -> Dataset {
    info!(
        mode = ?config.mode,
        drivers = config.num_drivers,
        requests = config.num_requests,
        seed = ?config.seed,
        "generating dataset"
    );
    match config.mode {
        GenerationMode::Matched => {
            let mut drivers = generator.generate_fleet(config.num_drivers);
            let mut requests = generator.generate_requests(config.num_requests);
            let match_summary = config.matching.enabled.then(|| {
                let mut matcher = Matcher::round_robin(OutcomePolicy::from_config(&config.matching));
                generator.run_matcher(&mut matcher, &mut drivers, &mut requests)
            });
            Dataset {
                drivers,
                requests,
                match_summary,
            }
        }
        GenerationMode::Paired => {
            let (drivers, requests) = generator.generate_paired(config.num_requests);
            Dataset {
                drivers,
                requests,
                match_summary: None,
            }
        }
    }
}

/// Generate, check record invariants, and write all four artifacts.
///
/// Invariant violations are logged, not fatal; write failures abort the run.
pub fn run(config: &GenerationConfig) -> FeedResult<Dataset> {
    let dataset = generate_dataset(config)?;

    let violations = validate_dataset(&dataset.drivers, &dataset.requests);
    for violation in &violations {
        warn!(%violation, "record invariant violated");
    }

    write_dataset(&dataset, &config.outputs)?;
    info!(
        drivers = dataset.drivers.len(),
        requests = dataset.requests.len(),
        violations = violations.len(),
        out = %config.outputs.drivers_json.display(),
        "dataset written"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RequestStatus;
    use crate::test_helpers::small_config;

    #[test]
    fn matched_mode_resolves_or_leaves_requests_pending() {
        let dataset = generate_dataset(&small_config()).unwrap();
        assert_eq!(dataset.drivers.len(), 20);
        assert_eq!(dataset.requests.len(), 40);
        let summary = dataset.match_summary.expect("matching is on by default");
        assert_eq!(summary.matched() + summary.unserved, 40);
        let pending = dataset
            .requests
            .iter()
            .filter(|r| r.status == RequestStatus::Requested)
            .count();
        assert_eq!(pending, summary.unserved);
    }

    #[test]
    fn disabled_matching_leaves_everything_pending() {
        let config = small_config().with_matching_enabled(false);
        let dataset = generate_dataset(&config).unwrap();
        assert!(dataset.match_summary.is_none());
        assert!(dataset.requests.iter().all(|r| r.is_pending()));
    }

    #[test]
    fn paired_mode_emits_one_driver_event_per_request() {
        let config = small_config().with_mode(GenerationMode::Paired);
        let dataset = generate_dataset(&config).unwrap();
        assert_eq!(dataset.drivers.len(), 40);
        assert_eq!(dataset.requests.len(), 40);
        assert!(dataset.match_summary.is_none());
    }

    #[test]
    fn invalid_config_fails_before_generation() {
        let config = small_config().with_repeat_passenger_probability(-0.1);
        assert!(generate_dataset(&config).is_err());
    }
}
