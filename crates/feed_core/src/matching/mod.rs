//! Request-to-driver matching.
//!
//! A single pass over requests in arrival order. Drivers whose status is
//! `available` when the pass starts form the working set; each served driver
//! is engaged, the ride is resolved immediately and the driver returns to
//! `available`, so the working set never shrinks. Requests are never
//! re-matched.

pub mod algorithm;
pub mod outcome;
pub mod round_robin;
pub mod types;

use rand::Rng;
use tracing::{debug, info};

use crate::ids::{IdKind, IdSource};
use crate::records::{DriverEvent, DriverStatus, PassengerRequest, RequestStatus};

pub use algorithm::MatchingAlgorithm;
pub use outcome::OutcomePolicy;
pub use round_robin::RoundRobinMatching;
pub use types::{Assignment, MatchSummary};

#[derive(Debug)]
pub struct Matcher {
    algorithm: Box<dyn MatchingAlgorithm>,
    policy: OutcomePolicy,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::round_robin(OutcomePolicy::default())
    }
}

impl Matcher {
    pub fn new(algorithm: Box<dyn MatchingAlgorithm>, policy: OutcomePolicy) -> Self {
        Self { algorithm, policy }
    }

    pub fn round_robin(policy: OutcomePolicy) -> Self {
        Self::new(Box::new(RoundRobinMatching::new()), policy)
    }

    pub fn policy(&self) -> &OutcomePolicy {
        &self.policy
    }

    /// Match pending `requests` against available `drivers`, mutating both in
    /// place. Ride ids come from `ids`; outcome draws come from `rng`.
    pub fn match_requests<R: Rng + ?Sized>(
        &mut self,
        drivers: &mut [DriverEvent],
        requests: &mut [PassengerRequest],
        ids: &mut dyn IdSource,
        rng: &mut R,
    ) -> MatchSummary {
        let available: Vec<usize> = drivers
            .iter()
            .enumerate()
            .filter(|(_, driver)| driver.status == DriverStatus::Available)
            .map(|(index, _)| index)
            .collect();

        self.algorithm.begin_pass();
        let mut summary = MatchSummary::default();
        for (request_index, request) in requests.iter_mut().enumerate() {
            if !request.is_pending() {
                summary.skipped += 1;
                continue;
            }
            let Some(slot) = self.algorithm.select_driver(request, drivers, &available) else {
                summary.unserved += 1;
                continue;
            };
            let driver_index = available[slot];
            let driver = &mut drivers[driver_index];

            let ride_id = ids.next_id(IdKind::Ride);
            driver.engage(ride_id.clone());
            request.driver_id = Some(driver.driver_id.clone());
            request.status = RequestStatus::Accepted;

            let outcome = self.policy.resolve(request, rng);
            driver.release();
            match outcome {
                RequestStatus::Completed => summary.completed += 1,
                _ => summary.canceled += 1,
            }
            debug!(
                request_id = %request.request_id,
                driver_id = %driver.driver_id,
                ride_id = %ride_id,
                outcome = %outcome,
                "matched request"
            );
            summary.assignments.push(Assignment {
                request_index,
                driver_index,
                driver_id: driver.driver_id.clone(),
                ride_id,
                outcome,
            });
        }

        info!(
            available_drivers = available.len(),
            matched = summary.matched(),
            completed = summary.completed,
            canceled = summary.canceled,
            unserved = summary.unserved,
            "matching pass finished"
        );
        summary
    }
}
