use rand::Rng;

use crate::phrases::{cancellation_reason, sample_feedback};
use crate::records::{PassengerRequest, RequestStatus};
use crate::scenario::{MatchingConfig, RatingRange};

/// How an accepted ride ends once a driver has been assigned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomePolicy {
    pub completion_probability: f64,
    pub completed_ratings: RatingRange,
}

impl Default for OutcomePolicy {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}

impl OutcomePolicy {
    pub fn from_config(config: &MatchingConfig) -> Self {
        Self {
            completion_probability: config.completion_probability,
            completed_ratings: config.completed_ratings,
        }
    }

    /// Move `request` to completed (with feedback) or canceled (with a reason).
    pub fn resolve<R: Rng + ?Sized>(&self, request: &mut PassengerRequest, rng: &mut R) -> RequestStatus {
        if rng.gen_bool(self.completion_probability) {
            request.complete(sample_feedback(self.completed_ratings.as_range(), rng));
        } else {
            request.cancel(cancellation_reason(rng));
        }
        request.status
    }
}
