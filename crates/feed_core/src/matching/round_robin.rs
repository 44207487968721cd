use super::algorithm::MatchingAlgorithm;
use crate::records::{DriverEvent, PassengerRequest};

/// Cycles through the available drivers in order: the i-th match of a pass
/// goes to driver `i mod N`.
///
/// The cursor ignores request content and driver location, so the result is
/// fully determined by the order of the two input slices.
#[derive(Debug, Default, Clone)]
pub struct RoundRobinMatching {
    cursor: usize,
}

impl RoundRobinMatching {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of matches handed out in the current pass.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl MatchingAlgorithm for RoundRobinMatching {
    fn begin_pass(&mut self) {
        self.cursor = 0;
    }

    fn select_driver(
        &mut self,
        _request: &PassengerRequest,
        _drivers: &[DriverEvent],
        available: &[usize],
    ) -> Option<usize> {
        if available.is_empty() {
            return None;
        }
        let slot = self.cursor % available.len();
        self.cursor += 1;
        Some(slot)
    }
}
