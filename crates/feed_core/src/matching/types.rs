use crate::records::RequestStatus;

/// One request served by one driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Index into the request slice.
    pub request_index: usize,
    /// Index into the driver slice.
    pub driver_index: usize,
    pub driver_id: String,
    /// Ride id the driver carried while engaged on this request.
    pub ride_id: String,
    /// Terminal status the request was resolved to.
    pub outcome: RequestStatus,
}

/// Result of one matching pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub assignments: Vec<Assignment>,
    pub completed: usize,
    pub canceled: usize,
    /// Pending requests left in `requested` because no driver was available.
    pub unserved: usize,
    /// Requests that were not pending when the pass started.
    pub skipped: usize,
}

impl MatchSummary {
    pub fn matched(&self) -> usize {
        self.assignments.len()
    }
}
