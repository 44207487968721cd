use crate::records::{DriverEvent, PassengerRequest};

/// Chooses which available driver serves a request.
pub trait MatchingAlgorithm: Send + std::fmt::Debug {
    /// Called once before each matching pass.
    fn begin_pass(&mut self) {}

    /// Pick one entry of `available` (indices into `drivers`) for `request`.
    /// Returns the position within `available`, or `None` to leave the
    /// request unserved.
    fn select_driver(
        &mut self,
        request: &PassengerRequest,
        drivers: &[DriverEvent],
        available: &[usize],
    ) -> Option<usize>;
}
