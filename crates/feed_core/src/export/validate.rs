use std::collections::{HashMap, HashSet};

use crate::records::{DriverEvent, Location, PassengerRequest, RequestStatus};
use crate::speed::{MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};

fn check_location(label: &str, id: &str, location: &Location) -> Option<String> {
    let valid = location.latitude.is_finite()
        && location.longitude.is_finite()
        && location.latitude.abs() <= 90.0
        && location.longitude.abs() <= 180.0;
    (!valid).then(|| {
        format!(
            "{id}: {label} ({}, {}) is not a valid coordinate",
            location.latitude, location.longitude
        )
    })
}

/// Checks that `ride_id` is set exactly when the status carries a ride.
/// Returns an error message if validation fails, None if valid.
pub fn validate_driver_event(event: &DriverEvent) -> Option<String> {
    if event.status.has_ride() && event.ride_id.is_none() {
        return Some(format!(
            "{}: status {} requires a ride_id",
            event.event_id, event.status
        ));
    }
    if !event.status.has_ride() && event.ride_id.is_some() {
        return Some(format!(
            "{}: status {} must not carry a ride_id",
            event.event_id, event.status
        ));
    }
    check_location("location", &event.event_id, &event.location)
}

/// Checks the status-dependent fields of a request:
/// canceled ⟺ cancellation_reason, completed ⟺ feedback (rating 1–5),
/// accepted/completed ⇒ driver_id, requested ⇒ no driver_id.
/// Returns an error message if validation fails, None if valid.
pub fn validate_passenger_request(request: &PassengerRequest) -> Option<String> {
    let id = &request.request_id;
    let status = request.status;

    if (status == RequestStatus::Canceled) != request.cancellation_reason.is_some() {
        return Some(format!(
            "{id}: cancellation_reason must be set iff canceled (status {status})"
        ));
    }
    match (&request.feedback, status) {
        (Some(feedback), RequestStatus::Completed) => {
            if !(1..=5).contains(&feedback.rating) {
                return Some(format!("{id}: rating {} outside 1..=5", feedback.rating));
            }
        }
        (None, RequestStatus::Completed) => {
            return Some(format!("{id}: completed request has no feedback"));
        }
        (Some(_), _) => {
            return Some(format!("{id}: feedback on a request with status {status}"));
        }
        (None, _) => {}
    }
    match status {
        RequestStatus::Accepted | RequestStatus::Completed if request.driver_id.is_none() => {
            return Some(format!("{id}: {status} request has no driver_id"));
        }
        RequestStatus::Requested if request.driver_id.is_some() => {
            return Some(format!("{id}: pending request already has a driver_id"));
        }
        _ => {}
    }
    if let Some(duration) = request.duration_estimate {
        let bounds = MIN_DURATION_MINUTES * 60..=MAX_DURATION_MINUTES * 60;
        if !bounds.contains(&duration) {
            return Some(format!("{id}: duration_estimate {duration}s outside {bounds:?}"));
        }
    }
    if let Some(fare) = request.fare_estimate {
        if !(fare.is_finite() && fare >= 0.0) {
            return Some(format!("{id}: fare_estimate {fare} is not a valid amount"));
        }
    }
    check_location("pickup_location", id, &request.pickup_location)
        .or_else(|| check_location("dropoff_location", id, &request.dropoff_location))
}

/// Per-record checks plus cross-record ones: unique event and request ids,
/// and a one-to-one driver/session mapping. One message per violation.
pub fn validate_dataset(drivers: &[DriverEvent], requests: &[PassengerRequest]) -> Vec<String> {
    let mut violations: Vec<String> = drivers
        .iter()
        .filter_map(validate_driver_event)
        .chain(requests.iter().filter_map(validate_passenger_request))
        .collect();

    let mut event_ids = HashSet::new();
    let mut session_by_driver: HashMap<&str, &str> = HashMap::new();
    let mut driver_by_session: HashMap<&str, &str> = HashMap::new();
    for event in drivers {
        if !event_ids.insert(event.event_id.as_str()) {
            violations.push(format!("{}: duplicate event_id", event.event_id));
        }
        let session = *session_by_driver
            .entry(&event.driver_id)
            .or_insert(&event.driver_session_id);
        if session != event.driver_session_id {
            violations.push(format!(
                "{}: driver {} has sessions {session} and {}",
                event.event_id, event.driver_id, event.driver_session_id
            ));
        }
        let driver = *driver_by_session
            .entry(&event.driver_session_id)
            .or_insert(&event.driver_id);
        if driver != event.driver_id {
            violations.push(format!(
                "{}: session {} shared by drivers {driver} and {}",
                event.event_id, event.driver_session_id, event.driver_id
            ));
        }
    }

    let mut request_ids = HashSet::new();
    for request in requests {
        if !request_ids.insert(request.request_id.as_str()) {
            violations.push(format!("{}: duplicate request_id", request.request_id));
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{DriverStatus, Feedback};
    use crate::test_helpers::{available_driver, pending_request};

    #[test]
    fn valid_records_pass() {
        assert_eq!(validate_driver_event(&available_driver(0)), None);
        assert_eq!(validate_passenger_request(&pending_request(0)), None);
    }

    #[test]
    fn engaged_driver_without_ride_is_flagged() {
        let mut event = available_driver(0);
        event.status = DriverStatus::Engaged;
        assert!(validate_driver_event(&event).unwrap().contains("requires a ride_id"));
    }

    #[test]
    fn feedback_on_canceled_request_is_flagged() {
        let mut request = pending_request(0);
        request.status = RequestStatus::Canceled;
        request.cancellation_reason = Some("Changed plans.".into());
        request.feedback = Some(Feedback {
            rating: 5,
            comments: "Enjoyed the ride, no complaints at all.".into(),
        });
        assert!(validate_passenger_request(&request).unwrap().contains("feedback"));
    }

    #[test]
    fn completed_request_without_driver_is_flagged() {
        let mut request = pending_request(0);
        request.complete(Feedback {
            rating: 3,
            comments: "The ride was okay, nothing special.".into(),
        });
        assert!(validate_passenger_request(&request).unwrap().contains("driver_id"));
    }

    #[test]
    fn out_of_range_duration_is_flagged() {
        let mut request = pending_request(0);
        request.duration_estimate = Some(10);
        assert!(validate_passenger_request(&request).is_some());
    }

    #[test]
    fn shared_session_and_duplicate_ids_are_flagged() {
        let a = available_driver(0);
        let mut b = available_driver(1);
        b.driver_session_id = a.driver_session_id.clone();
        let dup = a.clone();
        let violations = validate_dataset(&[a, b, dup], &[pending_request(0), pending_request(0)]);
        assert_eq!(violations.len(), 3, "{violations:?}");
    }
}
