use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::path::Path;

use feed_core::export::{
    read_driver_events_parquet, read_passenger_requests_parquet, validate_dataset,
};
use feed_core::records::{DriverEvent, PassengerRequest};
use feed_core::FeedError;
use tracing::{info, warn};

/// Print a status summary of a driver or request Parquet file. The kind is
/// detected from the key column; decode errors in a driver file are reported
/// as they are.
pub fn inspect(path: &Path) -> Result<(), Box<dyn Error>> {
    match read_driver_events_parquet(path) {
        Ok(events) => {
            report_violations(&validate_dataset(&events, &[]));
            print!("{}", driver_summary(&events));
            Ok(())
        }
        Err(FeedError::MissingKeyColumn { column, .. }) => {
            info!(column, "not a driver file, trying passenger requests");
            let requests = read_passenger_requests_parquet(path)?;
            report_violations(&validate_dataset(&[], &requests));
            print!("{}", request_summary(&requests));
            Ok(())
        }
        Err(error) => Err(error.into()),
    }
}

fn report_violations(violations: &[String]) {
    for violation in violations {
        warn!(%violation, "record invariant violated");
    }
}

fn driver_summary(events: &[DriverEvent]) -> String {
    let mut by_status: BTreeMap<&str, usize> = BTreeMap::new();
    for event in events {
        *by_status.entry(event.status.as_str()).or_default() += 1;
    }
    let drivers: HashSet<&str> = events.iter().map(|e| e.driver_id.as_str()).collect();
    let sessions: HashSet<&str> = events.iter().map(|e| e.driver_session_id.as_str()).collect();

    let mut out = format!(
        "driver events: {}\ndistinct drivers: {}\ndistinct sessions: {}\n",
        events.len(),
        drivers.len(),
        sessions.len()
    );
    for (status, count) in by_status {
        out.push_str(&format!("  {status}: {count}\n"));
    }
    out
}

fn request_summary(requests: &[PassengerRequest]) -> String {
    let mut by_status: BTreeMap<&str, usize> = BTreeMap::new();
    for request in requests {
        *by_status.entry(request.status.as_str()).or_default() += 1;
    }
    let fares: Vec<f64> = requests.iter().filter_map(|r| r.fare_estimate).collect();
    let ratings: Vec<i32> = requests
        .iter()
        .filter_map(|r| r.feedback.as_ref().map(|f| f.rating))
        .collect();

    let mut out = format!("passenger requests: {}\n", requests.len());
    for (status, count) in by_status {
        out.push_str(&format!("  {status}: {count}\n"));
    }
    if !fares.is_empty() {
        let mean = fares.iter().sum::<f64>() / fares.len() as f64;
        out.push_str(&format!("mean fare estimate: {mean:.2}\n"));
    }
    if !ratings.is_empty() {
        let mean = ratings.iter().map(|&r| f64::from(r)).sum::<f64>() / ratings.len() as f64;
        out.push_str(&format!("mean rating: {mean:.2}\n"));
    }
    out
}
