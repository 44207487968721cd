use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray, StructArray};
use arrow::datatypes::Schema;

use crate::error::FeedResult;
use crate::records::{DriverEvent, DriverStatus, TrafficCondition, VehicleType};

use super::utils::{
    column, i64_field, location_array, location_field, nullable_utf8_field, optional_string,
    parse_symbol, read_locations, read_record_batches, utf8_field, write_record_batch,
};

/// Columnar schema for driver events. Enum columns hold their symbols as
/// UTF-8; the status column spells `en_route` as `en route`.
pub fn driver_event_schema() -> Schema {
    Schema::new(vec![
        utf8_field("event_id"),
        utf8_field("driver_id"),
        i64_field("timestamp"),
        location_field("location"),
        utf8_field("status"),
        nullable_utf8_field("ride_id"),
        utf8_field("vehicle_type"),
        utf8_field("driver_session_id"),
        nullable_utf8_field("traffic_condition"),
    ])
}

pub fn write_driver_events_parquet<P: AsRef<Path>>(path: P, events: &[DriverEvent]) -> FeedResult<()> {
    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(events.iter().map(|e| &e.event_id))),
        Arc::new(StringArray::from_iter_values(events.iter().map(|e| &e.driver_id))),
        Arc::new(Int64Array::from_iter_values(events.iter().map(|e| e.timestamp))),
        location_array(events.iter().map(|e| &e.location))?,
        Arc::new(StringArray::from_iter_values(
            events.iter().map(|e| e.status.schema_symbol()),
        )),
        Arc::new(events.iter().map(|e| e.ride_id.as_deref()).collect::<StringArray>()),
        Arc::new(StringArray::from_iter_values(
            events.iter().map(|e| e.vehicle_type.as_str()),
        )),
        Arc::new(StringArray::from_iter_values(
            events.iter().map(|e| &e.driver_session_id),
        )),
        Arc::new(
            events
                .iter()
                .map(|e| e.traffic_condition.map(TrafficCondition::as_str))
                .collect::<StringArray>(),
        ),
    ];
    write_record_batch(path.as_ref(), driver_event_schema(), arrays)
}

/// Read driver events back. Accepts both spellings of the en-route status.
pub fn read_driver_events_parquet<P: AsRef<Path>>(path: P) -> FeedResult<Vec<DriverEvent>> {
    let mut events = Vec::new();
    for batch in read_record_batches(path.as_ref(), "event_id")? {
        let event_id = column::<StringArray>(&batch, "event_id")?;
        let driver_id = column::<StringArray>(&batch, "driver_id")?;
        let timestamp = column::<Int64Array>(&batch, "timestamp")?;
        let locations = read_locations(column::<StructArray>(&batch, "location")?)?;
        let status = column::<StringArray>(&batch, "status")?;
        let ride_id = column::<StringArray>(&batch, "ride_id")?;
        let vehicle_type = column::<StringArray>(&batch, "vehicle_type")?;
        let session = column::<StringArray>(&batch, "driver_session_id")?;
        let traffic = column::<StringArray>(&batch, "traffic_condition")?;

        for row in 0..batch.num_rows() {
            let traffic_condition = match optional_string(traffic, row) {
                Some(symbol) => Some(parse_symbol(
                    "traffic_condition",
                    &symbol,
                    TrafficCondition::from_symbol,
                )?),
                None => None,
            };
            events.push(DriverEvent {
                event_id: event_id.value(row).to_string(),
                driver_id: driver_id.value(row).to_string(),
                timestamp: timestamp.value(row),
                location: locations[row],
                status: parse_symbol("status", status.value(row), DriverStatus::from_schema_symbol)?,
                ride_id: optional_string(ride_id, row),
                vehicle_type: parse_symbol(
                    "vehicle_type",
                    vehicle_type.value(row),
                    VehicleType::from_symbol,
                )?,
                driver_session_id: session.value(row).to_string(),
                traffic_condition,
            });
        }
    }
    Ok(events)
}
