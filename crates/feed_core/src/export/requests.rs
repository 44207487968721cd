use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int32Array, Int64Array, StringArray, StructArray};
use arrow::buffer::NullBuffer;
use arrow::datatypes::{DataType, Field, Fields, Schema};

use crate::error::FeedResult;
use crate::records::{Feedback, PassengerRequest, RequestStatus, RideType};

use super::utils::{
    column, i64_field, location_array, location_field, nullable_utf8_field, optional_string,
    parse_symbol, read_locations, read_record_batches, struct_child, utf8_field,
    write_record_batch,
};

fn feedback_fields() -> Fields {
    Fields::from(vec![
        Field::new("rating", DataType::Int32, false),
        Field::new("comments", DataType::Utf8, false),
    ])
}

/// Columnar schema for passenger requests. `feedback` is a nullable struct.
pub fn passenger_request_schema() -> Schema {
    Schema::new(vec![
        utf8_field("request_id"),
        utf8_field("passenger_id"),
        i64_field("timestamp"),
        location_field("pickup_location"),
        location_field("dropoff_location"),
        utf8_field("status"),
        nullable_utf8_field("cancellation_reason"),
        nullable_utf8_field("driver_id"),
        utf8_field("ride_type"),
        Field::new("duration_estimate", DataType::Int32, true),
        Field::new("fare_estimate", DataType::Float64, true),
        Field::new("feedback", DataType::Struct(feedback_fields()), true),
    ])
}

/// Null feedback rows keep placeholder child values (0, ""); the struct
/// validity buffer masks them.
fn feedback_array(requests: &[PassengerRequest]) -> FeedResult<ArrayRef> {
    let mut ratings = Vec::with_capacity(requests.len());
    let mut comments = Vec::with_capacity(requests.len());
    let mut valid = Vec::with_capacity(requests.len());
    for request in requests {
        match &request.feedback {
            Some(feedback) => {
                ratings.push(feedback.rating);
                comments.push(feedback.comments.as_str());
                valid.push(true);
            }
            None => {
                ratings.push(0);
                comments.push("");
                valid.push(false);
            }
        }
    }
    let children: Vec<ArrayRef> = vec![
        Arc::new(Int32Array::from(ratings)),
        Arc::new(StringArray::from(comments)),
    ];
    Ok(Arc::new(StructArray::try_new(
        feedback_fields(),
        children,
        Some(NullBuffer::from(valid)),
    )?))
}

pub fn write_passenger_requests_parquet<P: AsRef<Path>>(
    path: P,
    requests: &[PassengerRequest],
) -> FeedResult<()> {
    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(requests.iter().map(|r| &r.request_id))),
        Arc::new(StringArray::from_iter_values(requests.iter().map(|r| &r.passenger_id))),
        Arc::new(Int64Array::from_iter_values(requests.iter().map(|r| r.timestamp))),
        location_array(requests.iter().map(|r| &r.pickup_location))?,
        location_array(requests.iter().map(|r| &r.dropoff_location))?,
        Arc::new(StringArray::from_iter_values(
            requests.iter().map(|r| r.status.as_str()),
        )),
        Arc::new(
            requests
                .iter()
                .map(|r| r.cancellation_reason.as_deref())
                .collect::<StringArray>(),
        ),
        Arc::new(requests.iter().map(|r| r.driver_id.as_deref()).collect::<StringArray>()),
        Arc::new(StringArray::from_iter_values(
            requests.iter().map(|r| r.ride_type.as_str()),
        )),
        Arc::new(requests.iter().map(|r| r.duration_estimate).collect::<Int32Array>()),
        Arc::new(requests.iter().map(|r| r.fare_estimate).collect::<Float64Array>()),
        feedback_array(requests)?,
    ];
    write_record_batch(path.as_ref(), passenger_request_schema(), arrays)
}

pub fn read_passenger_requests_parquet<P: AsRef<Path>>(path: P) -> FeedResult<Vec<PassengerRequest>> {
    let mut requests = Vec::new();
    for batch in read_record_batches(path.as_ref(), "request_id")? {
        let request_id = column::<StringArray>(&batch, "request_id")?;
        let passenger_id = column::<StringArray>(&batch, "passenger_id")?;
        let timestamp = column::<Int64Array>(&batch, "timestamp")?;
        let pickups = read_locations(column::<StructArray>(&batch, "pickup_location")?)?;
        let dropoffs = read_locations(column::<StructArray>(&batch, "dropoff_location")?)?;
        let status = column::<StringArray>(&batch, "status")?;
        let reason = column::<StringArray>(&batch, "cancellation_reason")?;
        let driver_id = column::<StringArray>(&batch, "driver_id")?;
        let ride_type = column::<StringArray>(&batch, "ride_type")?;
        let duration = column::<Int32Array>(&batch, "duration_estimate")?;
        let fare = column::<Float64Array>(&batch, "fare_estimate")?;
        let feedback = column::<StructArray>(&batch, "feedback")?;
        let rating = struct_child::<Int32Array>(feedback, "rating")?;
        let comments = struct_child::<StringArray>(feedback, "comments")?;

        for row in 0..batch.num_rows() {
            requests.push(PassengerRequest {
                request_id: request_id.value(row).to_string(),
                passenger_id: passenger_id.value(row).to_string(),
                timestamp: timestamp.value(row),
                pickup_location: pickups[row],
                dropoff_location: dropoffs[row],
                status: parse_symbol("status", status.value(row), RequestStatus::from_symbol)?,
                cancellation_reason: optional_string(reason, row),
                driver_id: optional_string(driver_id, row),
                ride_type: parse_symbol("ride_type", ride_type.value(row), RideType::from_symbol)?,
                duration_estimate: (!duration.is_null(row)).then(|| duration.value(row)),
                fare_estimate: (!fare.is_null(row)).then(|| fare.value(row)),
                feedback: (!feedback.is_null(row)).then(|| Feedback {
                    rating: rating.value(row),
                    comments: comments.value(row).to_string(),
                }),
            });
        }
    }
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::pending_request;

    #[test]
    fn nullable_columns_survive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requests.parquet");

        let pending = PassengerRequest {
            duration_estimate: None,
            fare_estimate: None,
            ..pending_request(0)
        };
        let mut completed = pending_request(1);
        completed.driver_id = Some("D000001".into());
        completed.complete(Feedback {
            rating: 4,
            comments: "Very professional and courteous driver.".into(),
        });
        let mut canceled = pending_request(2);
        canceled.ride_type = RideType::Premium;
        canceled.cancel("Wait time too long.".into());

        let requests = vec![pending, completed, canceled];
        write_passenger_requests_parquet(&path, &requests).unwrap();
        assert_eq!(read_passenger_requests_parquet(&path).unwrap(), requests);
    }

    #[test]
    fn empty_input_writes_a_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/empty.parquet");
        write_passenger_requests_parquet(&path, &[]).unwrap();
        assert!(read_passenger_requests_parquet(&path).unwrap().is_empty());
    }
}
