//! Record types emitted by the generator: driver availability events and
//! passenger ride requests, plus their enumerations.
//!
//! Enum symbols serialize in snake_case for the JSON dump. The binary schema
//! uses [`DriverStatus::schema_symbol`], which spells `en_route` as the
//! historical `en route`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

macro_rules! symbol_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $symbol:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Snake-case symbol used in the JSON dump.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $symbol),+
                }
            }

            pub fn from_symbol(symbol: &str) -> Option<Self> {
                match symbol {
                    $($symbol => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

symbol_enum! {
    /// Driver availability as reported by a status update.
    pub enum DriverStatus {
        Available => "available",
        EnRoute => "en_route",
        Engaged => "engaged",
        Offline => "offline",
    }
}

impl DriverStatus {
    /// Symbol written to the binary schema.
    pub fn schema_symbol(self) -> &'static str {
        match self {
            DriverStatus::EnRoute => "en route",
            other => other.as_str(),
        }
    }

    /// Parse either spelling of the en-route symbol.
    pub fn from_schema_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "en route" => Some(DriverStatus::EnRoute),
            other => Self::from_symbol(other),
        }
    }

    /// Statuses that carry a ride id.
    pub fn has_ride(self) -> bool {
        matches!(self, DriverStatus::EnRoute | DriverStatus::Engaged)
    }
}

symbol_enum! {
    pub enum VehicleType {
        Sedan => "sedan",
        Suv => "suv",
        Hatchback => "hatchback",
        Van => "van",
        Truck => "truck",
    }
}

symbol_enum! {
    /// Road congestion at the time of an event.
    pub enum TrafficCondition {
        Light => "light",
        Moderate => "moderate",
        Heavy => "heavy",
        Gridlock => "gridlock",
        Unknown => "unknown",
    }
}

symbol_enum! {
    pub enum RequestStatus {
        Requested => "requested",
        Accepted => "accepted",
        Canceled => "canceled",
        Completed => "completed",
    }
}

symbol_enum! {
    pub enum RideType {
        Standard => "standard",
        Premium => "premium",
        Pool => "pool",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverEvent {
    pub event_id: String,
    pub driver_id: String,
    /// Unix seconds.
    pub timestamp: i64,
    pub location: Location,
    pub status: DriverStatus,
    pub ride_id: Option<String>,
    pub vehicle_type: VehicleType,
    pub driver_session_id: String,
    pub traffic_condition: Option<TrafficCondition>,
}

impl DriverEvent {
    /// Put the driver on a ride.
    pub fn engage(&mut self, ride_id: String) {
        self.status = DriverStatus::Engaged;
        self.ride_id = Some(ride_id);
    }

    /// Release the driver back into the available pool.
    pub fn release(&mut self) {
        self.status = DriverStatus::Available;
        self.ride_id = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// 1 to 5 inclusive.
    pub rating: i32,
    pub comments: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerRequest {
    pub request_id: String,
    pub passenger_id: String,
    /// Unix seconds.
    pub timestamp: i64,
    pub pickup_location: Location,
    pub dropoff_location: Location,
    pub status: RequestStatus,
    pub cancellation_reason: Option<String>,
    pub driver_id: Option<String>,
    pub ride_type: RideType,
    /// Seconds.
    pub duration_estimate: Option<i32>,
    pub fare_estimate: Option<f64>,
    pub feedback: Option<Feedback>,
}

impl PassengerRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Requested
    }

    /// Terminal success: attaches feedback and clears any cancellation reason.
    pub fn complete(&mut self, feedback: Feedback) {
        self.status = RequestStatus::Completed;
        self.feedback = Some(feedback);
        self.cancellation_reason = None;
    }

    /// Terminal failure: attaches the reason and clears any feedback.
    pub fn cancel(&mut self, reason: String) {
        self.status = RequestStatus::Canceled;
        self.cancellation_reason = Some(reason);
        self.feedback = None;
    }
}
