//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Itinerary, Ride, RouteId, Segment, Stop, StopId, TimeOfDay, Transfer, Walk};
use crate::timetable::TimetableIndex;

/// A stop in the stop list.
#[derive(Debug, Serialize)]
pub struct StopResult {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,

    /// Routes with a trip calling here, sorted by id
    pub routes: Vec<String>,
}

/// Response listing every stop.
#[derive(Debug, Serialize)]
pub struct StopListResponse {
    pub stops: Vec<StopResult>,
}

/// Request to plan a journey.
#[derive(Debug, Deserialize)]
pub struct PlanJourneyRequest {
    /// Origin stop id
    pub origin: String,

    /// Destination stop id
    pub destination: String,

    /// Departure time as `HH:MM:SS`
    pub departure_time: String,

    /// Service date as `YYYY-MM-DD` (defaults to today)
    pub date: Option<String>,
}

/// Response for journey planning.
#[derive(Debug, Serialize)]
pub struct PlanJourneyResponse {
    /// Whether the destination was reached
    pub found: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary: Option<ItineraryResult>,
}

/// An itinerary.
#[derive(Debug, Serialize)]
pub struct ItineraryResult {
    pub origin: StopRef,
    pub destination: StopRef,

    /// Departure from the origin, absent for an empty itinerary
    pub departure_time: Option<String>,

    /// Arrival at the destination, absent for an empty itinerary
    pub arrival_time: Option<String>,

    pub total_duration_secs: u32,

    /// Number of changes between vehicles
    pub transfers: usize,

    pub segments: Vec<SegmentResult>,
}

/// A segment of an itinerary.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentResult {
    Ride(RideResult),
    Walk(WalkResult),
}

/// A ride on one trip.
#[derive(Debug, Serialize)]
pub struct RideResult {
    pub from: StopRef,
    pub to: StopRef,
    pub trip_id: String,
    pub route_id: String,
    pub start: TimeResult,
    pub end: TimeResult,
    pub duration_secs: u32,
    pub instruction: String,
}

/// A walk between two stops.
#[derive(Debug, Serialize)]
pub struct WalkResult {
    pub from: StopRef,
    pub to: StopRef,
    pub start: TimeResult,
    pub end: TimeResult,
    pub duration_secs: u32,
    pub distance_m: f64,
    pub instruction: String,
}

/// A stop id with its display name.
#[derive(Debug, Serialize)]
pub struct StopRef {
    pub id: String,
    pub name: String,
}

/// A time of day in both renderings.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TimeResult {
    /// `HH:MM:SS`, hours may exceed 23
    pub time: String,

    /// Seconds since midnight
    pub seconds: u32,
}

/// Request to generate walking transfers between nearby stops.
#[derive(Debug, Deserialize)]
pub struct GenerateTransfersRequest {
    pub radius_m: f64,

    /// Walking speed in metres per second (defaults to 1.4)
    pub walking_speed_mps: Option<f64>,
}

/// A generated transfer.
#[derive(Debug, Serialize)]
pub struct TransferResult {
    pub from: String,
    pub to: String,
    pub duration_secs: u32,
    pub distance_m: f64,
    pub accessible: bool,
}

/// Response for transfer generation.
#[derive(Debug, Serialize)]
pub struct GenerateTransfersResponse {
    pub transfers: Vec<TransferResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StopResult {
    pub fn from_stop(stop: &Stop, routes: &[RouteId]) -> Self {
        Self {
            id: stop.id.to_string(),
            name: stop.name.clone(),
            lat: stop.coordinates.lat(),
            lng: stop.coordinates.lng(),
            routes: routes.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl StopRef {
    /// Look up the stop's name, falling back to its id.
    pub fn lookup(id: &StopId, index: &TimetableIndex) -> Self {
        let name = index
            .stop(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string());
        Self {
            id: id.to_string(),
            name,
        }
    }
}

impl TimeResult {
    pub fn from_time(time: TimeOfDay) -> Self {
        Self {
            time: time.to_string(),
            seconds: time.seconds(),
        }
    }
}

impl ItineraryResult {
    /// Create from a domain Itinerary, naming stops from the index.
    pub fn from_itinerary(itinerary: &Itinerary, index: &TimetableIndex) -> Self {
        let segments = itinerary
            .segments
            .iter()
            .map(|s| match s {
                Segment::Ride(ride) => SegmentResult::Ride(RideResult::from_ride(ride, index)),
                Segment::Walk(walk) => SegmentResult::Walk(WalkResult::from_walk(walk, index)),
            })
            .collect();

        Self {
            origin: StopRef::lookup(&itinerary.origin, index),
            destination: StopRef::lookup(&itinerary.destination, index),
            departure_time: itinerary.departure_time().map(|t| t.to_string()),
            arrival_time: itinerary.arrival_time().map(|t| t.to_string()),
            total_duration_secs: itinerary.total_duration_secs,
            transfers: itinerary.transfers,
            segments,
        }
    }
}

impl RideResult {
    pub fn from_ride(ride: &Ride, index: &TimetableIndex) -> Self {
        Self {
            from: StopRef::lookup(&ride.from, index),
            to: StopRef::lookup(&ride.to, index),
            trip_id: ride.trip_id.to_string(),
            route_id: ride.route_id.to_string(),
            start: TimeResult::from_time(ride.start),
            end: TimeResult::from_time(ride.end),
            duration_secs: ride.end.seconds_since(ride.start),
            instruction: ride.instruction.clone(),
        }
    }
}

impl WalkResult {
    pub fn from_walk(walk: &Walk, index: &TimetableIndex) -> Self {
        Self {
            from: StopRef::lookup(&walk.from, index),
            to: StopRef::lookup(&walk.to, index),
            start: TimeResult::from_time(walk.start),
            end: TimeResult::from_time(walk.end),
            duration_secs: walk.end.seconds_since(walk.start),
            distance_m: walk.distance_m,
            instruction: walk.instruction.clone(),
        }
    }
}

impl TransferResult {
    pub fn from_transfer(transfer: &Transfer) -> Self {
        Self {
            from: transfer.from.to_string(),
            to: transfer.to.to_string(),
            duration_secs: transfer.duration_secs,
            distance_m: transfer.distance_m(),
            accessible: transfer.accessible,
        }
    }
}
