//! Routes, trips and their scheduled stop-times.

use super::{RouteId, StopId, TimeOfDay, TripId};

/// A named line that trips run along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub id: RouteId,
    pub short_name: String,
    pub long_name: String,
}

impl Route {
    pub fn new(id: RouteId, short_name: impl Into<String>, long_name: impl Into<String>) -> Self {
        Self {
            id,
            short_name: short_name.into(),
            long_name: long_name.into(),
        }
    }

    /// Name suitable for rider-facing instructions.
    ///
    /// ```
    /// use transit_server::domain::{Route, RouteId};
    ///
    /// let id = RouteId::parse("R1").unwrap();
    /// assert_eq!(Route::new(id.clone(), "42", "Harbour Loop").display_name(), "42 (Harbour Loop)");
    /// assert_eq!(Route::new(id.clone(), "42", "").display_name(), "42");
    /// assert_eq!(Route::new(id.clone(), "", "Harbour Loop").display_name(), "Harbour Loop");
    /// assert_eq!(Route::new(id, "", "").display_name(), "R1");
    /// ```
    pub fn display_name(&self) -> String {
        let short = self.short_name.trim();
        let long = self.long_name.trim();
        match (short.is_empty(), long.is_empty()) {
            (false, false) => format!("{short} ({long})"),
            (false, true) => short.to_string(),
            (true, false) => long.to_string(),
            (true, true) => self.id.to_string(),
        }
    }
}

/// One scheduled run of a vehicle along a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub id: TripId,
    pub route_id: RouteId,
}

impl Trip {
    pub fn new(id: TripId, route_id: RouteId) -> Self {
        Self { id, route_id }
    }
}

/// A trip's scheduled visit to a stop.
///
/// Only one timestamp is carried per visit: a vehicle is assumed to depart
/// at the moment it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTime {
    pub trip_id: TripId,
    pub stop_id: StopId,
    pub arrival: TimeOfDay,
    /// Position of this visit along the trip.
    pub sequence: u32,
}

impl StopTime {
    pub fn new(trip_id: TripId, stop_id: StopId, arrival: TimeOfDay, sequence: u32) -> Self {
        Self {
            trip_id,
            stop_id,
            arrival,
            sequence,
        }
    }
}
