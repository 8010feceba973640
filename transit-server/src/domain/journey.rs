//! Itinerary types.
//!
//! An `Itinerary` is the result of a successful search: the ordered list
//! of rides and walks that takes a rider from the origin stop to the
//! destination stop.

use super::{RouteId, StopId, TimeOfDay, TripId};

/// A ride on one trip, from the boarding stop to the alighting stop.
///
/// `start` is the time the rider is available at the boarding stop, so the
/// ride's duration includes any wait for the vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct Ride {
    pub from: StopId,
    pub to: StopId,
    pub trip_id: TripId,
    pub route_id: RouteId,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub instruction: String,
}

/// A walk between two nearby stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Walk {
    pub from: StopId,
    pub to: StopId,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    /// Straight-line (haversine) distance between the stops.
    pub distance_m: f64,
    pub instruction: String,
}

/// A segment of an itinerary: either a ride or a walk.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Ride(Ride),
    Walk(Walk),
}

impl Segment {
    /// Returns the stop this segment starts from.
    pub fn origin(&self) -> &StopId {
        match self {
            Segment::Ride(ride) => &ride.from,
            Segment::Walk(walk) => &walk.from,
        }
    }

    /// Returns the stop this segment ends at.
    pub fn destination(&self) -> &StopId {
        match self {
            Segment::Ride(ride) => &ride.to,
            Segment::Walk(walk) => &walk.to,
        }
    }

    pub fn start(&self) -> TimeOfDay {
        match self {
            Segment::Ride(ride) => ride.start,
            Segment::Walk(walk) => walk.start,
        }
    }

    pub fn end(&self) -> TimeOfDay {
        match self {
            Segment::Ride(ride) => ride.end,
            Segment::Walk(walk) => walk.end,
        }
    }

    /// Returns the duration of this segment in seconds.
    pub fn duration_secs(&self) -> u32 {
        self.end().seconds_since(self.start())
    }

    pub fn instruction(&self) -> &str {
        match self {
            Segment::Ride(ride) => &ride.instruction,
            Segment::Walk(walk) => &walk.instruction,
        }
    }

    /// Returns true if this is a ride segment.
    pub fn is_ride(&self) -> bool {
        matches!(self, Segment::Ride(_))
    }

    /// Returns true if this is a walk segment.
    pub fn is_walk(&self) -> bool {
        matches!(self, Segment::Walk(_))
    }

    /// Returns the ride if this is a ride segment.
    pub fn as_ride(&self) -> Option<&Ride> {
        match self {
            Segment::Ride(ride) => Some(ride),
            Segment::Walk(_) => None,
        }
    }

    /// Returns the walk if this is a walk segment.
    pub fn as_walk(&self) -> Option<&Walk> {
        match self {
            Segment::Ride(_) => None,
            Segment::Walk(walk) => Some(walk),
        }
    }
}

/// A computed journey from origin to destination.
///
/// # Invariants
///
/// - Segments are in chronological order
/// - Consecutive segments connect (destination of one = origin of next)
/// - An origin equal to the destination gives an empty segment list
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub origin: StopId,
    pub destination: StopId,
    /// Arrival at the destination minus departure from the origin.
    pub total_duration_secs: u32,
    /// Number of boardings after the first.
    pub transfers: usize,
    pub segments: Vec<Segment>,
}

impl Itinerary {
    /// Returns all rides in order.
    pub fn rides(&self) -> impl Iterator<Item = &Ride> {
        self.segments.iter().filter_map(|s| s.as_ride())
    }

    /// Returns all walks in order.
    pub fn walks(&self) -> impl Iterator<Item = &Walk> {
        self.segments.iter().filter_map(|s| s.as_walk())
    }

    pub fn ride_count(&self) -> usize {
        self.rides().count()
    }

    pub fn walk_count(&self) -> usize {
        self.walks().count()
    }

    /// Time the rider leaves the origin, if there is anything to do.
    pub fn departure_time(&self) -> Option<TimeOfDay> {
        self.segments.first().map(|s| s.start())
    }

    /// Time the rider reaches the destination, if there is anything to do.
    pub fn arrival_time(&self) -> Option<TimeOfDay> {
        self.segments.last().map(|s| s.end())
    }

    /// Sum of the individual segment durations.
    ///
    /// Equal to `total_duration_secs` for any itinerary built by the planner.
    pub fn segment_duration_sum(&self) -> u32 {
        self.segments.iter().map(|s| s.duration_secs()).sum()
    }
}
