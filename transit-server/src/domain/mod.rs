//! Domain types for the transit journey planner.
//!
//! This module contains the timetable records and itinerary types. All
//! types enforce their invariants at construction time, so code that
//! receives these types can trust their validity.

mod error;
mod ids;
mod journey;
mod route;
mod stop;
mod time;
mod transfer;

pub use error::DomainError;
pub use ids::{RouteId, StopId, TripId};
pub use journey::{Itinerary, Ride, Segment, Walk};
pub use route::{Route, StopTime, Trip};
pub use stop::{Coordinates, Stop};
pub use time::{TimeError, TimeOfDay};
pub use transfer::Transfer;
