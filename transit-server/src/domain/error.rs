//! Domain error types.
//!
//! These errors represent validation failures when building timetable
//! records. They are distinct from search and IO errors.

use super::time::TimeError;

/// Domain-level errors for record validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// An identifier was empty or whitespace
    #[error("{0} id must not be empty")]
    EmptyId(&'static str),

    /// Latitude or longitude outside the WGS-84 range
    #[error("invalid coordinates ({lat}, {lng})")]
    InvalidCoordinates { lat: f64, lng: f64 },

    /// Walking distance was negative or not a number
    #[error("invalid transfer distance: {0}")]
    InvalidDistance(f64),

    /// Walking speed was zero, negative or not a number
    #[error("invalid walking speed: {0} m/s")]
    InvalidWalkingSpeed(f64),

    /// A time-of-day string could not be parsed
    #[error(transparent)]
    InvalidTime(#[from] TimeError),
}
