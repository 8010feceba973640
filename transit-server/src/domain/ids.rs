//! Identifier types for timetable records.
//!
//! Identifiers are opaque strings supplied by the data source. Each kind
//! of record gets its own newtype so a trip id can never be passed where a
//! stop id is expected.

use std::fmt;

use serde::Serialize;

use super::DomainError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Parse an identifier, rejecting empty or blank strings.
            pub fn parse(s: impl Into<String>) -> Result<Self, DomainError> {
                let s = s.into();
                if s.trim().is_empty() {
                    return Err(DomainError::EmptyId($kind));
                }
                Ok(Self(s))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a stop.
    ///
    /// ```
    /// use transit_server::domain::StopId;
    ///
    /// let id = StopId::parse("S1").unwrap();
    /// assert_eq!(id.as_str(), "S1");
    /// assert!(StopId::parse("  ").is_err());
    /// ```
    StopId,
    "stop"
);

string_id!(
    /// Identifier of a route.
    RouteId,
    "route"
);

string_id!(
    /// Identifier of a trip.
    TripId,
    "trip"
);
