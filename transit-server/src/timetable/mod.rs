//! Timetable storage for the planner.
//!
//! The planner never talks to a data store. It is handed flat record
//! collections (usually via a JSON snapshot) and builds an immutable index
//! from them once.

mod index;
mod snapshot;

pub use index::{IndexStats, StopIndex, TimetableIndex, TimetableRecords};
pub use snapshot::{
    RouteRecord, SnapshotError, StopRecord, StopTimeRecord, TimetableSnapshot, TransferRecord,
    TripRecord,
};
