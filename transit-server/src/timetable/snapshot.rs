//! JSON timetable snapshots.
//!
//! A snapshot is the hand-off format from whatever stores the timetable:
//! one JSON document holding every stop, route, trip, stop-time and
//! transfer. Records are read as plain strings and numbers, then converted
//! into validated domain types before the index is built.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    Coordinates, DomainError, Route, RouteId, Stop, StopId, StopTime, TimeOfDay, Transfer, Trip,
    TripId,
};

use super::index::{TimetableIndex, TimetableRecords};

/// Errors that can occur while loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not valid snapshot JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record failed validation
    #[error("invalid {kind} record at index {index}: {source}")]
    InvalidRecord {
        kind: &'static str,
        index: usize,
        source: DomainError,
    },
}

impl SnapshotError {
    fn record(kind: &'static str, index: usize, source: DomainError) -> Self {
        SnapshotError::InvalidRecord {
            kind,
            index,
            source,
        }
    }
}

/// A stop as stored in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRecord {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// A route as stored in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    pub id: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub long_name: String,
}

/// A trip as stored in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: String,
    pub route_id: String,
}

/// A stop-time as stored in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopTimeRecord {
    pub trip_id: String,
    pub stop_id: String,
    /// "HH:MM:SS"
    pub arrival_time: String,
    pub sequence: u32,
}

/// A transfer as stored in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from_stop_id: String,
    pub to_stop_id: String,
    pub duration_secs: u32,
    pub distance_m: f64,
    #[serde(default = "default_accessible")]
    pub accessible: bool,
}

fn default_accessible() -> bool {
    true
}

/// A complete timetable as exported by the data store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimetableSnapshot {
    pub stops: Vec<StopRecord>,
    pub routes: Vec<RouteRecord>,
    pub trips: Vec<TripRecord>,
    pub stop_times: Vec<StopTimeRecord>,
    #[serde(default)]
    pub transfers: Vec<TransferRecord>,
}

impl TimetableSnapshot {
    /// Read a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json_str(&contents)?;

        info!(
            path = %path.display(),
            stops = snapshot.stops.len(),
            routes = snapshot.routes.len(),
            trips = snapshot.trips.len(),
            stop_times = snapshot.stop_times.len(),
            transfers = snapshot.transfers.len(),
            "Loaded timetable snapshot"
        );

        Ok(snapshot)
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Convert every record into its validated domain type.
    ///
    /// Fails on the first invalid record. Dangling references between
    /// records are not checked here; the index tolerates them.
    pub fn into_records(self) -> Result<TimetableRecords, SnapshotError> {
        let stops = self
            .stops
            .into_iter()
            .enumerate()
            .map(|(i, r)| convert_stop(r).map_err(|e| SnapshotError::record("stop", i, e)))
            .collect::<Result<Vec<_>, _>>()?;

        let routes = self
            .routes
            .into_iter()
            .enumerate()
            .map(|(i, r)| convert_route(r).map_err(|e| SnapshotError::record("route", i, e)))
            .collect::<Result<Vec<_>, _>>()?;

        let trips = self
            .trips
            .into_iter()
            .enumerate()
            .map(|(i, r)| convert_trip(r).map_err(|e| SnapshotError::record("trip", i, e)))
            .collect::<Result<Vec<_>, _>>()?;

        let stop_times = self
            .stop_times
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                convert_stop_time(r).map_err(|e| SnapshotError::record("stop_time", i, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let transfers = self
            .transfers
            .into_iter()
            .enumerate()
            .map(|(i, r)| convert_transfer(r).map_err(|e| SnapshotError::record("transfer", i, e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TimetableRecords {
            stops,
            routes,
            trips,
            stop_times,
            transfers,
        })
    }

    /// Validate the snapshot and build a search index from it.
    pub fn into_index(self) -> Result<TimetableIndex, SnapshotError> {
        Ok(TimetableIndex::build(self.into_records()?))
    }
}

fn convert_stop(r: StopRecord) -> Result<Stop, DomainError> {
    Ok(Stop::new(
        StopId::parse(r.id)?,
        r.name,
        Coordinates::new(r.lat, r.lng)?,
    ))
}

fn convert_route(r: RouteRecord) -> Result<Route, DomainError> {
    Ok(Route::new(RouteId::parse(r.id)?, r.short_name, r.long_name))
}

fn convert_trip(r: TripRecord) -> Result<Trip, DomainError> {
    Ok(Trip::new(TripId::parse(r.id)?, RouteId::parse(r.route_id)?))
}

fn convert_stop_time(r: StopTimeRecord) -> Result<StopTime, DomainError> {
    Ok(StopTime::new(
        TripId::parse(r.trip_id)?,
        StopId::parse(r.stop_id)?,
        TimeOfDay::parse(&r.arrival_time)?,
        r.sequence,
    ))
}

fn convert_transfer(r: TransferRecord) -> Result<Transfer, DomainError> {
    Transfer::new(
        StopId::parse(r.from_stop_id)?,
        StopId::parse(r.to_stop_id)?,
        r.duration_secs,
        r.distance_m,
        r.accessible,
    )
}
