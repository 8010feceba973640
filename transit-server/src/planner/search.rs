//! Round-based earliest-arrival search.
//!
//! Each round allows one more boarding. A round scans every trip of every
//! route serving a stop that improved in the previous round, boarding at
//! the first stop the rider can already reach in time and recording any
//! earlier arrival further along the trip. Walking transfers are relaxed
//! as soon as a stop improves, within the same round.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::domain::{Itinerary, RouteId, StopId, TimeError, TimeOfDay, TripId};
use crate::timetable::{StopIndex, TimetableIndex};

use super::config::SearchConfig;
use super::reconstruct::reconstruct;
use super::state::{ImprovedStops, ParentLink, SearchState, Via};

/// Error from journey search.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// Origin or destination is not in the timetable
    #[error("unknown stop: {0}")]
    UnknownStop(StopId),

    /// Departure time could not be parsed
    #[error(transparent)]
    InvalidTime(#[from] TimeError),

    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// Best-arrival and parent tables disagree
    #[error("inconsistent search state: {0}")]
    InconsistentState(String),

    /// Search timed out
    #[error("search timed out")]
    Timeout,
}

/// Request for journey search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub origin: StopId,
    pub destination: StopId,
    /// Time the rider is ready to leave the origin.
    pub departure: TimeOfDay,
    /// Service date. Every trip is treated as running on every date, so
    /// this does not affect the result.
    pub date: NaiveDate,
}

impl SearchRequest {
    /// Create a new search request.
    pub fn new(origin: StopId, destination: StopId, departure: TimeOfDay, date: NaiveDate) -> Self {
        Self {
            origin,
            destination,
            departure,
            date,
        }
    }

    /// Build a request from raw strings, failing fast on malformed input.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use transit_server::planner::SearchRequest;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    /// let request = SearchRequest::parse("S1", "S3", "08:00:00", date).unwrap();
    /// assert_eq!(request.departure.seconds(), 28_800);
    ///
    /// assert!(SearchRequest::parse("S1", "S3", "8am", date).is_err());
    /// assert!(SearchRequest::parse("", "S3", "08:00:00", date).is_err());
    /// ```
    pub fn parse(
        origin: &str,
        destination: &str,
        departure: &str,
        date: NaiveDate,
    ) -> Result<Self, SearchError> {
        let origin = StopId::parse(origin)
            .map_err(|e| SearchError::InvalidRequest(format!("origin: {e}")))?;
        let destination = StopId::parse(destination)
            .map_err(|e| SearchError::InvalidRequest(format!("destination: {e}")))?;
        let departure = TimeOfDay::parse(departure)?;

        Ok(Self::new(origin, destination, departure, date))
    }
}

/// Journey planner over an immutable timetable index.
///
/// The planner holds only shared references; each call to
/// [`Planner::search`] allocates its own tables.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    index: &'a TimetableIndex,
    config: &'a SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(index: &'a TimetableIndex, config: &'a SearchConfig) -> Self {
        Self { index, config }
    }

    /// Find the earliest-arrival itinerary for a request.
    ///
    /// Returns `Ok(None)` when the destination cannot be reached within the
    /// configured number of rounds.
    pub fn search(&self, request: &SearchRequest) -> Result<Option<Itinerary>, SearchError> {
        let origin = self.resolve(&request.origin)?;
        let destination = self.resolve(&request.destination)?;

        debug!(
            origin = %request.origin,
            destination = %request.destination,
            departure = %request.departure,
            date = %request.date,
            "Starting journey search"
        );

        let state = self.scan(origin, request.departure);

        if state.best(destination).is_none() {
            debug!(reached = state.reached_count(), "Destination not reached");
            return Ok(None);
        }

        let itinerary = reconstruct(self.index, &state, origin, destination)?;

        debug!(
            duration_secs = itinerary.total_duration_secs,
            transfers = itinerary.transfers,
            rides = itinerary.ride_count(),
            walks = itinerary.walk_count(),
            "Journey search complete"
        );

        Ok(Some(itinerary))
    }

    /// Run the rounds from `origin` and return the filled tables.
    pub fn scan(&self, origin: StopIndex, departure: TimeOfDay) -> SearchState {
        let stop_count = self.index.stop_count();
        let mut state = SearchState::new(stop_count);
        let mut improved = ImprovedStops::new(stop_count);

        state.record(origin, departure, ParentLink::origin(origin));
        improved.insert(origin);
        self.relax_transfers(&mut state, &mut improved, origin, 0);

        let mut marked_stops = improved.take();

        for round in 1..=self.config.max_rounds {
            // Sorted so repeated searches scan routes in the same order
            let marked_routes: BTreeSet<&RouteId> = marked_stops
                .iter()
                .flat_map(|&stop| self.index.routes_at(stop))
                .collect();

            trace!(
                round,
                marked_stops = marked_stops.len(),
                marked_routes = marked_routes.len(),
                "Scanning round"
            );

            for route_id in marked_routes {
                for trip_id in self.index.trips_for_route(route_id) {
                    self.scan_trip(&mut state, &mut improved, trip_id, round);
                }
            }

            if improved.is_empty() {
                debug!(round, "No stop improved, stopping early");
                break;
            }
            marked_stops = improved.take();
        }

        state
    }

    /// Scan one trip in sequence order.
    ///
    /// The rider boards at the first call whose stop they can reach no
    /// later than the vehicle, then every later call that beats the
    /// stop's best arrival is recorded. Calls timed before the boarding
    /// call are skipped, so a trip whose times run backwards cannot make a
    /// stop its own ancestor.
    fn scan_trip(
        &self,
        state: &mut SearchState,
        improved: &mut ImprovedStops,
        trip_id: &TripId,
        round: usize,
    ) {
        let Some(trip) = self.index.trip(trip_id) else {
            return;
        };

        let mut boarded_at: Option<(StopIndex, TimeOfDay)> = None;

        for call in self.index.calls(trip_id) {
            let Some((board, boarded_time)) = boarded_at else {
                if state.best(call.stop).is_some_and(|best| best <= call.arrival) {
                    boarded_at = Some((call.stop, call.arrival));
                }
                continue;
            };

            if call.arrival < boarded_time {
                trace!(
                    trip = %trip_id,
                    stop = call.stop.get(),
                    "Skipping call timed before boarding"
                );
                continue;
            }

            if state.improves(call.stop, call.arrival) {
                let link = ParentLink {
                    round,
                    from: board,
                    via: Via::Ride {
                        trip_id: trip.id.clone(),
                        route_id: trip.route_id.clone(),
                    },
                };
                state.record(call.stop, call.arrival, link);
                improved.insert(call.stop);
                self.relax_transfers(state, improved, call.stop, round);
            }
        }
    }

    /// Relax the walks leaving a freshly improved stop.
    ///
    /// Walked-to stops join the current round's improved set, but their own
    /// walks are not followed.
    fn relax_transfers(
        &self,
        state: &mut SearchState,
        improved: &mut ImprovedStops,
        from: StopIndex,
        round: usize,
    ) {
        let Some(arrival) = state.best(from) else {
            return;
        };

        for (to, duration_secs) in self.index.walks_from(from) {
            let candidate = arrival.saturating_add(duration_secs);
            if state.improves(to, candidate) {
                let link = ParentLink {
                    round,
                    from,
                    via: Via::Walk,
                };
                state.record(to, candidate, link);
                improved.insert(to);
            }
        }
    }

    fn resolve(&self, id: &StopId) -> Result<StopIndex, SearchError> {
        self.index
            .stop_index(id)
            .ok_or_else(|| SearchError::UnknownStop(id.clone()))
    }
}
