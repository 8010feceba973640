//! Timetable index for round-based search.
//!
//! The index turns flat collections of records into the lookups the
//! planner needs: which routes serve a stop, which trips run on a route,
//! the ordered calls of each trip, and the walks leaving a stop. It is
//! built once and only read afterwards, so one index can serve any number
//! of concurrent searches.
//!
//! Stops live in an arena addressed by [`StopIndex`]; string ids are only
//! used at the edges.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::domain::{Route, RouteId, Stop, StopId, StopTime, TimeOfDay, Transfer, Trip, TripId};

/// Position of a stop in the index arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopIndex(pub(crate) usize);

impl StopIndex {
    pub fn get(&self) -> usize {
        self.0
    }
}

/// Flat record collections as supplied by a data source.
///
/// Ids are not required to be unique: later records overwrite earlier
/// ones with the same id.
#[derive(Debug, Clone, Default)]
pub struct TimetableRecords {
    pub stops: Vec<Stop>,
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
    pub transfers: Vec<Transfer>,
}

/// A trip's visit to a stop, resolved against the stop arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Call {
    pub stop: StopIndex,
    pub arrival: TimeOfDay,
}

/// A transfer resolved against the stop arena.
#[derive(Debug, Clone, Copy)]
struct Walkway {
    to: StopIndex,
    duration_secs: u32,
}

/// Counts gathered while building an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub stops: usize,
    pub routes: usize,
    pub trips: usize,
    pub stop_times: usize,
    pub transfers: usize,
    /// Stop-times whose trip is unknown, so no route could be learned.
    pub unrouted_stop_times: usize,
    /// Stop-times whose stop is unknown, so they cannot be scanned.
    pub unplaced_stop_times: usize,
    /// Transfers touching an unknown stop.
    pub dropped_transfers: usize,
}

/// Immutable lookup structures over a timetable.
#[derive(Debug, Clone, Default)]
pub struct TimetableIndex {
    stops: Vec<Stop>,
    stop_lookup: HashMap<StopId, StopIndex>,
    routes: HashMap<RouteId, Route>,
    trips: HashMap<TripId, Trip>,
    trips_by_route: HashMap<RouteId, Vec<TripId>>,
    /// Calls of each trip in sequence order, minus those at unknown stops.
    calls_by_trip: HashMap<TripId, Vec<Call>>,
    /// Distinct routes serving each stop, sorted by id.
    routes_by_stop: Vec<Vec<RouteId>>,
    walkways_by_stop: Vec<Vec<Walkway>>,
    stats: IndexStats,
}

impl TimetableIndex {
    /// Build an index from flat record collections.
    ///
    /// Malformed input never fails the build: duplicate ids overwrite,
    /// stop-times pointing at unknown trips serve no route, and stop-times
    /// or transfers pointing at unknown stops are left out of the search
    /// structures.
    pub fn build(records: TimetableRecords) -> Self {
        let TimetableRecords {
            stops: stop_records,
            routes: route_records,
            trips: trip_records,
            stop_times: stop_time_records,
            transfers: transfer_records,
        } = records;

        let mut stats = IndexStats {
            stop_times: stop_time_records.len(),
            ..IndexStats::default()
        };

        // Stops: a duplicate id reuses its arena slot
        let mut stops: Vec<Stop> = Vec::with_capacity(stop_records.len());
        let mut stop_lookup: HashMap<StopId, StopIndex> = HashMap::new();
        for stop in stop_records {
            match stop_lookup.get(&stop.id) {
                Some(idx) => stops[idx.0] = stop,
                None => {
                    stop_lookup.insert(stop.id.clone(), StopIndex(stops.len()));
                    stops.push(stop);
                }
            }
        }

        let mut routes: HashMap<RouteId, Route> = HashMap::new();
        for route in route_records {
            routes.insert(route.id.clone(), route);
        }

        // Trips: listed once per route, in first-seen order
        let mut trips: HashMap<TripId, Trip> = HashMap::new();
        let mut trips_by_route: HashMap<RouteId, Vec<TripId>> = HashMap::new();
        let mut listed: HashSet<(RouteId, TripId)> = HashSet::new();
        for trip in trip_records {
            if listed.insert((trip.route_id.clone(), trip.id.clone())) {
                trips_by_route
                    .entry(trip.route_id.clone())
                    .or_default()
                    .push(trip.id.clone());
            }
            trips.insert(trip.id.clone(), trip);
        }

        let mut stop_times_by_trip: HashMap<TripId, Vec<StopTime>> = HashMap::new();
        for stop_time in stop_time_records {
            stop_times_by_trip
                .entry(stop_time.trip_id.clone())
                .or_default()
                .push(stop_time);
        }
        // Stable, so equal sequence numbers keep insertion order
        for list in stop_times_by_trip.values_mut() {
            list.sort_by_key(|st| st.sequence);
        }

        let mut routes_by_stop: Vec<Vec<RouteId>> = vec![Vec::new(); stops.len()];
        let mut calls_by_trip: HashMap<TripId, Vec<Call>> = HashMap::new();
        for (trip_id, list) in stop_times_by_trip {
            let route_id = trips.get(&trip_id).map(|t| &t.route_id);
            let mut calls = Vec::with_capacity(list.len());

            for stop_time in &list {
                let Some(&stop) = stop_lookup.get(&stop_time.stop_id) else {
                    stats.unplaced_stop_times += 1;
                    continue;
                };
                calls.push(Call {
                    stop,
                    arrival: stop_time.arrival,
                });
                match route_id {
                    Some(route_id) => routes_by_stop[stop.0].push(route_id.clone()),
                    None => stats.unrouted_stop_times += 1,
                }
            }

            calls_by_trip.insert(trip_id, calls);
        }
        for served in &mut routes_by_stop {
            served.sort();
            served.dedup();
        }

        let mut walkways_by_stop: Vec<Vec<Walkway>> = vec![Vec::new(); stops.len()];
        for transfer in transfer_records {
            let from = stop_lookup.get(&transfer.from);
            let to = stop_lookup.get(&transfer.to);
            match (from, to) {
                (Some(from), Some(&to)) => {
                    walkways_by_stop[from.0].push(Walkway {
                        to,
                        duration_secs: transfer.duration_secs,
                    });
                    stats.transfers += 1;
                }
                _ => stats.dropped_transfers += 1,
            }
        }

        stats.stops = stops.len();
        stats.routes = routes.len();
        stats.trips = trips.len();

        debug!(
            stops = stats.stops,
            routes = stats.routes,
            trips = stats.trips,
            stop_times = stats.stop_times,
            transfers = stats.transfers,
            unrouted_stop_times = stats.unrouted_stop_times,
            unplaced_stop_times = stats.unplaced_stop_times,
            dropped_transfers = stats.dropped_transfers,
            "Built timetable index"
        );

        Self {
            stops,
            stop_lookup,
            routes,
            trips,
            trips_by_route,
            calls_by_trip,
            routes_by_stop,
            walkways_by_stop,
            stats,
        }
    }

    /// Returns the arena position of a stop.
    pub fn stop_index(&self, id: &StopId) -> Option<StopIndex> {
        self.stop_lookup.get(id).copied()
    }

    /// Returns a stop by id.
    pub fn stop(&self, id: &StopId) -> Option<&Stop> {
        self.stop_index(id).map(|idx| &self.stops[idx.0])
    }

    /// Returns the stop at an arena position.
    ///
    /// # Panics
    ///
    /// Panics if `idx` did not come from this index.
    pub fn stop_at(&self, idx: StopIndex) -> &Stop {
        &self.stops[idx.0]
    }

    /// Returns all stops in arena order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn route(&self, id: &RouteId) -> Option<&Route> {
        self.routes.get(id)
    }

    pub fn trip(&self, id: &TripId) -> Option<&Trip> {
        self.trips.get(id)
    }

    /// Returns the trips running on a route, in first-seen order.
    pub fn trips_for_route(&self, id: &RouteId) -> &[TripId] {
        self.trips_by_route
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the distinct routes with a trip calling at a stop.
    pub fn routes_serving(&self, id: &StopId) -> &[RouteId] {
        self.stop_index(id)
            .map(|idx| self.routes_at(idx))
            .unwrap_or(&[])
    }

    /// Returns the counts gathered at build time.
    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub(crate) fn routes_at(&self, idx: StopIndex) -> &[RouteId] {
        &self.routes_by_stop[idx.0]
    }

    /// Resolved calls of a trip, in sequence order.
    pub(crate) fn calls(&self, id: &TripId) -> &[Call] {
        self.calls_by_trip
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Walks leaving a stop: destination and duration in seconds.
    pub(crate) fn walks_from(&self, idx: StopIndex) -> impl Iterator<Item = (StopIndex, u32)> + '_ {
        self.walkways_by_stop[idx.0]
            .iter()
            .map(|w| (w.to, w.duration_secs))
    }
}
