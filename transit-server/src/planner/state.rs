//! Per-search tables.
//!
//! Every search gets fresh tables sized to the stop arena: the best known
//! arrival at each stop and the link explaining how that arrival was
//! reached. Nothing here is shared between searches.

use crate::domain::{RouteId, TimeOfDay, TripId};
use crate::timetable::StopIndex;

/// How a stop's best arrival was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Via {
    /// The search started here.
    Origin,
    /// Riding a trip from the linked stop.
    Ride { trip_id: TripId, route_id: RouteId },
    /// Walking a transfer from the linked stop.
    Walk,
}

/// Parent pointer for one stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    /// Round in which the arrival was recorded.
    pub round: usize,
    /// Predecessor stop (the boarding stop for rides).
    pub from: StopIndex,
    pub via: Via,
}

impl ParentLink {
    /// The synthetic link recorded for the origin.
    pub fn origin(stop: StopIndex) -> Self {
        Self {
            round: 0,
            from: stop,
            via: Via::Origin,
        }
    }
}

/// Best arrivals and parent links for every stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    best: Vec<Option<TimeOfDay>>,
    parents: Vec<Option<ParentLink>>,
}

impl SearchState {
    /// Create empty tables for an arena of `stop_count` stops.
    pub fn new(stop_count: usize) -> Self {
        Self {
            best: vec![None; stop_count],
            parents: vec![None; stop_count],
        }
    }

    /// Best known arrival at a stop.
    pub fn best(&self, stop: StopIndex) -> Option<TimeOfDay> {
        self.best.get(stop.0).copied().flatten()
    }

    /// Link explaining the best arrival at a stop.
    pub fn parent(&self, stop: StopIndex) -> Option<&ParentLink> {
        self.parents.get(stop.0).and_then(|p| p.as_ref())
    }

    /// Returns true if `arrival` beats the stop's current best (or the stop
    /// has not been reached yet).
    pub fn improves(&self, stop: StopIndex, arrival: TimeOfDay) -> bool {
        self.best(stop).is_none_or(|best| arrival < best)
    }

    /// Overwrite a stop's best arrival and parent link.
    pub fn record(&mut self, stop: StopIndex, arrival: TimeOfDay, link: ParentLink) {
        self.best[stop.0] = Some(arrival);
        self.parents[stop.0] = Some(link);
    }

    /// Number of stops with a recorded arrival.
    pub fn reached_count(&self) -> usize {
        self.best.iter().filter(|b| b.is_some()).count()
    }
}

/// Stops improved during the current round, in first-improvement order.
#[derive(Debug, Clone)]
pub(crate) struct ImprovedStops {
    seen: Vec<bool>,
    order: Vec<StopIndex>,
}

impl ImprovedStops {
    pub fn new(stop_count: usize) -> Self {
        Self {
            seen: vec![false; stop_count],
            order: Vec::new(),
        }
    }

    pub fn insert(&mut self, stop: StopIndex) {
        if !self.seen[stop.0] {
            self.seen[stop.0] = true;
            self.order.push(stop);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drain the set, returning its stops and leaving it empty.
    pub fn take(&mut self) -> Vec<StopIndex> {
        for stop in &self.order {
            self.seen[stop.0] = false;
        }
        std::mem::take(&mut self.order)
    }
}
