//! Path reconstruction.
//!
//! Follows parent links from the destination back to the origin and turns
//! each hop into a ride or walk segment.

use crate::domain::{Itinerary, Ride, RouteId, Segment, Stop, TimeOfDay, Walk};
use crate::timetable::{StopIndex, TimetableIndex};

use super::search::SearchError;
use super::state::{SearchState, Via};

/// Build the itinerary ending at `destination` from filled search tables.
///
/// # Errors
///
/// Returns [`SearchError::InconsistentState`] if the destination has no
/// arrival, or if its parent chain is broken or never reaches the origin.
pub fn reconstruct(
    index: &TimetableIndex,
    state: &SearchState,
    origin: StopIndex,
    destination: StopIndex,
) -> Result<Itinerary, SearchError> {
    let origin_time = arrival_at(index, state, origin)?;
    let destination_time = arrival_at(index, state, destination)?;

    let mut segments = Vec::new();
    let mut rides = 0;
    let mut transfers = 0;
    let mut current = destination;

    while current != origin {
        // An acyclic chain visits each stop at most once
        if segments.len() >= index.stop_count() {
            return Err(inconsistent(format!(
                "parent chain from {} never reaches {}",
                index.stop_at(destination).id,
                index.stop_at(origin).id
            )));
        }

        let link = state.parent(current).ok_or_else(|| {
            inconsistent(format!("no parent for {}", index.stop_at(current).id))
        })?;
        let start = arrival_at(index, state, link.from)?;
        let end = arrival_at(index, state, current)?;
        let from = index.stop_at(link.from);
        let to = index.stop_at(current);

        let segment = match &link.via {
            Via::Ride { trip_id, route_id } => {
                rides += 1;
                if rides > 1 {
                    transfers += 1;
                }
                Segment::Ride(Ride {
                    from: from.id.clone(),
                    to: to.id.clone(),
                    trip_id: trip_id.clone(),
                    route_id: route_id.clone(),
                    start,
                    end,
                    instruction: ride_instruction(index, route_id, from, to),
                })
            }
            Via::Walk => Segment::Walk(Walk {
                from: from.id.clone(),
                to: to.id.clone(),
                start,
                end,
                distance_m: from.distance_m(to),
                instruction: format!("Walk to {}", to.name),
            }),
            Via::Origin => {
                return Err(inconsistent(format!(
                    "chain reached the start marker at {} instead of {}",
                    to.id,
                    index.stop_at(origin).id
                )));
            }
        };

        segments.push(segment);
        current = link.from;
    }

    // Collected destination-first
    segments.reverse();

    Ok(Itinerary {
        origin: index.stop_at(origin).id.clone(),
        destination: index.stop_at(destination).id.clone(),
        total_duration_secs: destination_time.seconds_since(origin_time),
        transfers,
        segments,
    })
}

fn ride_instruction(index: &TimetableIndex, route_id: &RouteId, from: &Stop, to: &Stop) -> String {
    let route = index
        .route(route_id)
        .map(|r| r.display_name())
        .unwrap_or_else(|| route_id.to_string());
    format!("Take {route} from {} to {}", from.name, to.name)
}

fn arrival_at(
    index: &TimetableIndex,
    state: &SearchState,
    stop: StopIndex,
) -> Result<TimeOfDay, SearchError> {
    state
        .best(stop)
        .ok_or_else(|| inconsistent(format!("no arrival recorded at {}", index.stop_at(stop).id)))
}

fn inconsistent(message: String) -> SearchError {
    SearchError::InconsistentState(message)
}
