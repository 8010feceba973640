//! Scenario tests for the round-based search.

use super::*;
use crate::domain::{
    Coordinates, Itinerary, Route, RouteId, Stop, StopId, StopTime, TimeOfDay, Transfer, Trip,
    TripId,
};
use crate::timetable::{TimetableIndex, TimetableRecords};
use chrono::NaiveDate;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

fn time(s: &str) -> TimeOfDay {
    TimeOfDay::parse(s).unwrap()
}

fn stop_id(s: &str) -> StopId {
    StopId::parse(s).unwrap()
}

/// Records builder for small hand-written networks.
#[derive(Default)]
struct Network {
    records: TimetableRecords,
}

impl Network {
    fn new() -> Self {
        Self::default()
    }

    /// Add a stop on the equator at the given longitude.
    fn stop(mut self, id: &str, lng: f64) -> Self {
        self.records.stops.push(Stop::new(
            stop_id(id),
            format!("Stop {id}"),
            Coordinates::new(0.0, lng).unwrap(),
        ));
        self
    }

    fn route(mut self, id: &str, short_name: &str) -> Self {
        self.records.routes.push(Route::new(RouteId::parse(id).unwrap(), short_name, ""));
        self
    }

    /// Add a trip calling at `(stop, time)` pairs in order.
    fn trip(mut self, id: &str, route: &str, calls: &[(&str, &str)]) -> Self {
        let trip_id = TripId::parse(id).unwrap();
        self.records
            .trips
            .push(Trip::new(trip_id.clone(), RouteId::parse(route).unwrap()));
        for (seq, (stop, at)) in calls.iter().enumerate() {
            self.records.stop_times.push(StopTime::new(
                trip_id.clone(),
                stop_id(stop),
                time(at),
                seq as u32 + 1,
            ));
        }
        self
    }

    fn transfer(mut self, from: &str, to: &str, secs: u32) -> Self {
        self.records
            .transfers
            .push(Transfer::new(stop_id(from), stop_id(to), secs, 150.0, true).unwrap());
        self
    }

    fn build(self) -> TimetableIndex {
        TimetableIndex::build(self.records)
    }
}

/// One route R1 running S1 -> S2 -> S3, plus a few extra stops.
fn line() -> Network {
    Network::new()
        .stop("S1", 0.0)
        .stop("S2", 0.01)
        .stop("S3", 0.02)
        .stop("S4", 0.021)
        .stop("S5", 0.05)
        .stop("S9", 1.0)
        .route("R1", "1")
        .trip(
            "T1",
            "R1",
            &[("S1", "08:00:00"), ("S2", "08:05:00"), ("S3", "08:15:00")],
        )
}

fn search_with(
    index: &TimetableIndex,
    config: &SearchConfig,
    from: &str,
    to: &str,
    at: &str,
) -> Result<Option<Itinerary>, SearchError> {
    let request = SearchRequest::parse(from, to, at, date())?;
    Planner::new(index, config).search(&request)
}

fn search(
    index: &TimetableIndex,
    from: &str,
    to: &str,
    at: &str,
) -> Result<Option<Itinerary>, SearchError> {
    search_with(index, &SearchConfig::default(), from, to, at)
}

#[test]
fn direct_ride() {
    let index = line().build();

    let itinerary = search(&index, "S1", "S3", "08:00:00").unwrap().unwrap();

    assert_eq!(itinerary.segments.len(), 1);
    assert_eq!(itinerary.total_duration_secs, 900);
    assert_eq!(itinerary.transfers, 0);

    let ride = itinerary.segments[0].as_ride().unwrap();
    assert_eq!(ride.from, stop_id("S1"));
    assert_eq!(ride.to, stop_id("S3"));
    assert_eq!(ride.trip_id.as_str(), "T1");
    assert_eq!(ride.route_id.as_str(), "R1");
    assert_eq!(itinerary.segments[0].duration_secs(), 900);
    assert_eq!(ride.instruction, "Take 1 from Stop S1 to Stop S3");
}

#[test]
fn ride_then_walk() {
    let index = line().transfer("S3", "S4", 120).build();

    let itinerary = search(&index, "S1", "S4", "08:00:00").unwrap().unwrap();

    assert_eq!(itinerary.segments.len(), 2);
    assert_eq!(itinerary.total_duration_secs, 1020);
    assert_eq!(itinerary.transfers, 0);

    let ride = itinerary.segments[0].as_ride().unwrap();
    assert_eq!((ride.from.as_str(), ride.to.as_str()), ("S1", "S3"));
    assert_eq!(itinerary.segments[0].duration_secs(), 900);

    let walk = itinerary.segments[1].as_walk().unwrap();
    assert_eq!((walk.from.as_str(), walk.to.as_str()), ("S3", "S4"));
    assert_eq!(itinerary.segments[1].duration_secs(), 120);
    assert_eq!(walk.end, time("08:17:00"));
    assert_eq!(walk.instruction, "Walk to Stop S4");
    // Distance comes from coordinates, not the transfer record
    assert!((walk.distance_m - 111.2).abs() < 1.0);
}

#[test]
fn unknown_origin_is_an_error() {
    let index = line().build();

    let err = search(&index, "unknown-stop", "S3", "08:00:00").unwrap_err();
    assert_eq!(err, SearchError::UnknownStop(stop_id("unknown-stop")));
}

#[test]
fn unknown_destination_is_an_error() {
    let index = line().build();

    let err = search(&index, "S1", "nowhere", "08:00:00").unwrap_err();
    assert_eq!(err.to_string(), "unknown stop: nowhere");
}

#[test]
fn malformed_time_is_an_error() {
    let index = line().build();

    let err = search(&index, "S1", "S3", "8:00").unwrap_err();
    assert!(matches!(err, SearchError::InvalidTime(_)));
}

#[test]
fn unreachable_destination_is_not_found() {
    let index = line().build();

    assert_eq!(search(&index, "S1", "S9", "08:00:00").unwrap(), None);
}

#[test]
fn origin_equals_destination() {
    let index = line().build();

    let itinerary = search(&index, "S2", "S2", "12:00:00").unwrap().unwrap();

    assert!(itinerary.segments.is_empty());
    assert_eq!(itinerary.total_duration_secs, 0);
    assert_eq!(itinerary.transfers, 0);
}

#[test]
fn missed_vehicle_is_not_found() {
    let index = line().build();

    assert_eq!(search(&index, "S1", "S3", "08:00:01").unwrap(), None);
}

#[test]
fn board_part_way_along_trip() {
    let index = line().build();

    let itinerary = search(&index, "S2", "S3", "08:05:00").unwrap().unwrap();

    let ride = itinerary.segments[0].as_ride().unwrap();
    assert_eq!(ride.from, stop_id("S2"));
    assert_eq!(itinerary.total_duration_secs, 600);
}

#[test]
fn waits_for_later_trip() {
    let index = line()
        .trip(
            "T2",
            "R1",
            &[("S1", "08:30:00"), ("S2", "08:35:00"), ("S3", "08:45:00")],
        )
        .build();

    let itinerary = search(&index, "S1", "S3", "08:10:00").unwrap().unwrap();

    let ride = itinerary.segments[0].as_ride().unwrap();
    assert_eq!(ride.trip_id.as_str(), "T2");
    // Ride time includes the wait at the boarding stop
    assert_eq!(ride.start, time("08:10:00"));
    assert_eq!(ride.end, time("08:45:00"));
    assert_eq!(itinerary.total_duration_secs, 2100);
}

#[test]
fn change_between_routes() {
    let index = line()
        .route("R2", "2")
        .trip("T5", "R2", &[("S3", "08:20:00"), ("S5", "08:40:00")])
        .build();

    let itinerary = search(&index, "S1", "S5", "08:00:00").unwrap().unwrap();

    assert_eq!(itinerary.ride_count(), 2);
    assert_eq!(itinerary.transfers, 1);
    assert_eq!(itinerary.total_duration_secs, 2400);

    let second = itinerary.segments[1].as_ride().unwrap();
    assert_eq!(second.from, stop_id("S3"));
    assert_eq!(second.start, time("08:15:00"));
    assert_eq!(second.route_id.as_str(), "R2");
}

#[test]
fn ride_walk_ride() {
    let index = line()
        .transfer("S3", "S4", 120)
        .route("R2", "2")
        .trip("T5", "R2", &[("S4", "08:20:00"), ("S5", "08:40:00")])
        .build();

    let itinerary = search(&index, "S1", "S5", "08:00:00").unwrap().unwrap();

    let kinds: Vec<bool> = itinerary.segments.iter().map(|s| s.is_ride()).collect();
    assert_eq!(kinds, vec![true, false, true]);
    assert_eq!(itinerary.transfers, 1);
    assert_eq!(
        itinerary.segment_duration_sum(),
        itinerary.total_duration_secs
    );
}

#[test]
fn walk_then_ride() {
    let index = line().stop("S0", -0.001).transfer("S0", "S1", 60).build();

    let itinerary = search(&index, "S0", "S3", "07:58:00").unwrap().unwrap();

    assert_eq!(itinerary.segments.len(), 2);
    let walk = itinerary.segments[0].as_walk().unwrap();
    assert_eq!(walk.start, time("07:58:00"));
    assert_eq!(walk.end, time("07:59:00"));
    let ride = itinerary.segments[1].as_ride().unwrap();
    assert_eq!(ride.from, stop_id("S1"));
    assert_eq!(itinerary.total_duration_secs, 1020);
}

#[test]
fn walk_only() {
    let index = line().transfer("S1", "S4", 300).build();

    let itinerary = search(&index, "S1", "S4", "06:00:00").unwrap().unwrap();

    assert_eq!(itinerary.segments.len(), 1);
    assert!(itinerary.segments[0].is_walk());
    assert_eq!(itinerary.total_duration_secs, 300);
    assert_eq!(itinerary.transfers, 0);
}

#[test]
fn walks_are_not_chained() {
    // S1 -> S4 -> S5 on foot only; the second walk is never followed
    let index = line()
        .transfer("S1", "S4", 60)
        .transfer("S4", "S5", 60)
        .build();

    assert_eq!(search(&index, "S1", "S5", "06:00:00").unwrap(), None);
}

#[test]
fn faster_route_wins() {
    let index = line()
        .route("R0", "X")
        .trip("TX", "R0", &[("S1", "08:00:00"), ("S3", "08:10:00")])
        .build();

    let itinerary = search(&index, "S1", "S3", "08:00:00").unwrap().unwrap();

    assert_eq!(itinerary.segments[0].as_ride().unwrap().route_id.as_str(), "R0");
    assert_eq!(itinerary.total_duration_secs, 600);
}

#[test]
fn walking_beats_slow_ride() {
    let index = line().transfer("S1", "S3", 300).build();

    let itinerary = search(&index, "S1", "S3", "08:00:00").unwrap().unwrap();

    assert!(itinerary.segments[0].is_walk());
    assert_eq!(itinerary.total_duration_secs, 300);
}

#[test]
fn round_bound_limits_boardings() {
    let index = line()
        .route("R2", "2")
        .trip("T5", "R2", &[("S3", "08:20:00"), ("S5", "08:40:00")])
        .build();

    let one = SearchConfig::new(1);
    assert_eq!(
        search_with(&index, &one, "S1", "S5", "08:00:00").unwrap(),
        None
    );

    let two = SearchConfig::new(2);
    assert!(
        search_with(&index, &two, "S1", "S5", "08:00:00")
            .unwrap()
            .is_some()
    );
}

#[test]
fn zero_rounds_reaches_only_walks() {
    let index = line().transfer("S1", "S4", 60).build();
    let config = SearchConfig::new(0);

    assert!(
        search_with(&index, &config, "S1", "S4", "08:00:00")
            .unwrap()
            .is_some()
    );
    assert_eq!(
        search_with(&index, &config, "S1", "S3", "08:00:00").unwrap(),
        None
    );
}

#[test]
fn unsorted_stop_times_are_ordered_by_sequence() {
    let mut network = Network::new()
        .stop("A", 0.0)
        .stop("B", 0.01)
        .stop("C", 0.02)
        .route("R", "R");
    let trip = TripId::parse("T").unwrap();
    network.records.trips.push(Trip::new(trip.clone(), RouteId::parse("R").unwrap()));
    for (stop, at, seq) in [("C", "09:20:00", 30), ("A", "09:00:00", 10), ("B", "09:10:00", 20)] {
        network
            .records
            .stop_times
            .push(StopTime::new(trip.clone(), stop_id(stop), time(at), seq));
    }
    let index = network.build();

    let itinerary = search(&index, "A", "C", "09:00:00").unwrap().unwrap();
    assert_eq!(itinerary.total_duration_secs, 1200);
}

#[test]
fn past_midnight_times_do_not_wrap() {
    let index = Network::new()
        .stop("A", 0.0)
        .stop("B", 0.01)
        .route("N", "N1")
        .trip("night", "N", &[("A", "23:50:00"), ("B", "25:00:00")])
        .build();

    let itinerary = search(&index, "A", "B", "23:45:00").unwrap().unwrap();

    assert_eq!(itinerary.arrival_time(), Some(TimeOfDay::from_seconds(90_000)));
    assert_eq!(itinerary.total_duration_secs, 4500);
}

#[test]
fn dangling_stop_times_are_ignored() {
    let mut network = line();
    network.records.stop_times.push(StopTime::new(
        TripId::parse("ghost").unwrap(),
        stop_id("S9"),
        time("08:20:00"),
        1,
    ));
    let index = network.build();

    assert_eq!(search(&index, "S1", "S9", "08:00:00").unwrap(), None);
    assert!(search(&index, "S1", "S3", "08:00:00").unwrap().is_some());
}

#[test]
fn backwards_times_do_not_loop() {
    // T2 claims to reach X before it leaves Y, and X has a walk back to Y
    let index = Network::new()
        .stop("O", 0.0)
        .stop("Y", 0.01)
        .stop("X", 0.011)
        .route("R1", "1")
        .route("R2", "2")
        .trip("T1", "R1", &[("O", "08:00:00"), ("Y", "08:10:00")])
        .trip("T2", "R2", &[("Y", "08:10:00"), ("X", "07:00:00")])
        .transfer("X", "Y", 60)
        .build();

    assert_eq!(search(&index, "O", "X", "08:00:00").unwrap(), None);

    let itinerary = search(&index, "O", "Y", "08:00:00").unwrap().unwrap();
    assert_eq!(itinerary.total_duration_secs, 600);
}

#[test]
fn trip_resumes_after_backwards_call() {
    let index = Network::new()
        .stop("O", 0.0)
        .stop("X", 0.01)
        .stop("Z", 0.02)
        .route("R1", "1")
        .trip(
            "T1",
            "R1",
            &[("O", "08:00:00"), ("X", "07:30:00"), ("Z", "08:20:00")],
        )
        .build();

    assert_eq!(search(&index, "O", "X", "08:00:00").unwrap(), None);

    let itinerary = search(&index, "O", "Z", "08:00:00").unwrap().unwrap();
    let ride = itinerary.segments[0].as_ride().unwrap();
    assert_eq!(ride.from, stop_id("O"));
    assert_eq!(itinerary.total_duration_secs, 1200);
}

#[test]
fn reference_date_does_not_filter_trips() {
    let index = line().build();
    let config = SearchConfig::default();
    let planner = Planner::new(&index, &config);

    let a = SearchRequest::parse("S1", "S3", "08:00:00", date()).unwrap();
    let mut b = a.clone();
    b.date = NaiveDate::from_ymd_opt(1999, 12, 25).unwrap();

    assert_eq!(planner.search(&a).unwrap(), planner.search(&b).unwrap());
}

#[test]
fn repeated_search_is_identical() {
    let index = line()
        .transfer("S3", "S4", 120)
        .route("R2", "2")
        .trip("T5", "R2", &[("S4", "08:20:00"), ("S5", "08:40:00")])
        .build();

    let first = search(&index, "S1", "S5", "08:00:00").unwrap();
    let second = search(&index, "S1", "S5", "08:00:00").unwrap();

    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn scan_records_round_of_each_arrival() {
    let index = line()
        .route("R2", "2")
        .trip("T5", "R2", &[("S3", "08:20:00"), ("S5", "08:40:00")])
        .build();
    let config = SearchConfig::default();
    let planner = Planner::new(&index, &config);

    let origin = index.stop_index(&stop_id("S1")).unwrap();
    let state = planner.scan(origin, time("08:00:00"));

    let round_at = |id: &str| {
        let idx = index.stop_index(&stop_id(id)).unwrap();
        state.parent(idx).map(|link| link.round)
    };
    assert_eq!(round_at("S1"), Some(0));
    assert_eq!(round_at("S3"), Some(1));
    assert_eq!(round_at("S5"), Some(2));
    assert_eq!(round_at("S9"), None);
}

#[test]
fn concurrent_searches_share_one_index() {
    let index = line().transfer("S3", "S4", 120).build();
    let config = SearchConfig::default();

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let request = SearchRequest::parse("S1", "S4", "08:00:00", date()).unwrap();
                    Planner::new(&index, &config).search(&request).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(results.iter().all(|r| r == &results[0]));
    assert_eq!(results[0].as_ref().unwrap().total_duration_secs, 1020);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    const STOPS: usize = 8;

    /// A trip as (route, first stop, stop step, start minute, minutes per hop, hops).
    type TripSpec = (usize, usize, usize, u32, u32, usize);

    fn network_strategy() -> impl Strategy<Value = TimetableIndex> {
        let trips = prop::collection::vec(
            (0..3usize, 0..STOPS, 1..3usize, 0..120u32, 1..15u32, 1..5usize),
            1..10,
        );
        let transfers = prop::collection::vec((0..STOPS, 0..STOPS, 0..600u32), 0..6);
        (trips, transfers).prop_map(|(trips, transfers)| build_network(&trips, &transfers))
    }

    fn build_network(trips: &[TripSpec], transfers: &[(usize, usize, u32)]) -> TimetableIndex {
        let mut network = Network::new();
        for i in 0..STOPS {
            network = network.stop(&format!("S{i}"), i as f64 * 0.01);
        }
        for r in 0..3 {
            network = network.route(&format!("R{r}"), &format!("{r}"));
        }
        for (n, &(route, first, step, start, per_hop, hops)) in trips.iter().enumerate() {
            let calls: Vec<(String, String)> = (0..=hops)
                .map(|h| {
                    let stop = format!("S{}", (first + h * step) % STOPS);
                    let secs = 8 * 3600 + (start + h as u32 * per_hop) * 60;
                    (stop, TimeOfDay::from_seconds(secs).to_string())
                })
                .collect();
            let calls: Vec<(&str, &str)> =
                calls.iter().map(|(s, t)| (s.as_str(), t.as_str())).collect();
            network = network.trip(&format!("T{n}"), &format!("R{route}"), &calls);
        }
        for &(from, to, secs) in transfers {
            if from != to {
                network = network.transfer(&format!("S{from}"), &format!("S{to}"), secs);
            }
        }
        network.build()
    }

    /// Trips whose call times are unordered, plus random walks.
    fn unordered_network_strategy() -> impl Strategy<Value = TimetableIndex> {
        let trips = prop::collection::vec(
            (0..3usize, prop::collection::vec((0..STOPS, 0..120u32), 2..6)),
            1..8,
        );
        let transfers = prop::collection::vec((0..STOPS, 0..STOPS, 0..600u32), 0..8);
        (trips, transfers).prop_map(|(trips, transfers)| {
            let mut network = Network::new();
            for i in 0..STOPS {
                network = network.stop(&format!("S{i}"), i as f64 * 0.01);
            }
            for r in 0..3 {
                network = network.route(&format!("R{r}"), &format!("{r}"));
            }
            for (n, (route, visits)) in trips.iter().enumerate() {
                let calls: Vec<(String, String)> = visits
                    .iter()
                    .map(|&(stop, minute)| {
                        let at = TimeOfDay::from_seconds(7 * 3600 + minute * 60);
                        (format!("S{stop}"), at.to_string())
                    })
                    .collect();
                let calls: Vec<(&str, &str)> =
                    calls.iter().map(|(s, t)| (s.as_str(), t.as_str())).collect();
                network = network.trip(&format!("T{n}"), &format!("R{route}"), &calls);
            }
            for &(from, to, secs) in &transfers {
                if from != to {
                    network = network.transfer(&format!("S{from}"), &format!("S{to}"), secs);
                }
            }
            network.build()
        })
    }

    fn arrival(index: &TimetableIndex, rounds: usize, to: usize) -> Option<u32> {
        let config = SearchConfig::new(rounds);
        search_with(index, &config, "S0", &format!("S{to}"), "08:00:00")
            .unwrap()
            .map(|it| it.total_duration_secs)
    }

    proptest! {
        #[test]
        fn total_duration_equals_segment_sum(index in network_strategy(), to in 0..STOPS) {
            if let Some(itinerary) = search(&index, "S0", &format!("S{to}"), "08:00:00").unwrap() {
                prop_assert_eq!(itinerary.total_duration_secs, itinerary.segment_duration_sum());
            }
        }

        #[test]
        fn segments_connect(index in network_strategy(), to in 0..STOPS) {
            if let Some(itinerary) = search(&index, "S0", &format!("S{to}"), "08:00:00").unwrap() {
                let mut at = itinerary.origin.clone();
                for segment in &itinerary.segments {
                    prop_assert_eq!(segment.origin(), &at);
                    prop_assert!(segment.start() <= segment.end());
                    at = segment.destination().clone();
                }
                prop_assert_eq!(at, itinerary.destination.clone());
                prop_assert_eq!(
                    itinerary.transfers,
                    itinerary.ride_count().saturating_sub(1)
                );
            }
        }

        #[test]
        fn more_rounds_never_arrive_later(index in network_strategy(), to in 0..STOPS, rounds in 0..5usize) {
            if let Some(fewer) = arrival(&index, rounds, to) {
                let more = arrival(&index, rounds + 1, to);
                prop_assert!(more.is_some());
                prop_assert!(more.unwrap() <= fewer);
            }
        }

        #[test]
        fn unordered_times_still_reconstruct(index in unordered_network_strategy(), to in 0..STOPS) {
            let result = search(&index, "S0", &format!("S{to}"), "07:30:00");
            prop_assert!(result.is_ok(), "search failed: {:?}", result);
            if let Some(itinerary) = result.unwrap() {
                prop_assert_eq!(itinerary.total_duration_secs, itinerary.segment_duration_sum());
                for segment in &itinerary.segments {
                    prop_assert!(segment.start() <= segment.end());
                }
            }
        }

        #[test]
        fn search_is_repeatable(index in network_strategy(), to in 0..STOPS) {
            let to = format!("S{to}");
            let first = search(&index, "S0", &to, "08:00:00").unwrap();
            let second = search(&index, "S0", &to, "08:00:00").unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
