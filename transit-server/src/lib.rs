//! Transit journey planner server.
//!
//! Answers "what is the earliest I can reach stop B if I leave stop A at
//! this time?" over a static timetable, using a round-based scan where
//! each round allows one more vehicle boarding.

pub mod domain;
pub mod planner;
pub mod timetable;
pub mod transfers;
pub mod web;
