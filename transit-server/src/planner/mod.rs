//! Journey planner using round-based search.
//!
//! This module implements the core journey planning algorithm that answers:
//! "Leaving this stop at this time, what is the earliest I can reach that
//! stop, and how?"
//!
//! The search proceeds in rounds, each allowing one more boarding, with
//! walking transfers relaxed as stops improve. Parent links recorded along
//! the way are then followed back from the destination to build the
//! itinerary.

mod config;
mod reconstruct;
mod search;
mod state;

#[cfg(test)]
mod search_tests;

pub use config::{DEFAULT_MAX_ROUNDS, SearchConfig};
pub use reconstruct::reconstruct;
pub use search::{Planner, SearchError, SearchRequest};
pub use state::{ParentLink, SearchState, Via};
