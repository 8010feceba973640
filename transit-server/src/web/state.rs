//! Application state for the web layer.

use std::sync::Arc;
use std::time::Duration;

use crate::planner::SearchConfig;
use crate::timetable::TimetableIndex;

use super::config::DEFAULT_SEARCH_TIMEOUT;

/// Shared application state.
///
/// Everything here is immutable after start-up, so handlers share it
/// without locking.
#[derive(Clone)]
pub struct AppState {
    /// Timetable built at start-up
    pub index: Arc<TimetableIndex>,

    /// Journey planner configuration
    pub config: Arc<SearchConfig>,

    /// Budget for a single journey search
    pub search_timeout: Duration,
}

impl AppState {
    /// Create a new app state.
    pub fn new(index: TimetableIndex, config: SearchConfig) -> Self {
        Self {
            index: Arc::new(index),
            config: Arc::new(config),
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }

    /// Returns a copy with a different search budget.
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }
}
