//! Search configuration for the journey planner.

/// Default number of rounds, i.e. at most this many boardings.
pub const DEFAULT_MAX_ROUNDS: usize = 10;

/// Configuration parameters for journey search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum number of scan rounds. Each round allows one more boarding,
    /// so this bounds the number of vehicles in an itinerary.
    pub max_rounds: usize,
}

impl SearchConfig {
    /// Create a new configuration with the given round bound.
    pub fn new(max_rounds: usize) -> Self {
        Self { max_rounds }
    }

    /// Returns a copy with a different round bound.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}
