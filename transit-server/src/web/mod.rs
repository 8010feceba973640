//! Web layer for the transit planner.
//!
//! Exposes the timetable and journey search as JSON over HTTP.

mod config;
mod dto;
mod routes;
mod state;

pub use config::{ConfigError, DEFAULT_BIND_ADDR, DEFAULT_SEARCH_TIMEOUT, ServerConfig};
pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
