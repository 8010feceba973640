//! Server configuration read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::planner::SearchConfig;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default budget for a single journey search.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_millis(5000);

/// Error reading server configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Process-level configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Path to the JSON timetable snapshot.
    pub timetable_path: PathBuf,
    pub search_timeout: Duration,
    /// When set, walking transfers are generated between stops this close
    /// (metres) and merged into the timetable at start-up.
    pub transfer_radius_m: Option<f64>,
    pub search: SearchConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_var(&lookup, "TRANSIT_BIND_ADDR")?
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

        let timetable_path = lookup("TRANSIT_TIMETABLE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("TRANSIT_TIMETABLE"))?;

        let search_timeout = parse_var::<u64, _>(&lookup, "TRANSIT_SEARCH_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SEARCH_TIMEOUT);

        let transfer_radius_m = parse_var::<f64, _>(&lookup, "TRANSIT_TRANSFER_RADIUS_M")?;
        if let Some(radius) = transfer_radius_m.filter(|r| !r.is_finite() || *r < 0.0) {
            return Err(ConfigError::Invalid {
                name: "TRANSIT_TRANSFER_RADIUS_M",
                value: radius.to_string(),
                reason: "must be a non-negative number of metres".to_string(),
            });
        }

        let search = match parse_var(&lookup, "TRANSIT_MAX_ROUNDS")? {
            Some(rounds) => SearchConfig::default().with_max_rounds(rounds),
            None => SearchConfig::default(),
        };

        Ok(Self {
            bind_addr,
            timetable_path,
            search_timeout,
            transfer_radius_m,
            search,
        })
    }
}

/// Parse an optional variable. Unset and blank are both `None`.
fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value,
            reason: e.to_string(),
        })
}
