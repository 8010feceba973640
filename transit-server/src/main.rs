use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use transit_server::domain::DomainError;
use transit_server::timetable::{SnapshotError, TimetableIndex, TimetableSnapshot};
use transit_server::transfers::{TransferGenerator, merge_transfers};
use transit_server::web::{AppState, ServerConfig, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Load the timetable (fail fast if unreadable)
    let index = match load_index(&config) {
        Ok(index) => index,
        Err(e) => {
            error!(path = %config.timetable_path.display(), "Failed to load timetable: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stats = index.stats();
    info!(
        stops = stats.stops,
        routes = stats.routes,
        trips = stats.trips,
        stop_times = stats.stop_times,
        transfers = stats.transfers,
        "Timetable ready"
    );

    let state =
        AppState::new(index, config.search.clone()).with_search_timeout(config.search_timeout);
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, "Failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(addr = %config.bind_addr, "Transit planner listening");
    info!("  GET  /health              - Health check");
    info!("  GET  /stops               - List stops");
    info!("  POST /journey/plan        - Plan a journey");
    info!("  POST /transfers/generate  - Propose walking transfers");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Error preparing the timetable at start-up.
#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("transfer generation failed: {0}")]
    Transfers(#[from] DomainError),
}

/// Read the snapshot and build the index, adding generated walks if asked.
fn load_index(config: &ServerConfig) -> Result<TimetableIndex, LoadError> {
    let mut records = TimetableSnapshot::from_path(&config.timetable_path)?.into_records()?;

    if let Some(radius_m) = config.transfer_radius_m {
        let generated = TransferGenerator::default().generate(&records.stops, radius_m)?;
        let added = merge_transfers(&mut records.transfers, generated);
        info!(radius_m, added, "Merged generated walking transfers");
    }

    Ok(TimetableIndex::build(records))
}
