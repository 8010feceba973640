//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::domain::DomainError;
use crate::planner::{Planner, SearchError, SearchRequest};
use crate::transfers::TransferGenerator;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stops", get(list_stops))
        .route("/journey/plan", post(plan_journey))
        .route("/transfers/generate", post(generate_transfers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List every stop in the timetable.
async fn list_stops(State(state): State<AppState>) -> Json<StopListResponse> {
    let index = &state.index;
    let stops = index
        .stops()
        .iter()
        .map(|stop| StopResult::from_stop(stop, index.routes_serving(&stop.id)))
        .collect();

    Json(StopListResponse { stops })
}

/// Parse a JSON body, logging it on failure.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "Rejected JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Plan the earliest-arrival journey between two stops.
async fn plan_journey(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PlanJourneyResponse>, AppError> {
    let req: PlanJourneyRequest = parse_body(&body)?;

    let date = match req.date.as_deref() {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|_| AppError::BadRequest {
            message: format!("Invalid date: {d}"),
        })?,
        None => Local::now().date_naive(),
    };

    let request = SearchRequest::parse(&req.origin, &req.destination, &req.departure_time, date)?;

    // The search is CPU-bound, so it runs on the blocking pool. On timeout
    // the task is left to finish and its result is dropped.
    let index = Arc::clone(&state.index);
    let config = Arc::clone(&state.config);
    let task = tokio::task::spawn_blocking(move || {
        Planner::new(&index, &config)
            .search(&request)
            .map(|found| found.map(|it| ItineraryResult::from_itinerary(&it, &index)))
    });

    let joined = tokio::time::timeout(state.search_timeout, task)
        .await
        .map_err(|_| AppError::from(SearchError::Timeout))?;
    let itinerary = joined.map_err(|e| AppError::Internal {
        message: format!("Search task failed: {e}"),
    })??;

    Ok(Json(PlanJourneyResponse {
        found: itinerary.is_some(),
        itinerary,
    }))
}

/// Propose walking transfers between nearby stops.
async fn generate_transfers(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateTransfersResponse>, AppError> {
    let req: GenerateTransfersRequest = parse_body(&body)?;

    let generator = match req.walking_speed_mps {
        Some(speed) => TransferGenerator::new(speed)?,
        None => TransferGenerator::default(),
    };

    let index = Arc::clone(&state.index);
    let generated = tokio::task::spawn_blocking(move || {
        generator.generate(index.stops(), req.radius_m)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("Transfer generation failed: {e}"),
    })??;

    let transfers: Vec<TransferResult> =
        generated.iter().map(TransferResult::from_transfer).collect();

    debug!(count = transfers.len(), "Generated transfers on request");

    Ok(Json(GenerateTransfersResponse { transfers }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Timeout { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::UnknownStop(_)
            | SearchError::InvalidTime(_)
            | SearchError::InvalidRequest(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            SearchError::Timeout => AppError::Timeout {
                message: e.to_string(),
            },
            SearchError::InconsistentState(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Timeout { message } => (StatusCode::GATEWAY_TIMEOUT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            debug!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
