//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse, ServiceStatus};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components failing
///
/// A disabled cache is not a failure.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let checks = HealthChecks {
        database: check_database(&state).await,
        click_queue: check_click_queue(&state),
        cache: check_cache(&state).await,
    };

    let degraded = checks.database.is_failing()
        || checks.click_queue.is_failing()
        || checks.cache.is_failing();

    let response = HealthResponse {
        status: if degraded {
            ServiceStatus::Degraded
        } else {
            ServiceStatus::Healthy
        },
        version: env!("CARGO_PKG_VERSION"),
        checks,
    };

    if degraded {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    } else {
        Ok(Json(response))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.link_service.check_storage().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

fn check_click_queue(state: &AppState) -> CheckStatus {
    if state.click_recorder.is_closed() {
        CheckStatus::error("Click queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.click_recorder.capacity()))
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    if !state.cache.is_enabled() {
        return CheckStatus::disabled();
    }

    if state.cache.health_check().await {
        CheckStatus::ok("Redis connected")
    } else {
        CheckStatus::error("Redis connection failed")
    }
}
