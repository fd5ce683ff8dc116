//! Handler for per-link analytics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::api::dto::analytics::AnalyticsResponse;
use crate::application::services::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Click analytics for one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/analytics/{link_id}`
///
/// # Errors
///
/// Returns 404 if the id is not numeric, does not exist, or belongs to
/// another user.
pub async fn analytics_handler(
    Path(link_id): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let link_id: i64 = link_id
        .parse()
        .map_err(|_| AppError::not_found("Link not found", json!({ "link_id": link_id })))?;

    let report = state
        .analytics_service
        .link_analytics(user.id, link_id)
        .await?;

    Ok(Json(report.into()))
}
