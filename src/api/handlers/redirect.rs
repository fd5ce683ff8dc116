//! Handlers for public short code resolution.

use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};
use tracing::debug;

use crate::api::dto::redirect::OriginalUrlResponse;
use crate::api::extractors::ClientMeta;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL and records a click.
///
/// # Endpoint
///
/// `GET /{short_code}`
///
/// # Response Codes
///
/// - **307 Temporary Redirect**: `Location` is the original URL
/// - **404 Not Found**: unknown code
/// - **410 Gone**: link has expired
///
/// The click is queued for the background worker; a full queue drops it
/// without affecting the redirect.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    ClientMeta(client): ClientMeta,
) -> Result<Redirect, AppError> {
    let link = state
        .link_service
        .resolve_and_record(&short_code, client)
        .await?;

    debug!(short_code = %short_code, link_id = link.link_id, "Redirecting");

    Ok(Redirect::temporary(&link.original_url))
}

/// Resolves a short code to its original URL as JSON and records a click.
///
/// # Endpoint
///
/// `GET /api/links/{short_code}`
///
/// # Response
///
/// ```json
/// { "originalUrl": "https://example.com" }
/// ```
pub async fn lookup_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    ClientMeta(client): ClientMeta,
) -> Result<Json<OriginalUrlResponse>, AppError> {
    let link = state
        .link_service
        .resolve_and_record(&short_code, client)
        .await?;

    Ok(Json(OriginalUrlResponse {
        original_url: link.original_url,
    }))
}
