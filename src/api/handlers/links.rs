//! Handlers for the authenticated link endpoints.

use axum::{
    Extension, Json,
    extract::{Query, State, rejection::JsonRejection, rejection::QueryRejection},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkListResponse, LinkResponse};
use crate::api::dto::pagination::ListLinksQuery;
use crate::application::services::{AuthUser, CreateLink};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::expires_at::parse_expires_at;

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "originalUrl": "https://example.com/some/long/path",
///   "customAlias": "my-link",
///   "expiresAt": "2030-01-01T00:00:00Z"
/// }
/// ```
///
/// `customAlias` and `expiresAt` are optional. Without an alias a random
/// 6-character code is generated.
///
/// # Errors
///
/// Returns 400 for an invalid URL, alias or expiry, and for a taken alias.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<Json<LinkResponse>, AppError> {
    let Json(payload) = payload?;

    let expires_at = match payload.expires_at.as_deref() {
        Some(raw) => Some(parse_expires_at(raw).ok_or_else(|| {
            AppError::bad_request(
                "Invalid expiration date format",
                json!({ "expires_at": raw }),
            )
        })?),
        None => None,
    };

    let link = state
        .link_service
        .create_link(
            user.id,
            CreateLink {
                original_url: payload.original_url.unwrap_or_default(),
                custom_alias: payload.custom_alias,
                expires_at,
            },
        )
        .await?;

    Ok(Json(link.into()))
}

/// Lists the caller's links with click counts, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&limit=10&search=`
///
/// `search` matches as a case-sensitive substring of the original URL or the
/// short code.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ListLinksQuery>, QueryRejection>,
) -> Result<Json<LinkListResponse>, AppError> {
    let Query(query) = query?;
    query.validate()?;

    let page = state
        .link_service
        .list_links(user.id, query.page(), query.limit(), query.search())
        .await?;

    Ok(Json(LinkListResponse {
        links: page.links.into_iter().map(Into::into).collect(),
        total: page.total,
        pages: page.pages,
    }))
}
