//! API route configuration.
//!
//! Public routes resolve short codes and issue tokens; protected routes
//! require a bearer token via [`crate::api::middleware::auth`].

use crate::api::handlers::{
    analytics_handler, create_link_handler, health_handler, list_links_handler, login_handler,
    lookup_handler, redirect_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Routes reachable without a token.
///
/// # Endpoints
///
/// - `GET  /health`                 - Health check: DB, cache, click queue
/// - `GET  /{short_code}`           - Redirect to the original URL
/// - `POST /api/auth/login`         - Exchange credentials for a token
/// - `GET  /api/links/{short_code}` - Original URL as JSON
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{short_code}", get(redirect_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/links/{short_code}", get(lookup_handler))
}

/// Routes that require `Authorization: Bearer <token>`.
///
/// # Endpoints
///
/// - `POST /api/links`                - Create a link
/// - `GET  /api/links`                - List own links (paginated, searchable)
/// - `GET  /api/analytics/{link_id}`  - Click analytics for an own link
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/links",
            get(list_links_handler).post(create_link_handler),
        )
        .route("/api/analytics/{link_id}", get(analytics_handler))
        .route_layer(middleware::from_fn_with_state(state, auth::layer))
}
