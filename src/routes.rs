//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short_code}`           - Short link redirect (public)
//! - `GET  /health`                 - Health check: DB, cache, click queue (public)
//! - `POST /api/auth/login`         - Token issuance (public)
//! - `GET  /api/links/{short_code}` - JSON lookup (public)
//! - `/api/links`, `/api/analytics` - Bearer token required
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Configured origin or mirrored request origin
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer JWT on protected routes
//! - **Path normalization** - Trailing slash handling

use crate::api::middleware::{cors, rate_limit, tracing};
use crate::api::routes::{protected_routes, public_routes};
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Outer middleware settings.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    /// Key rate limiting on `X-Forwarded-For` / `X-Real-IP` instead of the
    /// peer socket address. Enable only behind a trusted reverse proxy.
    pub behind_proxy: bool,
    pub rate_limit: bool,
    /// Allowed CORS origin; `None` mirrors the request origin.
    pub cors_origin: Option<String>,
}

/// All routes with their state, without outer middleware.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .with_state(state)
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState, options: &RouterOptions) -> NormalizePath<Router> {
    let mut router = api_router(state);

    if options.rate_limit {
        router = if options.behind_proxy {
            router.layer(rate_limit::proxied_layer())
        } else {
            router.layer(rate_limit::layer())
        };
    }

    let router = router
        .layer(cors::layer(options.cors_origin.as_deref()))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
