//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Seconds to replenish one request.
const REPLENISH_SECONDS: u64 = 9;
const BURST_SIZE: u32 = 100;

/// Creates the per-IP rate limiter keyed on the socket peer address.
///
/// # Limits
///
/// - **Burst**: 100 requests
/// - **Refill**: one request every 9 seconds (100 per 15 minutes)
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Requires
/// the server to be started with connect info.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/{short_code}", get(redirect_handler))
///     .layer(rate_limit::layer());
/// ```
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    GovernorLayer::new(config(PeerIpKeyExtractor))
}

/// Same limits as [`layer`], keyed on `X-Forwarded-For`, `X-Real-IP` or
/// `Forwarded` headers, falling back to the peer address.
///
/// Only use behind a trusted reverse proxy; clients can forge these headers.
pub fn proxied_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    GovernorLayer::new(config(SmartIpKeyExtractor))
}

fn config<K: KeyExtractor>(extractor: K) -> Arc<GovernorConfig<K, NoOpMiddleware<QuantaInstant>>> {
    Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(extractor)
            .per_second(REPLENISH_SECONDS)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("rate limit quota is non-zero"),
    )
}
