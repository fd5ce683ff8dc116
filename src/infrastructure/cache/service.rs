//! Cache service trait and error types.

use crate::domain::entities::ResolvedLink;
use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache in front of short code resolution.
///
/// Entries carry the link's expiry, and callers check it after every lookup,
/// so a cached entry is never served past its expiration. Failures must
/// degrade to store lookups rather than fail the request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Looks up a resolved link by short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(link))` on cache hit
    /// - `Ok(None)` on cache miss or backend error (fail-open behavior)
    async fn get_link(&self, short_code: &str) -> CacheResult<Option<ResolvedLink>>;

    /// Stores a resolved link.
    ///
    /// `ttl_seconds` caps the entry lifetime; implementations never keep an
    /// entry longer than their configured default.
    async fn set_link(
        &self,
        short_code: &str,
        link: &ResolvedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Whether this is a real cache backend.
    fn is_enabled(&self) -> bool {
        true
    }
}
