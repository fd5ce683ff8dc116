//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::ResolvedLink;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "link:";

/// Redis cache of resolved links, stored as JSON strings.
///
/// Uses `ConnectionManager` for connection reuse and reconnects. Read and
/// write errors are logged and swallowed.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// `default_ttl_seconds` is both the TTL used when none is given and the
    /// upper bound for any requested TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
        })
    }

    fn build_key(short_code: &str) -> String {
        format!("{KEY_PREFIX}{short_code}")
    }

    fn effective_ttl(&self, requested: Option<u64>) -> u64 {
        requested
            .map(|ttl| ttl.min(self.default_ttl))
            .unwrap_or(self.default_ttl)
            .max(1)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_link(&self, short_code: &str) -> CacheResult<Option<ResolvedLink>> {
        let key = Self::build_key(short_code);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<ResolvedLink>(&raw) {
                Ok(link) => {
                    debug!(short_code, "Cache HIT");
                    Ok(Some(link))
                }
                Err(e) => {
                    warn!(short_code, error = %e, "Discarding undecodable cache entry");
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!(short_code, "Cache MISS");
                Ok(None)
            }
            Err(e) => {
                warn!(short_code, error = %e, "Redis GET failed");
                Ok(None)
            }
        }
    }

    async fn set_link(
        &self,
        short_code: &str,
        link: &ResolvedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = Self::build_key(short_code);
        let ttl = self.effective_ttl(ttl_seconds);
        let payload = serde_json::to_string(link)
            .map_err(|e| CacheError::OperationError(e.to_string()))?;

        let mut conn = self.client.clone();
        if let Err(e) = conn.set_ex::<_, _, ()>(&key, payload, ttl).await {
            warn!(short_code, error = %e, "Redis SET failed");
        } else {
            debug!(short_code, ttl, "Cache SET");
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
