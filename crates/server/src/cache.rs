//! # Read-Through Cache
//!
//! Thin helper over Redis. On a miss the caller's compute closure runs and
//! the JSON-serialized result is stored with a TTL. Redis failures fail
//! open: the value is computed and returned without caching.

use std::future::Future;

use logging::log_cache_operation;
use redis::aio::MultiplexedConnection;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

/// Cache handle over a shared Redis client.
#[derive(Clone)]
pub struct Cache {
    client: redis::Client,
}

impl Cache {
    #[must_use]
    pub fn new(client: redis::Client) -> Self { Self { client } }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                warn!(error = %e, "redis unavailable, cache bypassed");
                None
            },
        }
    }

    /// Returns the cached value under `key`, or runs `compute`, caches its
    /// result for `ttl_secs`, and returns it.
    ///
    /// # Errors
    ///
    /// Only `compute` errors propagate. Redis and serialization failures
    /// degrade to an uncached compute.
    pub async fn get_or_compute<T, F, Fut>(&self, key: &str, ttl_secs: u64, compute: F) -> error::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = error::Result<T>>,
    {
        let mut conn = match self.connection().await {
            Some(conn) => conn,
            None => return compute().await,
        };

        let cached: Option<String> = match redis::cmd("GET").arg(key).query_async(&mut conn).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, key, "cache read failed");
                None
            },
        };

        if let Some(raw) = cached {
            if let Ok(value) = serde_json::from_str(&raw) {
                log_cache_operation!("get", key, true);
                return Ok(value);
            }
            // Stale shape from an older deploy; recompute and overwrite.
        }
        log_cache_operation!("get", key, false);

        let value = compute().await?;

        match serde_json::to_string(&value) {
            Ok(serialized) => {
                let stored: Result<(), _> = redis::cmd("SET")
                    .arg(key)
                    .arg(serialized)
                    .arg("EX")
                    .arg(ttl_secs)
                    .query_async(&mut conn)
                    .await;
                if let Err(e) = stored {
                    warn!(error = %e, key, "cache write failed");
                }
            },
            Err(e) => {
                warn!(error = %e, key, "cache serialization failed");
            },
        }

        Ok(value)
    }

    /// Claims `key` for `ttl_secs` if nobody holds it. Returns `true` only
    /// for the first caller inside the window. Used to deduplicate recipe
    /// view counting per client IP.
    pub async fn claim_window(&self, key: &str, ttl_secs: u64) -> bool {
        let mut conn = match self.connection().await {
            Some(conn) => conn,
            None => return false,
        };

        let result: Result<Option<String>, _> = redis::cmd("SET")
            .arg(key)
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await;

        match result {
            Ok(reply) => reply.is_some(),
            Err(e) => {
                warn!(error = %e, key, "window claim failed");
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A client pointed at a closed port exercises the fail-open paths
    // without a running Redis.
    fn dead_client() -> redis::Client { redis::Client::open("redis://127.0.0.1:1/").unwrap() }

    #[tokio::test]
    async fn test_get_or_compute_fails_open() {
        let cache = Cache::new(dead_client());
        let value: i32 = cache.get_or_compute("k", 60, || async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_compute_errors_propagate() {
        let cache = Cache::new(dead_client());
        let result: error::Result<i32> = cache
            .get_or_compute("k", 60, || async { Err(error::AppError::internal("boom")) })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_claim_window_fails_closed_without_redis() {
        let cache = Cache::new(dead_client());
        assert!(!cache.claim_window("views:1:127.0.0.1", 60).await);
    }
}
