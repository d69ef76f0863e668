//! Cache-Aside Layer
//!
//! Get-or-populate over a [`CacheClient`]:
//! 1. look the key up; a hit is returned without calling the loader
//! 2. on a miss, run the loader against the source of truth
//! 3. write the fresh value back with a TTL, best-effort
//! 4. return the fresh value
//!
//! Cache failures never reach the caller. A failed or undecodable read is a
//! miss, and a failed write is logged and counted. Writes to the source of
//! truth never touch the cache, so a cached value may be stale for up to one
//! TTL.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{CacheClient, CacheCounters, CacheKey, CacheStats};
use crate::error::CacheResult;

/// Cache-aside wrapper around a shared cache client.
#[derive(Clone)]
pub struct CacheAside {
    client: Arc<dyn CacheClient>,
    ttl: Duration,
    counters: Arc<CacheCounters>,
}

impl CacheAside {
    /// Wraps `client`, populating entries with `ttl` by default.
    pub fn new(client: Arc<dyn CacheClient>, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            counters: Arc::new(CacheCounters::new()),
        }
    }

    /// Snapshot of hit/miss/error counters.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    /// Returns the cached value for `key`, or loads, caches and returns it.
    pub async fn get_or_populate<T, E, F, Fut>(&self, key: &CacheKey, loader: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.get_or_populate_with_ttl(key, self.ttl, loader).await
    }

    /// Same as [`get_or_populate`](Self::get_or_populate) with an explicit TTL.
    ///
    /// Loader errors are returned unchanged and nothing is cached for them.
    pub async fn get_or_populate_with_ttl<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        loader: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = key.to_string();

        if let Some(cached) = self.lookup::<T>(&key).await {
            return Ok(cached);
        }

        let value = loader().await?;
        self.populate(&key, &value, ttl).await;
        Ok(value)
    }

    /// Step 1. Any failure is downgraded to a miss.
    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.read(key).await {
            Ok(Some(value)) => {
                debug!(key, "cache hit");
                self.counters.record_hit();
                Some(value)
            }
            Ok(None) => {
                debug!(key, "cache miss");
                self.counters.record_miss();
                None
            }
            Err(e) => {
                warn!(key, error = %e, "cache read failed, falling back to store");
                self.counters.record_read_error();
                self.counters.record_miss();
                None
            }
        }
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        match self.client.get_raw(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Step 3. Failures are logged and counted, never returned.
    async fn populate<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let result = match serde_json::to_string(value) {
            Ok(raw) => self.client.set_raw(key, &raw, ttl).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => debug!(key, ttl_secs = ttl.as_secs(), "cache populated"),
            Err(e) => {
                warn!(key, error = %e, "cache write failed, serving uncached value");
                self.counters.record_write_error();
            }
        }
    }

    /// Closes the underlying client.
    pub async fn close(&self) {
        self.client.close().await;
    }
}
