//! Redis-based cache client.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Config, Connection, Pool, Runtime};
use tracing::{debug, info, warn};

use super::CacheClient;
use crate::config::RedisConfig;
use crate::error::{CacheError, CacheResult};

/// Cache client backed by a pooled Redis connection.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    /// Builds the connection pool and checks that Redis answers.
    ///
    /// An unreachable server is only logged: cache reads fall through to the
    /// store until it comes back.
    pub async fn connect(config: &RedisConfig) -> CacheResult<Self> {
        info!(host = %config.host, port = config.port, "Creating Redis connection pool...");

        let cache = Self {
            pool: build_pool(config)?,
        };
        match cache.ping().await {
            Ok(()) => info!("Redis connection pool created successfully"),
            Err(e) => warn!(error = %e, "Redis not reachable, continuing without cache hits"),
        }
        Ok(cache)
    }

    async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.get_conn().await?;
        deadpool_redis::redis::cmd("PING")
            .query_async::<String>(&mut *conn)
            .await
            .map_err(|e| CacheError::Unavailable(format!("PING failed: {}", e)))?;
        Ok(())
    }

    async fn get_conn(&self) -> CacheResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Unavailable(format!("Failed to get Redis connection: {}", e)))
    }
}

/// Builds the pool without opening a connection.
fn build_pool(config: &RedisConfig) -> CacheResult<Pool> {
    Config::from_connection_info(config.connection_info())
        .builder()
        .map_err(|e| CacheError::Unavailable(format!("Invalid Redis config: {}", e)))?
        .max_size(config.pool_size)
        .runtime(Runtime::Tokio1)
        .build()
        .map_err(|e| CacheError::Unavailable(format!("Failed to create pool: {}", e)))
}

#[async_trait]
impl CacheClient for RedisCache {
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::Unavailable(format!("Failed to get key '{}': {}", key, e)))?;
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut conn = self.get_conn().await?;
        // SETEX rejects a zero expiry
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| CacheError::Unavailable(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn close(&self) {
        info!("Closing Redis connection pool");
        self.pool.close();
    }
}
