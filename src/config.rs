//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use deadpool_redis::redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

use crate::cache::DEFAULT_TTL;
use crate::error::ConfigError;

/// Which relationship store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Postgres via sqlx, requires `DATABASE_URL`
    Postgres,
    /// In-process edge table, lost on restart
    Memory,
}

/// Which cache store backs the read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// Redis via a deadpool connection pool
    Redis,
    /// In-process TTL cache with LRU eviction
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Redis connection parameters.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub pool_size: usize,
}

impl RedisConfig {
    /// Connection parameters for the redis client.
    ///
    /// The password is passed as its own field, never spliced into a URL.
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                password: self.password.clone(),
                ..Default::default()
            },
        }
    }
}

/// Server configuration parameters.
///
/// Everything except the credential secret has a default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret used to verify bearer credentials
    pub jwt_secret: String,
    /// Durable table holding follow edges
    pub follow_table: String,
    /// Relationship store selection
    pub store_backend: StoreBackend,
    /// Postgres connection string (postgres backend only)
    pub database_url: Option<String>,
    /// Upper bound for the Postgres pool
    pub database_max_connections: u32,
    /// Cache store selection
    pub cache_backend: CacheBackend,
    /// Redis connection parameters (redis backend only)
    pub redis: RedisConfig,
    /// TTL in seconds for cached follow lists
    pub cache_ttl: u64,
    /// Capacity of the in-memory cache
    pub cache_max_entries: usize,
    /// Interval in seconds between in-memory cache sweeps
    pub cleanup_interval: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `JWT_SECRET` - Credential verification secret (required)
    /// - `FOLLOW_TABLE` - Edge table name (default: follows)
    /// - `STORE_BACKEND` - `postgres` or `memory` (default: memory)
    /// - `DATABASE_URL` - Postgres URL (required for postgres)
    /// - `DATABASE_MAX_CONNECTIONS` - Pool size (default: 10)
    /// - `CACHE_BACKEND` - `redis` or `memory` (default: memory)
    /// - `REDIS_HOST` / `REDIS_PORT` / `REDIS_PASSWORD` / `REDIS_POOL_SIZE`
    /// - `CACHE_TTL` - Follow list TTL in seconds (default: 60)
    /// - `CACHE_MAX_ENTRIES` - In-memory cache capacity (default: 10000)
    /// - `CLEANUP_INTERVAL` - In-memory sweep interval in seconds (default: 1)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let follow_table = env::var("FOLLOW_TABLE").unwrap_or(defaults.follow_table);
        validate_table_name(&follow_table)?;

        let store_backend = parse_var("STORE_BACKEND", defaults.store_backend)?;
        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(Self {
            jwt_secret,
            follow_table,
            store_backend,
            database_url,
            database_max_connections: parse_var(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            cache_backend: parse_var("CACHE_BACKEND", defaults.cache_backend)?,
            redis: RedisConfig {
                host: env::var("REDIS_HOST").unwrap_or(defaults.redis.host),
                port: parse_var("REDIS_PORT", defaults.redis.port)?,
                password: env::var("REDIS_PASSWORD").ok().filter(|v| !v.is_empty()),
                pool_size: parse_var("REDIS_POOL_SIZE", defaults.redis.pool_size)?,
            },
            cache_ttl: parse_var("CACHE_TTL", defaults.cache_ttl)?,
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES", defaults.cache_max_entries)?,
            cleanup_interval: parse_var("CLEANUP_INTERVAL", defaults.cleanup_interval)?,
            server_port: parse_var("SERVER_PORT", defaults.server_port)?,
        })
    }

    /// TTL for cached follow lists.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            follow_table: "follows".to_string(),
            store_backend: StoreBackend::Memory,
            database_url: None,
            database_max_connections: 10,
            cache_backend: CacheBackend::Memory,
            redis: RedisConfig {
                host: "127.0.0.1".to_string(),
                port: 6379,
                password: None,
                pool_size: 16,
            },
            cache_ttl: DEFAULT_TTL.as_secs(),
            cache_max_entries: 10_000,
            cleanup_interval: 1,
            server_port: 3000,
        }
    }
}

/// Reads and parses an optional variable, falling back to `default` when unset.
fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// The table name is spliced into SQL, so only plain identifiers are allowed.
fn validate_table_name(name: &str) -> Result<(), ConfigError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name: "FOLLOW_TABLE",
            reason: format!("'{}' is not a plain identifier", name),
        })
    }
}
