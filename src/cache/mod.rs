//! Cache Module
//!
//! Cache-aside read path for follow lists. A [`CacheClient`] is the opaque
//! TTL-capable key-value collaborator; [`CacheAside`] layers the
//! get-or-populate protocol on top of it.

mod aside;
mod entry;
mod keys;
mod lru;
mod memory;
mod redis;
mod stats;


use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheResult;

// Re-export public types
pub use aside::CacheAside;
pub use entry::CacheEntry;
pub use keys::{CacheKey, Direction};
pub use lru::LruIndex;
pub use memory::MemoryCache;
pub use redis::RedisCache;
pub use stats::{CacheCounters, CacheStats};

// == Public Constants ==
/// TTL applied to follow lists unless configured otherwise
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Key-value store with per-entry expiry, holding JSON strings.
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Returns the value under `key`, or `None` if absent or expired.
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value and TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Releases pooled connections.
    async fn close(&self) {}
}
