//! In-Memory Cache Module
//!
//! Single-node cache backend: HashMap storage with lazy TTL expiry and LRU
//! eviction once `max_entries` is reached.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{CacheClient, CacheEntry, LruIndex};
use crate::error::CacheResult;

#[derive(Debug)]
struct LocalStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruIndex,
    max_entries: usize,
}

impl LocalStore {
    fn get(&mut self, key: &str) -> Option<String> {
        let expired = self.entries.get(key)?.is_expired();
        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            return None;
        }

        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    fn set(&mut self, key: &str, value: &str, ttl: Duration) {
        let is_overwrite = self.entries.contains_key(key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted) = self.lru.pop_oldest() {
                self.entries.remove(&evicted);
                debug!(key = %evicted, "evicted least recently used entry");
            }
        }

        self.entries
            .insert(key.to_string(), CacheEntry::new(value.to_string(), ttl));
        self.lru.touch(key);
    }

    fn purge_expired(&mut self) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }
        expired.len()
    }
}

// == Memory Cache ==
/// Thread-safe in-process cache. Clones share the same storage.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LocalStore>>,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(LocalStore {
                entries: HashMap::new(),
                lru: LruIndex::new(),
                max_entries: max_entries.max(1),
            })),
        }
    }

    /// Removes every expired entry and returns how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.purge_expired()
    }

    /// Number of stored entries, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.store.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        // Write lock: a read refreshes LRU order and may drop an expired entry
        Ok(self.store.write().await.get(key))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.store.write().await.set(key, value, ttl);
        Ok(())
    }
}
