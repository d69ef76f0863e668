//! LRU Index Module
//!
//! Recency ordering for the in-memory cache's eviction policy.

use std::collections::{BTreeMap, HashMap};

// == LRU Index ==
/// Orders keys by last use.
///
/// Every touch stamps the key with a fresh tick; the smallest tick in
/// `by_tick` is the least recently used key.
#[derive(Debug, Default)]
pub struct LruIndex {
    next_tick: u64,
    by_tick: BTreeMap<u64, String>,
    ticks: HashMap<String, u64>,
}

impl LruIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as most recently used, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        let tick = self.next_tick;
        self.next_tick += 1;

        if let Some(old) = self.ticks.insert(key.to_string(), tick) {
            self.by_tick.remove(&old);
        }
        self.by_tick.insert(tick, key.to_string());
    }

    /// Forgets a key.
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.by_tick.remove(&tick);
        }
    }

    /// Removes and returns the least recently used key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        let (_, key) = self.by_tick.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}
