//! In-process edge table.
//!
//! Mirrors the layout of the durable table: a primary map keyed by
//! (follower, followee) plus a followee -> followers secondary index.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ensure_distinct, EdgeStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{Edge, UserId};

#[derive(Debug, Default)]
struct Tables {
    /// Primary table, ordered so a follower's edges are contiguous
    edges: BTreeMap<(UserId, UserId), Edge>,
    /// Secondary index: followee -> followers
    by_followee: BTreeMap<UserId, BTreeSet<UserId>>,
}

/// Edge store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryEdgeStore {
    tables: RwLock<Tables>,
}

impl MemoryEdgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored edges.
    pub async fn len(&self) -> usize {
        self.tables.read().await.edges.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl EdgeStore for MemoryEdgeStore {
    async fn create_edge(&self, follower_id: &UserId, followee_id: &UserId) -> StoreResult<Edge> {
        ensure_distinct(follower_id, followee_id)?;

        let mut tables = self.tables.write().await;
        let key = (follower_id.clone(), followee_id.clone());
        if tables.edges.contains_key(&key) {
            return Err(StoreError::Conflict);
        }

        let edge = Edge::new(follower_id.clone(), followee_id.clone());
        tables.edges.insert(key, edge.clone());
        tables
            .by_followee
            .entry(followee_id.clone())
            .or_default()
            .insert(follower_id.clone());

        debug!(follower = %follower_id, followee = %followee_id, "edge created");
        Ok(edge)
    }

    async fn delete_edge(&self, follower_id: &UserId, followee_id: &UserId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let key = (follower_id.clone(), followee_id.clone());

        if tables.edges.remove(&key).is_some() {
            if let Some(followers) = tables.by_followee.get_mut(followee_id) {
                followers.remove(follower_id);
                if followers.is_empty() {
                    tables.by_followee.remove(followee_id);
                }
            }
            debug!(follower = %follower_id, followee = %followee_id, "edge deleted");
        }
        Ok(())
    }

    async fn list_by_follower(&self, follower_id: &UserId) -> StoreResult<Vec<Edge>> {
        let tables = self.tables.read().await;
        // The empty id sorts first, so the range starts at this follower's first edge
        let start = (follower_id.clone(), UserId::new(String::new()));
        Ok(tables
            .edges
            .range(start..)
            .take_while(|((follower, _), _)| follower == follower_id)
            .map(|(_, edge)| edge.clone())
            .collect())
    }

    async fn list_by_followee(&self, followee_id: &UserId) -> StoreResult<Vec<Edge>> {
        let tables = self.tables.read().await;
        let Some(followers) = tables.by_followee.get(followee_id) else {
            return Ok(Vec::new());
        };

        Ok(followers
            .iter()
            .filter_map(|follower| {
                tables
                    .edges
                    .get(&(follower.clone(), followee_id.clone()))
                    .cloned()
            })
            .collect())
    }

    async fn edge_exists(&self, follower_id: &UserId, followee_id: &UserId) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .edges
            .contains_key(&(follower_id.clone(), followee_id.clone())))
    }
}
