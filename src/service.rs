//! Follow Service
//!
//! Orchestrates the relationship store and the cache-aside layer. Mutations
//! go straight to the store and never touch the cache; list reads go through
//! the cache and fall back to the store on a miss.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{CacheAside, CacheKey};
use crate::error::{FollowError, Result};
use crate::models::{Edge, FollowEntry, UserId};
use crate::store::EdgeStore;

/// Sizes of a user's two follow lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowCounts {
    pub following: usize,
    pub followers: usize,
}

/// Follow/unfollow and list operations for authenticated callers.
#[derive(Clone)]
pub struct FollowService {
    store: Arc<dyn EdgeStore>,
    cache: CacheAside,
}

impl FollowService {
    /// Creates a service over explicitly constructed clients.
    pub fn new(store: Arc<dyn EdgeStore>, cache: CacheAside) -> Self {
        Self { store, cache }
    }

    /// The cache-aside layer, for stats reporting.
    pub fn cache(&self) -> &CacheAside {
        &self.cache
    }

    /// Makes `requester` follow `target`.
    ///
    /// Self-follows are rejected before the store is called. An existing
    /// edge is reported as [`FollowError::AlreadyFollowing`].
    pub async fn follow(&self, requester: &UserId, target: &UserId) -> Result<Edge> {
        if requester == target {
            return Err(FollowError::SelfFollowForbidden);
        }

        let edge = self.store.create_edge(requester, target).await?;
        info!(follower = %requester, followee = %target, "followed");
        Ok(edge)
    }

    /// Removes the edge `requester -> target`. Succeeds if there was none.
    pub async fn unfollow(&self, requester: &UserId, target: &UserId) -> Result<()> {
        self.store.delete_edge(requester, target).await?;
        info!(follower = %requester, followee = %target, "unfollowed");
        Ok(())
    }

    /// Users `requester` follows, possibly stale by up to one cache TTL.
    pub async fn list_following(&self, requester: &UserId) -> Result<Vec<FollowEntry>> {
        let store = &self.store;
        self.cache
            .get_or_populate(&CacheKey::following(requester), || async move {
                debug!(user = %requester, "loading following list from store");
                let edges = store.list_by_follower(requester).await?;
                Ok::<_, FollowError>(edges.iter().map(Edge::as_following).collect())
            })
            .await
    }

    /// Users following `requester`, possibly stale by up to one cache TTL.
    pub async fn list_followers(&self, requester: &UserId) -> Result<Vec<FollowEntry>> {
        let store = &self.store;
        self.cache
            .get_or_populate(&CacheKey::followers(requester), || async move {
                debug!(user = %requester, "loading followers list from store");
                let edges = store.list_by_followee(requester).await?;
                Ok::<_, FollowError>(edges.iter().map(Edge::as_follower).collect())
            })
            .await
    }

    /// Whether `requester` currently follows `target`, read from the store.
    pub async fn is_following(&self, requester: &UserId, target: &UserId) -> Result<bool> {
        Ok(self.store.edge_exists(requester, target).await?)
    }

    /// List sizes, derived from the cached lists.
    pub async fn follow_counts(&self, requester: &UserId) -> Result<FollowCounts> {
        let following = self.list_following(requester).await?.len();
        let followers = self.list_followers(requester).await?.len();
        Ok(FollowCounts {
            following,
            followers,
        })
    }

    /// Closes the store and cache clients.
    pub async fn close(&self) {
        self.store.close().await;
        self.cache.close().await;
    }
}
