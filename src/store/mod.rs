//! Relationship Store Module
//!
//! CRUD access to the durable follow-edge table. The primary key is the
//! ordered pair (follower, followee); followers are listed through a
//! secondary index keyed on the followee.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::error::{StoreError, StoreResult};
use crate::models::{Edge, UserId};

pub use memory::MemoryEdgeStore;
pub use postgres::PgEdgeStore;

/// Durable edge storage.
///
/// Implementations must be safe for concurrent use and must not retry:
/// any I/O failure is returned as [`StoreError::Unavailable`].
#[async_trait]
pub trait EdgeStore: Send + Sync {
    /// Inserts a new edge with a server-assigned timestamp.
    ///
    /// Rejects the insert with [`StoreError::Conflict`] if the ordered pair
    /// already exists; existing edges are never overwritten.
    async fn create_edge(&self, follower_id: &UserId, followee_id: &UserId) -> StoreResult<Edge>;

    /// Removes an edge. Removing a missing edge is not an error.
    async fn delete_edge(&self, follower_id: &UserId, followee_id: &UserId) -> StoreResult<()>;

    /// All edges where `follower_id` is the follower, ordered by followee.
    async fn list_by_follower(&self, follower_id: &UserId) -> StoreResult<Vec<Edge>>;

    /// All edges where `followee_id` is the followee, ordered by follower.
    async fn list_by_followee(&self, followee_id: &UserId) -> StoreResult<Vec<Edge>>;

    /// Whether the ordered pair exists.
    async fn edge_exists(&self, follower_id: &UserId, followee_id: &UserId) -> StoreResult<bool>;

    /// Releases pooled connections.
    async fn close(&self) {}
}

/// Rejects edges that point back at their own follower.
pub(crate) fn ensure_distinct(follower_id: &UserId, followee_id: &UserId) -> StoreResult<()> {
    if follower_id == followee_id {
        Err(StoreError::SelfFollow)
    } else {
        Ok(())
    }
}
