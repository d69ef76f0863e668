//! Follow relationship types
//!
//! An [`Edge`] is the durable record of one user following another. A
//! [`FollowEntry`] is the projection of an edge from one side, which is what
//! the follow lists (and their cache entries) are made of.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == User Id ==
/// Opaque user identity taken from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps a raw identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// == Edge ==
/// A directed follow relationship (follower -> followee).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// The user doing the following
    pub follower_id: UserId,
    /// The user being followed
    pub followee_id: UserId,
    /// When the edge was created, assigned by the store
    pub created_at: DateTime<Utc>,
}

impl Edge {
    /// Creates an edge stamped with the current time.
    pub fn new(follower_id: UserId, followee_id: UserId) -> Self {
        Self {
            follower_id,
            followee_id,
            created_at: Utc::now(),
        }
    }

    /// Projects the edge as an entry of the follower's "following" list.
    pub fn as_following(&self) -> FollowEntry {
        FollowEntry {
            user_id: self.followee_id.clone(),
            followed_at: self.created_at,
        }
    }

    /// Projects the edge as an entry of the followee's "followers" list.
    pub fn as_follower(&self) -> FollowEntry {
        FollowEntry {
            user_id: self.follower_id.clone(),
            followed_at: self.created_at,
        }
    }
}

// == Follow Entry ==
/// One peer in a following/followers list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEntry {
    /// The peer on the other side of the edge
    pub user_id: UserId,
    /// When the edge was created
    pub followed_at: DateTime<Utc>,
}
