//! Domain and response models
//!
//! `edge` holds the follow relationship types shared by every layer;
//! `responses` holds the DTOs serialized into HTTP response bodies.

pub mod edge;
pub mod responses;

// Re-export commonly used types
pub use edge::{Edge, FollowEntry, UserId};
pub use responses::{
    CacheStatsResponse, ErrorResponse, FollowCountsResponse, FollowResponse, FollowStatusResponse,
    HealthResponse, UnfollowResponse,
};
