//! Error types for the follow service
//!
//! Provides unified error handling using thiserror. Each layer has its own
//! error enum; only `FollowError` is ever turned into an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;

// == Follow Error Enum ==
/// Domain error returned by the follow service and its handlers.
#[derive(Error, Debug)]
pub enum FollowError {
    /// Missing, malformed or expired credential
    #[error("Authentication required")]
    Unauthenticated,

    /// Requester tried to follow themselves
    #[error("Users cannot follow themselves")]
    SelfFollowForbidden,

    /// An edge already exists for the ordered pair
    #[error("Already following this user")]
    AlreadyFollowing,

    /// Durable store I/O failure
    #[error("Relationship store unavailable: {0}")]
    StoreUnavailable(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for FollowError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            FollowError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            FollowError::SelfFollowForbidden => (StatusCode::BAD_REQUEST, self.to_string()),
            FollowError::AlreadyFollowing => (StatusCode::CONFLICT, self.to_string()),
            FollowError::StoreUnavailable(_) => {
                // Details stay in the log, the client only sees a generic message
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse { error: message });

        (status, body).into_response()
    }
}

// == Store Error Enum ==
/// Errors raised by a relationship store adapter.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Conditional insert rejected: the edge already exists
    #[error("edge already exists")]
    Conflict,

    /// Follower and followee are the same identity
    #[error("follower and followee are the same")]
    SelfFollow,

    /// Backend could not be reached or rejected the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<StoreError> for FollowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => FollowError::AlreadyFollowing,
            StoreError::SelfFollow => FollowError::SelfFollowForbidden,
            StoreError::Unavailable(msg) => FollowError::StoreUnavailable(msg),
        }
    }
}

// == Cache Error Enum ==
/// Errors raised by a cache client. These never leave the cache-aside layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Connection or command failure
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// Stored payload could not be encoded or decoded
    #[error("cache serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Config Error Enum ==
/// Errors raised while loading configuration from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required variable is not set
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but its value is unusable
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

// == Result Type Aliases ==
/// Convenience Result type for the follow service.
pub type Result<T> = std::result::Result<T, FollowError>;

/// Result type for store adapters.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for cache clients.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
