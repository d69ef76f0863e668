//! API Handlers
//!
//! HTTP request handlers for each follow endpoint. Every follow handler takes
//! an [`AuthenticatedUser`], so unauthenticated requests are rejected with 401
//! before any store or cache call.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::auth::{AuthenticatedUser, IdentityResolver};
use crate::error::Result;
use crate::models::{
    CacheStatsResponse, FollowCountsResponse, FollowEntry, FollowResponse, FollowStatusResponse,
    HealthResponse, UnfollowResponse, UserId,
};
use crate::service::FollowService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Follow operations over the injected store and cache clients
    pub service: Arc<FollowService>,
    /// Bearer credential verification
    pub resolver: Arc<IdentityResolver>,
}

impl AppState {
    /// Creates a new AppState from its collaborators.
    pub fn new(service: FollowService, resolver: IdentityResolver) -> Self {
        Self {
            service: Arc::new(service),
            resolver: Arc::new(resolver),
        }
    }
}

/// Handler for POST /follow/:user_id
pub async fn follow_handler(
    State(state): State<AppState>,
    AuthenticatedUser(requester): AuthenticatedUser,
    Path(target): Path<UserId>,
) -> Result<Json<FollowResponse>> {
    let edge = state.service.follow(&requester, &target).await?;
    Ok(Json(edge.into()))
}

/// Handler for DELETE /follow/:user_id and POST /unfollow/:user_id
pub async fn unfollow_handler(
    State(state): State<AppState>,
    AuthenticatedUser(requester): AuthenticatedUser,
    Path(target): Path<UserId>,
) -> Result<Json<UnfollowResponse>> {
    state.service.unfollow(&requester, &target).await?;
    Ok(Json(UnfollowResponse::new()))
}

/// Handler for GET /following
pub async fn following_handler(
    State(state): State<AppState>,
    AuthenticatedUser(requester): AuthenticatedUser,
) -> Result<Json<Vec<FollowEntry>>> {
    Ok(Json(state.service.list_following(&requester).await?))
}

/// Handler for GET /followers
pub async fn followers_handler(
    State(state): State<AppState>,
    AuthenticatedUser(requester): AuthenticatedUser,
) -> Result<Json<Vec<FollowEntry>>> {
    Ok(Json(state.service.list_followers(&requester).await?))
}

/// Handler for GET /following/:user_id
pub async fn follow_status_handler(
    State(state): State<AppState>,
    AuthenticatedUser(requester): AuthenticatedUser,
    Path(target): Path<UserId>,
) -> Result<Json<FollowStatusResponse>> {
    let following = state.service.is_following(&requester, &target).await?;
    Ok(Json(FollowStatusResponse {
        user_id: target,
        following,
    }))
}

/// Handler for GET /stats
pub async fn counts_handler(
    State(state): State<AppState>,
    AuthenticatedUser(requester): AuthenticatedUser,
) -> Result<Json<FollowCountsResponse>> {
    let counts = state.service.follow_counts(&requester).await?;
    Ok(Json(FollowCountsResponse {
        following_count: counts.following,
        followers_count: counts.followers,
    }))
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(state.service.cache().stats().into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
