//! Authenticated caller extractor.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::AppState;
use crate::auth::bearer_token;
use crate::error::FollowError;
use crate::models::UserId;

/// The verified identity of the caller.
///
/// Extraction fails with [`FollowError::Unauthenticated`] before the handler
/// body runs, so no store or cache call is made for unauthenticated requests.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserId);

impl std::ops::Deref for AuthenticatedUser {
    type Target = UserId;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = FollowError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(bearer_token)
            .ok_or(FollowError::Unauthenticated)?;

        state
            .resolver
            .resolve(token)
            .map(AuthenticatedUser)
            .ok_or(FollowError::Unauthenticated)
    }
}
