//! API Routes
//!
//! Configures the Axum router with all follow endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, counts_handler, follow_handler, follow_status_handler,
    followers_handler, following_handler, health_handler, unfollow_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/follow/:user_id", post(follow_handler).delete(unfollow_handler))
        .route("/unfollow/:user_id", post(unfollow_handler))
        .route("/following", get(following_handler))
        .route("/following/:user_id", get(follow_status_handler))
        .route("/followers", get(followers_handler))
        .route("/stats", get(counts_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
