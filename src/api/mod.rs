//! API Module
//!
//! HTTP handlers and routing for the follow API.
//!
//! # Endpoints
//! - `POST /follow/:user_id` - Follow a user
//! - `DELETE /follow/:user_id` (or `POST /unfollow/:user_id`) - Unfollow a user
//! - `GET /following` - Users the caller follows
//! - `GET /followers` - Users following the caller
//! - `GET /following/:user_id` - Whether the caller follows a user
//! - `GET /stats` - Caller's following/follower counts
//! - `GET /cache/stats` - Cache-aside counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
