//! Follow Graph - follow relationships with a cache-aside read path
//!
//! Users follow and unfollow each other; following/follower lists are served
//! through a TTL cache that is populated on read and never invalidated on write.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use service::FollowService;
pub use tasks::spawn_cleanup_task;
