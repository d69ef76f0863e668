//! Integration Tests for API Endpoints
//!
//! Drives the full router with signed bearer credentials over the in-memory
//! store and cache backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use follow_graph::{
    api::create_router,
    auth::IdentityResolver,
    cache::{CacheAside, CacheClient, MemoryCache},
    error::{CacheResult, StoreResult},
    models::{Edge, UserId},
    store::{EdgeStore, MemoryEdgeStore},
    AppState, FollowService,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "integration-secret";

// == Counting Collaborators ==

/// Store that counts every call before delegating.
#[derive(Default)]
struct CountingStore {
    inner: MemoryEdgeStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl EdgeStore for CountingStore {
    async fn create_edge(&self, follower_id: &UserId, followee_id: &UserId) -> StoreResult<Edge> {
        self.hit();
        self.inner.create_edge(follower_id, followee_id).await
    }

    async fn delete_edge(&self, follower_id: &UserId, followee_id: &UserId) -> StoreResult<()> {
        self.hit();
        self.inner.delete_edge(follower_id, followee_id).await
    }

    async fn list_by_follower(&self, follower_id: &UserId) -> StoreResult<Vec<Edge>> {
        self.hit();
        self.inner.list_by_follower(follower_id).await
    }

    async fn list_by_followee(&self, followee_id: &UserId) -> StoreResult<Vec<Edge>> {
        self.hit();
        self.inner.list_by_followee(followee_id).await
    }

    async fn edge_exists(&self, follower_id: &UserId, followee_id: &UserId) -> StoreResult<bool> {
        self.hit();
        self.inner.edge_exists(follower_id, followee_id).await
    }
}

/// Cache that counts every call before delegating.
struct CountingCache {
    inner: MemoryCache,
    calls: AtomicUsize,
}

#[async_trait]
impl CacheClient for CountingCache {
    async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_raw(key).await
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.set_raw(key, value, ttl).await
    }
}

// == Helper Functions ==

struct TestApp {
    router: Router,
    store: Arc<CountingStore>,
    cache: Arc<CountingCache>,
}

fn create_test_app() -> TestApp {
    let store = Arc::new(CountingStore::default());
    let cache = Arc::new(CountingCache {
        inner: MemoryCache::new(100),
        calls: AtomicUsize::new(0),
    });
    let service = FollowService::new(
        store.clone(),
        CacheAside::new(cache.clone(), Duration::from_secs(60)),
    );
    let router = create_router(AppState::new(service, IdentityResolver::new(SECRET)));

    TestApp {
        router,
        store,
        cache,
    }
}

fn token_for(claims: Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn bearer(user: &str) -> String {
    let exp = chrono::Utc::now().timestamp() + 3600;
    format!("Bearer {}", token_for(json!({ "sub": user, "exp": exp })))
}

async fn send(app: &Router, method: &str, uri: &str, auth: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        request = request.header("authorization", auth);
    }

    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn user_ids(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["userId"].as_str().unwrap())
        .collect()
}

// == Follow Endpoint Tests ==

#[tokio::test]
async fn test_follow_success() {
    let app = create_test_app();

    let (status, json) = send(&app.router, "POST", "/follow/bob", Some(&bearer("alice"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["followerId"], "alice");
    assert_eq!(json["followeeId"], "bob");
    assert!(json["followedAt"].is_string());
}

#[tokio::test]
async fn test_self_follow_is_bad_request() {
    let app = create_test_app();

    let (status, json) = send(&app.router, "POST", "/follow/alice", Some(&bearer("alice"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("themselves"));
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn test_duplicate_follow_is_conflict() {
    let app = create_test_app();
    let auth = bearer("alice");

    send(&app.router, "POST", "/follow/bob", Some(&auth)).await;
    let (status, _) = send(&app.router, "POST", "/follow/bob", Some(&auth)).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

// == Unfollow Endpoint Tests ==

#[tokio::test]
async fn test_unfollow_is_idempotent() {
    let app = create_test_app();
    let auth = bearer("alice");

    send(&app.router, "POST", "/follow/bob", Some(&auth)).await;
    let (first, json) = send(&app.router, "DELETE", "/follow/bob", Some(&auth)).await;
    let (second, _) = send(&app.router, "POST", "/unfollow/bob", Some(&auth)).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("unfollowed"));

    let (_, status) = send(&app.router, "GET", "/following/bob", Some(&auth)).await;
    assert_eq!(status["following"], false);
}

// == List Endpoint Tests ==

#[tokio::test]
async fn test_following_and_followers_lists() {
    let app = create_test_app();

    send(&app.router, "POST", "/follow/carol", Some(&bearer("alice"))).await;
    send(&app.router, "POST", "/follow/bob", Some(&bearer("alice"))).await;
    send(&app.router, "POST", "/follow/bob", Some(&bearer("carol"))).await;

    let (status, following) = send(&app.router, "GET", "/following", Some(&bearer("alice"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user_ids(&following), vec!["bob", "carol"]);
    assert!(following[0]["followedAt"].is_string());

    let (status, followers) = send(&app.router, "GET", "/followers", Some(&bearer("bob"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user_ids(&followers), vec!["alice", "carol"]);
}

#[tokio::test]
async fn test_cached_list_is_served_without_store() {
    let app = create_test_app();
    let auth = bearer("alice");
    send(&app.router, "POST", "/follow/bob", Some(&auth)).await;

    send(&app.router, "GET", "/following", Some(&auth)).await;
    let after_first_read = app.store.calls();
    let (_, following) = send(&app.router, "GET", "/following", Some(&auth)).await;

    assert_eq!(user_ids(&following), vec!["bob"]);
    assert_eq!(app.store.calls(), after_first_read);

    let (_, stats) = send(&app.router, "GET", "/cache/stats", None).await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
}

#[tokio::test]
async fn test_follow_does_not_invalidate_cached_list() {
    let app = create_test_app();
    let auth = bearer("alice");

    let (_, before) = send(&app.router, "GET", "/following", Some(&auth)).await;
    send(&app.router, "POST", "/follow/bob", Some(&auth)).await;
    let (_, after) = send(&app.router, "GET", "/following", Some(&auth)).await;

    assert!(user_ids(&before).is_empty());
    // Served from the cache populated before the follow
    assert!(user_ids(&after).is_empty());
}

#[tokio::test]
async fn test_counts_endpoint() {
    let app = create_test_app();
    send(&app.router, "POST", "/follow/bob", Some(&bearer("alice"))).await;
    send(&app.router, "POST", "/follow/alice", Some(&bearer("carol"))).await;
    send(&app.router, "POST", "/follow/alice", Some(&bearer("dave"))).await;

    let (status, json) = send(&app.router, "GET", "/stats", Some(&bearer("alice"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["followingCount"], 1);
    assert_eq!(json["followersCount"], 2);
}

// == Authentication Tests ==

#[tokio::test]
async fn test_unauthenticated_requests_touch_nothing() {
    let app = create_test_app();
    let expired = format!(
        "Bearer {}",
        token_for(json!({ "sub": "alice", "exp": chrono::Utc::now().timestamp() - 3600 }))
    );
    let no_subject = format!(
        "Bearer {}",
        token_for(json!({ "exp": chrono::Utc::now().timestamp() + 3600 }))
    );
    let credentials = [
        None,
        Some("Bearer not-a-token"),
        Some("Basic YWxpY2U6c2VjcmV0"),
        Some(expired.as_str()),
        Some(no_subject.as_str()),
    ];
    let operations = [
        ("POST", "/follow/bob"),
        ("DELETE", "/follow/bob"),
        ("GET", "/following"),
        ("GET", "/followers"),
    ];

    for auth in credentials {
        for (method, uri) in operations {
            let (status, json) = send(&app.router, method, uri, auth).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {} with {:?}", method, uri, auth);
            assert!(json["error"].is_string());
        }
    }

    assert_eq!(app.store.calls(), 0);
    assert_eq!(app.cache.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_user_id_claim_preferred_over_sub() {
    let app = create_test_app();
    let exp = chrono::Utc::now().timestamp() + 3600;
    let auth = format!(
        "Bearer {}",
        token_for(json!({ "user_id": "alice", "sub": "mallory", "exp": exp }))
    );

    let (_, json) = send(&app.router, "POST", "/follow/bob", Some(&auth)).await;

    assert_eq!(json["followerId"], "alice");
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app.router, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}
