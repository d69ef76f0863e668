//! Follow Graph server
//!
//! Serves the follow API over explicitly constructed store and cache clients.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use follow_graph::api::{create_router, AppState};
use follow_graph::auth::IdentityResolver;
use follow_graph::cache::{CacheAside, CacheClient, MemoryCache, RedisCache};
use follow_graph::config::{CacheBackend, Config, StoreBackend};
use follow_graph::store::{EdgeStore, MemoryEdgeStore, PgEdgeStore};
use follow_graph::{spawn_cleanup_task, FollowService};

/// Main entry point for the follow server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the relationship store and the cache store
/// 4. Start the TTL cleanup task when the cache is in-process
/// 5. Serve HTTP until SIGINT/SIGTERM, then close both clients
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "follow_graph=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Follow Graph server");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: table={}, store={:?}, cache={:?}, ttl={}s, port={}",
        config.follow_table,
        config.store_backend,
        config.cache_backend,
        config.cache_ttl,
        config.server_port
    );

    let store = connect_store(&config).await?;
    let (cache, cleanup_handle) = connect_cache(&config).await?;

    let service = FollowService::new(store, CacheAside::new(cache, config.cache_ttl()));
    let state = AppState::new(service, IdentityResolver::new(&config.jwt_secret));
    let service = state.service.clone();

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    service.close().await;
    info!("Server shutdown complete");
    Ok(())
}

async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn EdgeStore>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;
            let store = PgEdgeStore::connect(
                url,
                &config.follow_table,
                config.database_max_connections,
            )
            .await
            .context("failed to connect to Postgres")?;
            store
                .ensure_schema()
                .await
                .context("failed to prepare edge table")?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory relationship store, edges are lost on restart");
            Ok(Arc::new(MemoryEdgeStore::new()))
        }
    }
}

async fn connect_cache(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CacheClient>, Option<JoinHandle<()>>)> {
    match config.cache_backend {
        CacheBackend::Redis => {
            let cache: Arc<dyn CacheClient> = Arc::new(
                RedisCache::connect(&config.redis)
                    .await
                    .context("failed to configure Redis")?,
            );
            Ok((cache, None))
        }
        CacheBackend::Memory => {
            let cache = MemoryCache::new(config.cache_max_entries);
            let handle = spawn_cleanup_task(cache.clone(), config.cleanup_interval);
            info!("In-memory cache initialized with cleanup task");
            let cache: Arc<dyn CacheClient> = Arc::new(cache);
            Ok((cache, Some(handle)))
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the cleanup task.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Cleanup task aborted");
    }
}
