//! Postgres-backed edge table.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use super::{ensure_distinct, EdgeStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{Edge, UserId};

#[derive(Debug, sqlx::FromRow)]
struct EdgeRow {
    follower_id: String,
    followee_id: String,
    created_at: DateTime<Utc>,
}

impl From<EdgeRow> for Edge {
    fn from(row: EdgeRow) -> Self {
        Self {
            follower_id: row.follower_id.into(),
            followee_id: row.followee_id.into(),
            created_at: row.created_at,
        }
    }
}

/// New edge with its timestamp cut to the microsecond precision of
/// `TIMESTAMPTZ`, so the returned edge matches what a later read yields.
fn stored_edge(follower_id: &UserId, followee_id: &UserId) -> Edge {
    let mut edge = Edge::new(follower_id.clone(), followee_id.clone());
    edge.created_at = edge.created_at.trunc_subsecs(6);
    edge
}

/// Edge store on a Postgres table.
///
/// The table name comes from configuration and is validated there as a plain
/// identifier before it reaches any query.
#[derive(Debug, Clone)]
pub struct PgEdgeStore {
    pool: PgPool,
    table: String,
}

impl PgEdgeStore {
    /// Connects a pool to `url`.
    pub async fn connect(url: &str, table: &str, max_connections: u32) -> StoreResult<Self> {
        info!("Connecting to Postgres...");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                StoreError::from(e)
            })?;

        info!("Postgres connection pool established");
        Ok(Self::with_pool(pool, table))
    }

    /// Wraps an existing pool.
    pub fn with_pool(pool: PgPool, table: &str) -> Self {
        Self {
            pool,
            table: table.to_string(),
        }
    }

    /// Creates the edge table and its followee index if missing.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        let create_table = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                follower_id TEXT NOT NULL,
                followee_id TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                PRIMARY KEY (follower_id, followee_id),
                CHECK (follower_id <> followee_id)
            )
            "#,
            table = self.table
        );
        let create_index = format!(
            "CREATE INDEX IF NOT EXISTS {table}_followee_idx ON {table} (followee_id, follower_id)",
            table = self.table
        );

        sqlx::query(&create_table).execute(&self.pool).await?;
        sqlx::query(&create_index).execute(&self.pool).await?;

        info!(table = %self.table, "Edge table ready");
        Ok(())
    }
}

#[async_trait]
impl EdgeStore for PgEdgeStore {
    async fn create_edge(&self, follower_id: &UserId, followee_id: &UserId) -> StoreResult<Edge> {
        ensure_distinct(follower_id, followee_id)?;

        let edge = stored_edge(follower_id, followee_id);
        let sql = format!(
            r#"
            INSERT INTO {} (follower_id, followee_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (follower_id, followee_id) DO NOTHING
            "#,
            self.table
        );

        let result = sqlx::query(&sql)
            .bind(follower_id.as_str())
            .bind(followee_id.as_str())
            .bind(edge.created_at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict);
        }

        debug!(follower = %follower_id, followee = %followee_id, "edge created");
        Ok(edge)
    }

    async fn delete_edge(&self, follower_id: &UserId, followee_id: &UserId) -> StoreResult<()> {
        let sql = format!(
            "DELETE FROM {} WHERE follower_id = $1 AND followee_id = $2",
            self.table
        );

        sqlx::query(&sql)
            .bind(follower_id.as_str())
            .bind(followee_id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_by_follower(&self, follower_id: &UserId) -> StoreResult<Vec<Edge>> {
        let sql = format!(
            r#"
            SELECT follower_id, followee_id, created_at
            FROM {}
            WHERE follower_id = $1
            ORDER BY followee_id
            "#,
            self.table
        );

        let rows = sqlx::query_as::<_, EdgeRow>(&sql)
            .bind(follower_id.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Edge::from).collect())
    }

    async fn list_by_followee(&self, followee_id: &UserId) -> StoreResult<Vec<Edge>> {
        let sql = format!(
            r#"
            SELECT follower_id, followee_id, created_at
            FROM {}
            WHERE followee_id = $1
            ORDER BY follower_id
            "#,
            self.table
        );

        let rows = sqlx::query_as::<_, EdgeRow>(&sql)
            .bind(followee_id.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Edge::from).collect())
    }

    async fn edge_exists(&self, follower_id: &UserId, followee_id: &UserId) -> StoreResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE follower_id = $1 AND followee_id = $2)",
            self.table
        );

        let (exists,): (bool,) = sqlx::query_as(&sql)
            .bind(follower_id.as_str())
            .bind(followee_id.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}
