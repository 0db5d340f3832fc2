mod repository;
mod schema;

use crate::error::StoreError;
use crate::store::traits::{MetricStore, MetricWriter, SnapshotStore, StoreFuture};
use crate::store::types::{Metric, Snapshot, TimeWindow};
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqlitePool};
use std::path::Path;

/// SQLite-backed snapshot and metric storage.
///
/// The pool is shared; each validation run takes its own [`SqliteSession`].
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path`.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Connection(format!("create database directory: {e}")))?;
        }

        let url = format!("sqlite:{}?mode=rwc", db_path.display());
        let pool = SqlitePool::connect(&url).await?;
        schema::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// Open an in-memory database.
    ///
    /// Limited to a single connection, so a live session blocks writers
    /// until it is dropped.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        schema::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Acquire a dedicated connection for one validation run.
    pub async fn session(&self) -> Result<SqliteSession, StoreError> {
        let conn = self.pool.acquire().await?;
        Ok(SqliteSession { conn })
    }

    pub async fn record_snapshot(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        repository::insert_snapshot(&self.pool, snapshot).await
    }

    pub async fn health_check(&self) -> bool {
        repository::health_check(&self.pool).await
    }
}

impl MetricWriter for SqliteStore {
    fn persist_metric<'a>(&'a self, metric: &'a Metric) -> StoreFuture<'a, i64> {
        Box::pin(async move { repository::insert_metric(&self.pool, metric).await })
    }
}

/// A pooled connection owned by a single validation run.
pub struct SqliteSession {
    conn: PoolConnection<Sqlite>,
}

impl SnapshotStore for SqliteSession {
    fn count_distinct_entities(&mut self, window: TimeWindow) -> StoreFuture<'_, u64> {
        Box::pin(async move { repository::count_distinct_entities(&mut self.conn, window).await })
    }

    fn count_snapshots(&mut self, window: TimeWindow) -> StoreFuture<'_, u64> {
        Box::pin(async move { repository::count_snapshots(&mut self.conn, window).await })
    }

    fn snapshots_with_zero_balance(
        &mut self,
        window: TimeWindow,
    ) -> StoreFuture<'_, Vec<(String, u64)>> {
        Box::pin(
            async move { repository::snapshots_with_zero_balance(&mut self.conn, window).await },
        )
    }

    fn recent_snapshots_with_block_height(
        &mut self,
        window: TimeWindow,
        limit: usize,
    ) -> StoreFuture<'_, Vec<Snapshot>> {
        Box::pin(async move {
            repository::recent_snapshots_with_block_height(&mut self.conn, window, limit).await
        })
    }

    fn snapshots_in_bucket(
        &mut self,
        bucket_start: DateTime<Utc>,
        bucket_end: DateTime<Utc>,
    ) -> StoreFuture<'_, Vec<Snapshot>> {
        Box::pin(async move {
            repository::snapshots_in_bucket(&mut self.conn, bucket_start, bucket_end).await
        })
    }
}

impl MetricStore for SqliteSession {
    fn metrics_with_rate_in_window(
        &mut self,
        window: TimeWindow,
    ) -> StoreFuture<'_, Vec<Metric>> {
        Box::pin(
            async move { repository::metrics_with_rate_in_window(&mut self.conn, window).await },
        )
    }
}
