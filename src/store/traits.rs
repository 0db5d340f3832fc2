use super::types::{Metric, Snapshot, TimeWindow};
use crate::error::StoreError;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by every store operation.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Read-only access to whale balance snapshots.
///
/// Methods take `&mut self`: a handle belongs to exactly one validation run
/// and is never used concurrently.
pub trait SnapshotStore: Send {
    fn count_distinct_entities(&mut self, window: TimeWindow) -> StoreFuture<'_, u64>;

    fn count_snapshots(&mut self, window: TimeWindow) -> StoreFuture<'_, u64>;

    /// Entities with at least one exact-zero balance, with their zero count.
    fn snapshots_with_zero_balance(
        &mut self,
        window: TimeWindow,
    ) -> StoreFuture<'_, Vec<(String, u64)>>;

    /// Snapshots carrying a block height, newest first.
    fn recent_snapshots_with_block_height(
        &mut self,
        window: TimeWindow,
        limit: usize,
    ) -> StoreFuture<'_, Vec<Snapshot>>;

    fn snapshots_in_bucket(
        &mut self,
        bucket_start: DateTime<Utc>,
        bucket_end: DateTime<Utc>,
    ) -> StoreFuture<'_, Vec<Snapshot>>;
}

/// Read-only access to previously computed analytics metrics.
pub trait MetricStore: Send {
    /// Metrics carrying a cross-asset rate, newest first.
    fn metrics_with_rate_in_window(&mut self, window: TimeWindow)
    -> StoreFuture<'_, Vec<Metric>>;
}

/// One session that can serve every quality check.
pub trait QualityStore: SnapshotStore + MetricStore {}

impl<T: SnapshotStore + MetricStore + ?Sized> QualityStore for T {}

/// Persists the metric produced by downstream analysis.
pub trait MetricWriter: Send + Sync {
    /// Store `metric` and return its id.
    fn persist_metric<'a>(&'a self, metric: &'a Metric) -> StoreFuture<'a, i64>;
}
