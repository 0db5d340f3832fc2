//! Scripted store used by the check and validator unit tests.

use crate::error::StoreError;
use crate::store::{Metric, MetricStore, Snapshot, SnapshotStore, StoreFuture, TimeWindow};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub(crate) struct FakeStore {
    pub entities: u64,
    pub snapshots: u64,
    pub zero_balances: Vec<(String, u64)>,
    pub block_samples: Vec<Snapshot>,
    pub bucket_snapshots: Vec<Snapshot>,
    pub rate_metrics: Vec<Metric>,
    pub failing: HashSet<&'static str>,
    pub calls: Vec<&'static str>,
}

impl FakeStore {
    pub fn failing_on(mut self, op: &'static str) -> Self {
        self.failing.insert(op);
        self
    }

    fn guard(&mut self, op: &'static str) -> Result<(), StoreError> {
        self.calls.push(op);
        if self.failing.contains(op) {
            return Err(StoreError::Connection(format!("{op}: connection reset")));
        }
        Ok(())
    }
}

impl SnapshotStore for FakeStore {
    fn count_distinct_entities(&mut self, _window: TimeWindow) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            self.guard("count_distinct_entities")?;
            Ok(self.entities)
        })
    }

    fn count_snapshots(&mut self, _window: TimeWindow) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            self.guard("count_snapshots")?;
            Ok(self.snapshots)
        })
    }

    fn snapshots_with_zero_balance(
        &mut self,
        _window: TimeWindow,
    ) -> StoreFuture<'_, Vec<(String, u64)>> {
        Box::pin(async move {
            self.guard("snapshots_with_zero_balance")?;
            Ok(self.zero_balances.clone())
        })
    }

    fn recent_snapshots_with_block_height(
        &mut self,
        _window: TimeWindow,
        limit: usize,
    ) -> StoreFuture<'_, Vec<Snapshot>> {
        Box::pin(async move {
            self.guard("recent_snapshots_with_block_height")?;
            Ok(self.block_samples.iter().take(limit).cloned().collect())
        })
    }

    fn snapshots_in_bucket(
        &mut self,
        bucket_start: DateTime<Utc>,
        bucket_end: DateTime<Utc>,
    ) -> StoreFuture<'_, Vec<Snapshot>> {
        Box::pin(async move {
            self.guard("snapshots_in_bucket")?;
            let bucket = TimeWindow::new(bucket_start, bucket_end);
            Ok(self
                .bucket_snapshots
                .iter()
                .filter(|s| bucket.contains(s.timestamp))
                .cloned()
                .collect())
        })
    }
}

impl MetricStore for FakeStore {
    fn metrics_with_rate_in_window(
        &mut self,
        _window: TimeWindow,
    ) -> StoreFuture<'_, Vec<Metric>> {
        Box::pin(async move {
            self.guard("metrics_with_rate_in_window")?;
            Ok(self.rate_metrics.clone())
        })
    }
}
