use crate::error::StoreError;
use crate::store::types::{Metric, Snapshot, TimeWindow};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

type SnapshotRow = (String, f64, i64, Option<i64>);
type MetricRow = (i64, i64, Option<f64>, String, bool, i64);

fn decode_timestamp(secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StoreError::Decode(format!("timestamp out of range: {secs}")))
}

fn decode_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

fn snapshot_from_row(
    (entity_id, balance, recorded_at, block_height): SnapshotRow,
) -> Result<Snapshot, StoreError> {
    Ok(Snapshot {
        entity_id,
        balance,
        timestamp: decode_timestamp(recorded_at)?,
        block_height: block_height.and_then(|h| u64::try_from(h).ok()),
    })
}

fn metric_from_row(
    (id, recorded_at, rate, tags, is_anomaly, excluded): MetricRow,
) -> Result<Metric, StoreError> {
    let tags: Vec<String> = serde_json::from_str(&tags)
        .map_err(|e| StoreError::Decode(format!("metric {id} tags: {e}")))?;
    Ok(Metric {
        id: Some(id),
        timestamp: decode_timestamp(recorded_at)?,
        cross_asset_rate: rate,
        tags,
        is_anomaly,
        excluded_signal_count: u32::try_from(excluded).unwrap_or(0),
    })
}

// ── Snapshot reads ───────────────────────────────────────────

pub(super) async fn count_distinct_entities(
    conn: &mut SqliteConnection,
    window: TimeWindow,
) -> Result<u64, StoreError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(DISTINCT entity_id) FROM whale_snapshots
         WHERE recorded_at >= ?1 AND recorded_at < ?2",
    )
    .bind(window.start.timestamp())
    .bind(window.end.timestamp())
    .fetch_one(&mut *conn)
    .await?;
    Ok(decode_count(count))
}

pub(super) async fn count_snapshots(
    conn: &mut SqliteConnection,
    window: TimeWindow,
) -> Result<u64, StoreError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM whale_snapshots
         WHERE recorded_at >= ?1 AND recorded_at < ?2",
    )
    .bind(window.start.timestamp())
    .bind(window.end.timestamp())
    .fetch_one(&mut *conn)
    .await?;
    Ok(decode_count(count))
}

pub(super) async fn snapshots_with_zero_balance(
    conn: &mut SqliteConnection,
    window: TimeWindow,
) -> Result<Vec<(String, u64)>, StoreError> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT entity_id, COUNT(*) FROM whale_snapshots
         WHERE recorded_at >= ?1 AND recorded_at < ?2 AND balance = 0
         GROUP BY entity_id
         ORDER BY entity_id",
    )
    .bind(window.start.timestamp())
    .bind(window.end.timestamp())
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(entity_id, count)| (entity_id, decode_count(count)))
        .collect())
}

pub(super) async fn recent_snapshots_with_block_height(
    conn: &mut SqliteConnection,
    window: TimeWindow,
    limit: usize,
) -> Result<Vec<Snapshot>, StoreError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows: Vec<SnapshotRow> = sqlx::query_as(
        "SELECT entity_id, balance, recorded_at, block_height FROM whale_snapshots
         WHERE recorded_at >= ?1 AND recorded_at < ?2 AND block_height IS NOT NULL
         ORDER BY recorded_at DESC, block_height DESC
         LIMIT ?3",
    )
    .bind(window.start.timestamp())
    .bind(window.end.timestamp())
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;
    rows.into_iter().map(snapshot_from_row).collect()
}

pub(super) async fn snapshots_in_bucket(
    conn: &mut SqliteConnection,
    bucket_start: DateTime<Utc>,
    bucket_end: DateTime<Utc>,
) -> Result<Vec<Snapshot>, StoreError> {
    let rows: Vec<SnapshotRow> = sqlx::query_as(
        "SELECT entity_id, balance, recorded_at, block_height FROM whale_snapshots
         WHERE recorded_at >= ?1 AND recorded_at < ?2
         ORDER BY entity_id, recorded_at",
    )
    .bind(bucket_start.timestamp())
    .bind(bucket_end.timestamp())
    .fetch_all(&mut *conn)
    .await?;
    rows.into_iter().map(snapshot_from_row).collect()
}

// ── Metric reads ─────────────────────────────────────────────

pub(super) async fn metrics_with_rate_in_window(
    conn: &mut SqliteConnection,
    window: TimeWindow,
) -> Result<Vec<Metric>, StoreError> {
    let rows: Vec<MetricRow> = sqlx::query_as(
        "SELECT id, recorded_at, cross_asset_rate, tags, is_anomaly, excluded_signal_count
         FROM analytics_metrics
         WHERE recorded_at >= ?1 AND recorded_at < ?2 AND cross_asset_rate IS NOT NULL
         ORDER BY recorded_at DESC, id DESC",
    )
    .bind(window.start.timestamp())
    .bind(window.end.timestamp())
    .fetch_all(&mut *conn)
    .await?;
    rows.into_iter().map(metric_from_row).collect()
}

// ── Writes ───────────────────────────────────────────────────

pub(super) async fn insert_snapshot(
    pool: &SqlitePool,
    snapshot: &Snapshot,
) -> Result<(), StoreError> {
    let block_height = snapshot
        .block_height
        .map(i64::try_from)
        .transpose()
        .map_err(|e| StoreError::Query(format!("block height out of range: {e}")))?;

    sqlx::query(
        "INSERT INTO whale_snapshots (entity_id, balance, recorded_at, block_height)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&snapshot.entity_id)
    .bind(snapshot.balance)
    .bind(snapshot.timestamp.timestamp())
    .bind(block_height)
    .execute(pool)
    .await?;
    Ok(())
}

pub(super) async fn insert_metric(pool: &SqlitePool, metric: &Metric) -> Result<i64, StoreError> {
    let tags = serde_json::to_string(&metric.tags)
        .map_err(|e| StoreError::Query(format!("encode metric tags: {e}")))?;

    let result = sqlx::query(
        "INSERT INTO analytics_metrics
            (recorded_at, cross_asset_rate, tags, is_anomaly, excluded_signal_count)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(metric.timestamp.timestamp())
    .bind(metric.cross_asset_rate)
    .bind(tags)
    .bind(metric.is_anomaly)
    .bind(i64::from(metric.excluded_signal_count))
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub(super) async fn health_check(pool: &SqlitePool) -> bool {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool)
        .await
        .is_ok()
}
