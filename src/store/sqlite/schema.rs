use crate::error::StoreError;
use sqlx::SqlitePool;

pub(super) async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::raw_sql(
        "-- Balance observations written by the collector
        CREATE TABLE IF NOT EXISTS whale_snapshots (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            entity_id    TEXT NOT NULL,
            balance      REAL NOT NULL,
            recorded_at  INTEGER NOT NULL,
            block_height INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_whale_snapshots_recorded
            ON whale_snapshots(recorded_at DESC);
        CREATE INDEX IF NOT EXISTS idx_whale_snapshots_entity
            ON whale_snapshots(entity_id, recorded_at DESC);

        -- Analytics output written behind the circuit breaker
        CREATE TABLE IF NOT EXISTS analytics_metrics (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            recorded_at           INTEGER NOT NULL,
            cross_asset_rate      REAL,
            tags                  TEXT NOT NULL DEFAULT '[]',
            is_anomaly            INTEGER NOT NULL DEFAULT 0,
            excluded_signal_count INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_analytics_metrics_recorded
            ON analytics_metrics(recorded_at DESC);",
    )
    .execute(pool)
    .await
    .map_err(|e| StoreError::Migration(e.to_string()))?;

    Ok(())
}
