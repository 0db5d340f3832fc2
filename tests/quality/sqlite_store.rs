use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use whalewatch::gate::{CircuitBreakerGate, DATA_QUALITY_WARNING_TAG};
use whalewatch::quality::{HealthStatus, Validator};
use whalewatch::store::{
    Metric, MetricStore, MetricWriter, Snapshot, SnapshotStore, SqliteStore, TimeWindow,
};

use crate::quality_harness::{RateAnalysis, RecordingSink, seed_hourly};

#[tokio::test]
async fn degraded_scenario_against_sqlite() {
    let store = SqliteStore::in_memory().await.unwrap();
    let now = Utc::now();
    seed_hourly(&store, 100, 22, now).await;
    // first whale nearly doubles within the last hour
    let whale = format!("0x{:040x}", 0);
    store
        .record_snapshot(&Snapshot::new(whale.as_str(), 1_900.0, now - Duration::seconds(20)))
        .await
        .unwrap();

    let session = store.session().await.unwrap();
    let mut validator = Validator::new(session);
    let report = validator.run_all_checks().await;
    drop(validator);

    assert_eq!(report.check("density").unwrap().status, HealthStatus::Healthy);
    assert_eq!(report.check("outliers").unwrap().status, HealthStatus::Degraded);
    assert!(report.check("outliers").unwrap().issues[0].contains(&whale));
    assert_eq!(report.overall_status, HealthStatus::Degraded);
    assert!((report.overall_score - 79.0).abs() < 1e-9);

    let mut gate = CircuitBreakerGate::new(Arc::new(RecordingSink::default()));
    let run = gate
        .run_gated(report, &RateAnalysis::new(1.002), &store)
        .await
        .unwrap();
    assert!(run.metric.is_anomaly);

    // the persisted rate now feeds the next cycle's rate check
    let session = store.session().await.unwrap();
    let report = Validator::new(session)
        .run_all_checks_at(Utc::now() + Duration::minutes(1))
        .await;
    let rate = report.check("rate_consistency").unwrap();
    assert_eq!(rate.status, HealthStatus::Healthy);
    assert!((rate.metrics["sampled_metrics"] - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn on_disk_store_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let db_path = tmp.path().join("data").join("whales.db");
    let now = Utc::now();

    let store = SqliteStore::open(&db_path).await.unwrap();
    store
        .record_snapshot(
            &Snapshot::new("0xaaa", 12.5, now - Duration::minutes(5)).with_block_height(21_000_000),
        )
        .await
        .unwrap();
    let metric = Metric::new(now - Duration::minutes(4))
        .with_rate(0.97)
        .with_tag("lst_flow")
        .with_tag(DATA_QUALITY_WARNING_TAG);
    let id = store.persist_metric(&metric).await.unwrap();
    drop(store);

    let store = SqliteStore::open(&db_path).await.unwrap();
    let mut session = store.session().await.unwrap();
    let window = TimeWindow::lookback(now, 24);

    let metrics = session.metrics_with_rate_in_window(window).await.unwrap();
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].id, Some(id));
    assert_eq!(metrics[0].tags, vec!["lst_flow", DATA_QUALITY_WARNING_TAG]);
    assert_eq!(metrics[0].cross_asset_rate, Some(0.97));

    let samples = session
        .recent_snapshots_with_block_height(window, 10)
        .await
        .unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].block_height, Some(21_000_000));
}

#[tokio::test]
async fn empty_database_is_critical_on_density() {
    let tmp = TempDir::new().unwrap();
    let store = SqliteStore::open(&tmp.path().join("empty.db")).await.unwrap();
    let report = Validator::new(store.session().await.unwrap())
        .run_all_checks()
        .await;

    let density = report.check("density").unwrap();
    assert_eq!(density.status, HealthStatus::Critical);
    assert!((density.score - 50.0).abs() < f64::EPSILON);
    assert!(density.issues[0].contains("no snapshots"));
    assert_eq!(report.overall_status, HealthStatus::Critical);
}
