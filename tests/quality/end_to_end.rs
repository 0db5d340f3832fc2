use std::sync::Arc;

use chrono::Utc;

use whalewatch::alerts::AlertPriority;
use whalewatch::gate::{CircuitBreakerGate, DATA_QUALITY_WARNING_TAG, GateDecision};
use whalewatch::quality::{HealthStatus, Validator};

use crate::quality_harness::{
    RateAnalysis, RecordingSink, RecordingWriter, ScriptedStore, balance_move,
};

/// 100 entities with 2200 of 2400 expected snapshots, one whale moving 80%
/// in an hour, no block numbers and no rate samples.
fn degraded_week_store() -> (ScriptedStore, chrono::DateTime<Utc>) {
    let now = Utc::now();
    let mut bucket_snapshots = Vec::new();
    bucket_snapshots.extend(balance_move("0xwhale", 10_000.0, 18_000.0, now));
    bucket_snapshots.extend(balance_move("0xsteady", 500.0, 510.0, now));

    let store = ScriptedStore {
        entities: 100,
        snapshots: 2200,
        bucket_snapshots,
        ..ScriptedStore::default()
    };
    (store, now)
}

#[tokio::test]
async fn degraded_scenario_scores_79_and_flags_metric() {
    let (store, now) = degraded_week_store();
    let report = Validator::new(store).run_all_checks_at(now).await;

    let statuses: Vec<_> = report
        .checks
        .iter()
        .map(|c| (c.name.as_str(), c.status, c.score))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("density", HealthStatus::Healthy, 100.0),
            ("precision", HealthStatus::Healthy, 100.0),
            ("drift", HealthStatus::Degraded, 50.0),
            ("outliers", HealthStatus::Degraded, 70.0),
            ("rate_consistency", HealthStatus::Degraded, 50.0),
        ]
    );
    assert_eq!(report.overall_status, HealthStatus::Degraded);
    assert!((report.overall_score - 79.0).abs() < 1e-9);
    assert_eq!(report.summary.warnings, 3);
    assert_eq!(report.summary.checks_passed, 2);
    assert_eq!(report.exit_code(), 1);

    let sink = Arc::new(RecordingSink::default());
    let mut gate = CircuitBreakerGate::new(sink.clone());
    let analysis = RateAnalysis::new(1.002);
    let writer = RecordingWriter::default();

    let run = gate.run_gated(report, &analysis, &writer).await.unwrap();

    assert_eq!(
        run.decision,
        GateDecision::ProceedDegraded {
            excluded_signals: 3
        }
    );
    let written = writer.written.lock().unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].is_anomaly);
    assert_eq!(written[0].tags.last().map(String::as_str), Some(DATA_QUALITY_WARNING_TAG));
    assert_eq!(written[0].excluded_signal_count, 3);

    let alerts = sink.sent();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].1, AlertPriority::Normal);
    assert!(alerts[0].0.contains("0xwhale"));
}

#[tokio::test]
async fn unreachable_store_aborts_with_full_report() {
    let store = ScriptedStore {
        unreachable: true,
        ..ScriptedStore::default()
    };
    let report = Validator::new(store).run_all_checks().await;
    assert_eq!(report.checks.len(), 5);
    for check in &report.checks {
        assert_eq!(check.status, HealthStatus::Critical, "{}", check.name);
        assert_eq!(
            check.issues,
            vec!["Check failed: connection failed: database is locked".to_string()]
        );
    }

    let sink = Arc::new(RecordingSink::default());
    let mut gate = CircuitBreakerGate::new(sink.clone());
    let analysis = RateAnalysis::new(1.0);
    let writer = RecordingWriter::default();

    let err = gate.run_gated(report, &analysis, &writer).await.unwrap_err();
    let aborted = err.report().expect("abort carries the report");
    assert_eq!(aborted.summary.checks_failed, 5);
    assert_eq!(aborted.exit_code(), 2);
    assert_eq!(analysis.calls(), 0);
    assert_eq!(writer.count(), 0);

    let alerts = sink.sent();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].1, AlertPriority::High);
    assert!(alerts[0].0.contains("database is locked"));
    assert!(alerts[0].0.contains("Remediation"));
}
