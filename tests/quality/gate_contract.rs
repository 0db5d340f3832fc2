use std::sync::Arc;

use chrono::Utc;

use whalewatch::error::GateError;
use whalewatch::gate::{CircuitBreakerGate, GateDecision};
use whalewatch::quality::{CheckResult, HealthAggregator, HealthReport, HealthStatus};

use crate::quality_harness::{RateAnalysis, RecordingSink, RecordingWriter};

fn report(statuses: &[HealthStatus]) -> HealthReport {
    let now = Utc::now();
    let names = ["density", "precision", "drift", "outliers", "rate_consistency"];
    let checks = names
        .iter()
        .zip(statuses)
        .map(|(name, status)| {
            let score = if *status == HealthStatus::Healthy { 100.0 } else { 40.0 };
            CheckResult::new(*name, *status, score, now).with_issue(format!("{name} {status}"))
        })
        .collect();
    HealthAggregator::default().build_report(checks, now)
}

/// Every mix of statuses containing a critical check: no metric is written.
#[tokio::test]
async fn no_write_for_any_report_with_a_critical_check() {
    use HealthStatus::{Critical, Degraded, Healthy};
    let all = [Healthy, Degraded, Critical];

    let writer = RecordingWriter::default();
    let analysis = RateAnalysis::new(1.0);
    let mut gate = CircuitBreakerGate::new(Arc::new(RecordingSink::default()));

    let mut aborted = 0;
    for a in all {
        for b in all {
            for c in all {
                let statuses = [a, b, c, Healthy, Healthy];
                if !statuses.contains(&Critical) {
                    continue;
                }
                let result = gate
                    .run_gated(report(&statuses), &analysis, &writer)
                    .await;
                match result {
                    Err(GateError::CircuitOpen { report }) => {
                        assert_eq!(report.overall_status, Critical);
                        aborted += 1;
                    }
                    other => panic!("expected circuit open for {statuses:?}, got {other:?}"),
                }
            }
        }
    }

    assert_eq!(aborted, 19);
    assert_eq!(writer.count(), 0);
    assert_eq!(analysis.calls(), 0);
}

#[tokio::test]
async fn critical_overrides_perfect_scores_elsewhere() {
    use HealthStatus::{Critical, Healthy};
    let report = report(&[Healthy, Healthy, Healthy, Healthy, Critical]);
    assert_eq!(report.overall_status, Critical);
    assert!(report.overall_score > 90.0);

    let mut gate = CircuitBreakerGate::new(Arc::new(RecordingSink::default()));
    assert_eq!(gate.evaluate(&report).await, GateDecision::Abort);
}

#[tokio::test]
async fn recovery_resumes_writes() {
    use HealthStatus::{Critical, Healthy};
    let sink = Arc::new(RecordingSink::default());
    let mut gate = CircuitBreakerGate::new(sink.clone());
    let analysis = RateAnalysis::new(1.0);
    let writer = RecordingWriter::default();

    assert!(
        gate.run_gated(report(&[Critical; 5]), &analysis, &writer)
            .await
            .is_err()
    );
    let run = gate
        .run_gated(report(&[Healthy; 5]), &analysis, &writer)
        .await
        .unwrap();

    assert_eq!(run.decision, GateDecision::Proceed);
    assert!(!run.metric.is_anomaly);
    assert_eq!(writer.count(), 1);
    // critical alert, then the recovery transition
    let alerts = sink.sent();
    assert_eq!(alerts.len(), 2);
    assert!(alerts[1].0.contains("-> ✅ healthy"));
}
