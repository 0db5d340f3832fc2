use chrono::Utc;
use serde_json::Value;

use whalewatch::quality::{CheckResult, HealthAggregator, HealthReport, HealthStatus};

fn sample_report() -> HealthReport {
    let now = Utc::now();
    let checks = vec![
        CheckResult::new("density", HealthStatus::Healthy, 100.0, now)
            .with_metric("density_pct", 91.67),
        CheckResult::new("drift", HealthStatus::Degraded, 75.0, now)
            .with_issue("Average timestamp drift 6.94%"),
        CheckResult::new("precision", HealthStatus::Critical, 30.0, now)
            .with_issue("7 entities reported zero balances"),
    ];
    HealthAggregator::default().build_report(checks, now)
}

#[test]
fn json_has_exactly_the_documented_fields() {
    let json: Value = serde_json::from_str(&sample_report().to_json_pretty().unwrap()).unwrap();

    let mut top: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    top.sort();
    assert_eq!(
        top,
        ["checks", "overall_score", "overall_status", "summary", "timestamp"]
    );

    let mut check_keys: Vec<_> = json["checks"][0].as_object().unwrap().keys().cloned().collect();
    check_keys.sort();
    assert_eq!(
        check_keys,
        ["check_name", "issues", "metrics", "score", "status", "timestamp"]
    );

    let mut summary_keys: Vec<_> = json["summary"].as_object().unwrap().keys().cloned().collect();
    summary_keys.sort();
    assert_eq!(
        summary_keys,
        [
            "checks_failed",
            "checks_passed",
            "critical_issues",
            "total_issues",
            "warnings"
        ]
    );

    assert_eq!(json["overall_status"], "critical");
    assert_eq!(json["checks"][1]["status"], "degraded");
    assert_eq!(json["checks"][0]["metrics"]["density_pct"], 91.67);
}

#[test]
fn round_trip_preserves_status_and_score() {
    let report = sample_report();
    let parsed: HealthReport = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();

    assert_eq!(parsed.overall_status, report.overall_status);
    assert!((parsed.overall_score - report.overall_score).abs() < f64::EPSILON);
    assert_eq!(parsed.summary, report.summary);
    assert_eq!(parsed.checks[2].name, "precision");
}

#[test]
fn status_strings_are_lowercase_and_map_to_exit_codes() {
    for (status, text, code) in [
        (HealthStatus::Healthy, "\"healthy\"", 0),
        (HealthStatus::Degraded, "\"degraded\"", 1),
        (HealthStatus::Critical, "\"critical\"", 2),
    ] {
        assert_eq!(serde_json::to_string(&status).unwrap(), text);
        assert_eq!(serde_json::from_str::<HealthStatus>(text).unwrap(), status);
        assert_eq!(status.exit_code(), code);
    }
    assert!(serde_json::from_str::<HealthStatus>("\"HEALTHY\"").is_err());
}

#[test]
fn score_is_deterministic_and_bounded() {
    let report = sample_report();
    let aggregator = HealthAggregator::default();
    let first = aggregator.overall_score(&report.checks);
    for _ in 0..100 {
        assert!((aggregator.overall_score(&report.checks) - first).abs() < f64::EPSILON);
    }
    assert!((0.0..=100.0).contains(&first));
}
