//! Operator alert texts emitted by the gate.

use crate::quality::{HealthReport, HealthStatus};
use std::fmt::Write;

const REMEDIATION_STEPS: [&str; 3] = [
    "Re-run the snapshot collector for the lookback window and confirm it completes",
    "Check RPC node connectivity and rate limits for the collector",
    "Inspect the snapshot store for gaps, failed writes or a full disk",
];

fn list_checks(out: &mut String, report: &HealthReport, status: HealthStatus) {
    for check in report.checks_with_status(status) {
        let _ = writeln!(out, "• {} ({:.1}/100)", check.name, check.score);
        for issue in &check.issues {
            let _ = writeln!(out, "  - {issue}");
        }
    }
}

/// High-priority abort alert: every critical check's issues plus remediation.
pub fn critical_alert(report: &HealthReport) -> String {
    let mut out = format!(
        "CIRCUIT BREAKER OPEN: data quality critical (score {:.2}/100)\n\
         Analysis halted, no metric will be persisted this cycle.\n\nCritical checks:\n",
        report.overall_score
    );
    list_checks(&mut out, report, HealthStatus::Critical);
    out.push_str("\nRemediation:\n");
    for (i, step) in REMEDIATION_STEPS.iter().enumerate() {
        let _ = writeln!(out, "{}. {step}", i + 1);
    }
    out.trim_end().to_string()
}

pub fn degraded_alert(report: &HealthReport) -> String {
    let mut out = format!(
        "Data quality degraded (score {:.2}/100)\n\
         Analysis proceeds; its metric is flagged anomalous with {} signal(s) excluded.\n\n\
         Degraded checks:\n",
        report.overall_score, report.summary.warnings
    );
    list_checks(&mut out, report, HealthStatus::Degraded);
    out.trim_end().to_string()
}

pub fn transition_alert(previous: HealthStatus, report: &HealthReport) -> String {
    format!(
        "Data quality status changed: {} {previous} -> {} {} (score {:.2}/100)",
        previous.icon(),
        report.overall_status.icon(),
        report.overall_status,
        report.overall_score
    )
}
