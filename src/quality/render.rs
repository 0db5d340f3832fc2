use super::types::HealthReport;
use std::fmt::Write;

/// Operator-facing text rendering of a report, as printed by `validate`.
pub fn render_report(report: &HealthReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} Data quality: {} (score {:.2}/100)",
        report.overall_status.icon(),
        report.overall_status.to_string().to_uppercase(),
        report.overall_score
    );
    let _ = writeln!(
        out,
        "   checked at {}",
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out.push('\n');

    for check in &report.checks {
        let _ = writeln!(
            out,
            "{} {:<18} {:>6.1}  {}",
            check.status.icon(),
            check.name,
            check.score,
            check.status
        );
        for issue in &check.issues {
            let _ = writeln!(out, "     - {issue}");
        }
    }

    let s = &report.summary;
    let _ = write!(
        out,
        "\n{} passed, {} failed, {} issues ({} critical, {} warnings)",
        s.checks_passed, s.checks_failed, s.total_issues, s.critical_issues, s.warnings
    );
    out
}
