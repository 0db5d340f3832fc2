//! Folds per-check results into the overall status, weighted score and
//! issue summary.

use super::checks::CheckKind;
use super::types::{CheckResult, HealthReport, HealthStatus, HealthSummary};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Weight applied to checks with no entry in the weight table.
pub const DEFAULT_CHECK_WEIGHT: f64 = 0.20;

/// Pure, deterministic scorer over a list of check results.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthAggregator {
    weights: BTreeMap<String, f64>,
    default_weight: f64,
}

impl Default for HealthAggregator {
    fn default() -> Self {
        let weights = CheckKind::ALL
            .iter()
            .map(|kind| (kind.name().to_string(), kind.weight()))
            .collect();
        Self {
            weights,
            default_weight: DEFAULT_CHECK_WEIGHT,
        }
    }
}

impl HealthAggregator {
    pub fn with_weight(mut self, check_name: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(check_name.into(), weight.max(0.0));
        self
    }

    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = weight.max(0.0);
        self
    }

    pub fn weight_for(&self, check_name: &str) -> f64 {
        self.weights
            .get(check_name)
            .copied()
            .unwrap_or(self.default_weight)
    }

    /// Critical if any check is critical, degraded if any is degraded,
    /// otherwise healthy.
    pub fn overall_status(checks: &[CheckResult]) -> HealthStatus {
        checks
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(HealthStatus::Healthy)
    }

    /// `Σ(score × weight) / Σ(weight)` over the checks present, rounded to two
    /// decimals and kept within `[0, 100]`.
    pub fn overall_score(&self, checks: &[CheckResult]) -> f64 {
        let (weighted, total_weight) = checks.iter().fold((0.0, 0.0), |(sum, total), c| {
            let weight = self.weight_for(&c.name);
            (sum + c.score * weight, total + weight)
        });

        if total_weight <= 0.0 {
            return 0.0;
        }

        let score = ((weighted / total_weight) * 100.0).round() / 100.0;
        score.clamp(0.0, 100.0)
    }

    pub fn summarize(checks: &[CheckResult]) -> HealthSummary {
        checks
            .iter()
            .fold(HealthSummary::default(), |mut summary, c| {
                summary.total_issues += c.issues.len();
                match c.status {
                    HealthStatus::Critical => {
                        summary.critical_issues += c.issues.len();
                        summary.checks_failed += 1;
                    }
                    HealthStatus::Degraded => summary.warnings += c.issues.len(),
                    HealthStatus::Healthy => summary.checks_passed += 1,
                }
                summary
            })
    }

    pub fn build_report(&self, checks: Vec<CheckResult>, timestamp: DateTime<Utc>) -> HealthReport {
        HealthReport {
            overall_status: Self::overall_status(&checks),
            overall_score: self.overall_score(&checks),
            summary: Self::summarize(&checks),
            checks,
            timestamp,
        }
    }
}
