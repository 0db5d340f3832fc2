use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Health classification shared by checks and the overall report.
///
/// Ordered by severity, so `max()` over a set of statuses yields the worst.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Critical,
}

impl HealthStatus {
    /// Process exit code for CLI wrappers: 0 healthy, 1 degraded, 2 critical.
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Healthy => 0,
            Self::Degraded => 1,
            Self::Critical => 2,
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Healthy => "✅",
            Self::Degraded => "⚠️",
            Self::Critical => "❌",
        }
    }
}

/// Outcome of one check execution. Built once, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    #[serde(rename = "check_name")]
    pub name: String,
    pub status: HealthStatus,
    pub score: f64,
    pub issues: Vec<String>,
    pub metrics: BTreeMap<String, f64>,
    pub timestamp: DateTime<Utc>,
}

impl CheckResult {
    pub fn new(
        name: impl Into<String>,
        status: HealthStatus,
        score: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            score: score.clamp(0.0, 100.0),
            issues: Vec::new(),
            metrics: BTreeMap::new(),
            timestamp,
        }
    }

    /// Synthetic result for a check whose store query failed.
    pub fn store_failure(
        name: impl Into<String>,
        err: &StoreError,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self::new(name, HealthStatus::Critical, 0.0, timestamp)
            .with_issue(format!("Check failed: {err}"))
    }

    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.issues.push(issue.into());
        self
    }

    pub fn with_issues<I, S>(mut self, issues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issues.extend(issues.into_iter().map(Into::into));
        self
    }

    pub fn with_metric(mut self, key: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub total_issues: usize,
    pub critical_issues: usize,
    pub warnings: usize,
    pub checks_passed: usize,
    pub checks_failed: usize,
}

/// Aggregated result of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub overall_score: f64,
    pub checks: Vec<CheckResult>,
    pub summary: HealthSummary,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn checks_with_status(
        &self,
        status: HealthStatus,
    ) -> impl Iterator<Item = &CheckResult> + '_ {
        self.checks.iter().filter(move |c| c.status == status)
    }

    pub const fn exit_code(&self) -> u8 {
        self.overall_status.exit_code()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
