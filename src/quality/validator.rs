use super::aggregate::HealthAggregator;
use super::checks::{CheckContext, CheckKind, CheckSettings};
use super::types::{CheckResult, HealthReport};
use crate::store::QualityStore;
use chrono::{DateTime, Utc};

/// Runs the configured checks one after another against a single store
/// session and aggregates them into a [`HealthReport`].
///
/// The session is owned exclusively: checks never run concurrently on it.
pub struct Validator<S> {
    store: S,
    checks: Vec<CheckKind>,
    settings: CheckSettings,
    aggregator: HealthAggregator,
}

impl<S: QualityStore> Validator<S> {
    /// Validator running all five checks with default settings.
    pub fn new(store: S) -> Self {
        Self {
            store,
            checks: CheckKind::ALL.to_vec(),
            settings: CheckSettings::default(),
            aggregator: HealthAggregator::default(),
        }
    }

    pub fn with_settings(mut self, settings: CheckSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_checks(mut self, checks: impl IntoIterator<Item = CheckKind>) -> Self {
        self.checks = checks.into_iter().collect();
        self
    }

    pub fn with_aggregator(mut self, aggregator: HealthAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn checks(&self) -> &[CheckKind] {
        &self.checks
    }

    /// Give the store session back, e.g. to return it to its pool early.
    pub fn into_store(self) -> S {
        self.store
    }

    pub async fn run_all_checks(&mut self) -> HealthReport {
        self.run_all_checks_at(Utc::now()).await
    }

    /// Run every configured check as of `now`.
    ///
    /// Never fails: a store error inside a check becomes a critical result
    /// for that check and the remaining checks still run.
    pub async fn run_all_checks_at(&mut self, now: DateTime<Utc>) -> HealthReport {
        let ctx = CheckContext::new(now, self.settings);
        let mut results = Vec::with_capacity(self.checks.len());

        for kind in &self.checks {
            let result = match kind.run(&mut self.store, &ctx).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(check = kind.name(), "check failed on store error: {e}");
                    CheckResult::store_failure(kind.name(), &e, now)
                }
            };
            results.push(result);
        }

        let report = self.aggregator.build_report(results, now);
        tracing::info!(
            status = %report.overall_status,
            score = report.overall_score,
            issues = report.summary.total_issues,
            "data quality validation finished"
        );
        report
    }
}
