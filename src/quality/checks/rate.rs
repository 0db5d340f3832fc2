use super::{CheckContext, CheckKind};
use crate::error::StoreError;
use crate::quality::types::{CheckResult, HealthStatus};
use crate::store::{Metric, MetricStore};
use chrono::{DateTime, Utc};

const MAX_DEGRADED_VIOLATIONS: usize = 2;
const LISTED_VIOLATIONS: usize = 3;

pub(super) async fn run<S>(store: &mut S, ctx: &CheckContext) -> Result<CheckResult, StoreError>
where
    S: MetricStore + ?Sized,
{
    let metrics = store.metrics_with_rate_in_window(ctx.window).await?;
    let bounds = (ctx.settings.rate_lower_bound, ctx.settings.rate_upper_bound);
    let result = evaluate(&metrics, bounds, ctx.now);
    tracing::debug!(
        sampled = metrics.len(),
        status = %result.status,
        "rate consistency check finished"
    );
    Ok(result)
}

fn describe_violation(rate: f64, at: DateTime<Utc>, (lower, upper): (f64, f64)) -> String {
    format!(
        "Cross-asset rate {rate:.4} at {} outside [{lower:.2}, {upper:.2}]: \
         risk tag blocked for this metric",
        at.format("%Y-%m-%d %H:%M UTC")
    )
}

#[allow(clippy::cast_precision_loss)]
fn evaluate(metrics: &[Metric], bounds: (f64, f64), now: DateTime<Utc>) -> CheckResult {
    let (lower, upper) = bounds;
    let rates: Vec<(f64, DateTime<Utc>)> = metrics
        .iter()
        .filter_map(|m| m.cross_asset_rate.map(|rate| (rate, m.timestamp)))
        .collect();

    if rates.is_empty() {
        return CheckResult::new(
            CheckKind::RateConsistency.name(),
            HealthStatus::Degraded,
            50.0,
            now,
        )
        .with_metric("sampled_metrics", 0.0)
        .with_issue("no cross-asset rate samples in the lookback window");
    }

    let violations: Vec<&(f64, DateTime<Utc>)> = rates
        .iter()
        .filter(|(rate, _)| !(lower..=upper).contains(rate))
        .collect();
    let min_rate = rates.iter().map(|(r, _)| *r).fold(f64::INFINITY, f64::min);
    let max_rate = rates.iter().map(|(r, _)| *r).fold(f64::NEG_INFINITY, f64::max);

    let base = |status, score| {
        CheckResult::new(CheckKind::RateConsistency.name(), status, score, now)
            .with_metric("sampled_metrics", rates.len() as f64)
            .with_metric("violations", violations.len() as f64)
            .with_metric("min_rate", min_rate)
            .with_metric("max_rate", max_rate)
    };

    match violations.len() {
        0 => base(HealthStatus::Healthy, 100.0),
        1..=MAX_DEGRADED_VIOLATIONS => base(HealthStatus::Degraded, 70.0).with_issues(
            violations
                .iter()
                .map(|(rate, at)| describe_violation(*rate, *at, bounds)),
        ),
        total => base(HealthStatus::Critical, 30.0)
            .with_issues(
                violations
                    .iter()
                    .take(LISTED_VIOLATIONS)
                    .map(|(rate, at)| describe_violation(*rate, *at, bounds)),
            )
            .with_issue(format!(
                "{total} of {} rate samples outside [{lower:.2}, {upper:.2}]: possible de-peg",
                rates.len()
            )),
    }
}
