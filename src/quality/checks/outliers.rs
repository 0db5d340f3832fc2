use super::{CheckContext, CheckKind};
use crate::error::StoreError;
use crate::quality::types::{CheckResult, HealthStatus};
use crate::store::{Snapshot, SnapshotStore};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

const OUTLIER_CHANGE_PCT: f64 = 50.0;
const MAX_DEGRADED_OUTLIERS: usize = 3;
const LISTED_OUTLIERS: usize = 3;

pub(super) async fn run<S>(store: &mut S, ctx: &CheckContext) -> Result<CheckResult, StoreError>
where
    S: SnapshotStore + ?Sized,
{
    let recent_start = ctx.now - Duration::hours(1);
    let previous_start = ctx.now - Duration::hours(2);

    let recent = store.snapshots_in_bucket(recent_start, ctx.now).await?;
    let previous = store.snapshots_in_bucket(previous_start, recent_start).await?;
    let result = evaluate(&previous, &recent, ctx.now);
    tracing::debug!(
        recent = recent.len(),
        previous = previous.len(),
        status = %result.status,
        "outlier check finished"
    );
    Ok(result)
}

#[derive(Debug, Clone, PartialEq)]
struct Outlier<'a> {
    entity_id: &'a str,
    before: f64,
    after: f64,
    change_pct: f64,
}

impl std::fmt::Display for Outlier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: balance {:.4} -> {:.4} ({:.1}% in one hour)",
            self.entity_id, self.before, self.after, self.change_pct
        )
    }
}

/// Latest balance per entity within one bucket.
fn latest_balances(snapshots: &[Snapshot]) -> BTreeMap<&str, (DateTime<Utc>, f64)> {
    let mut latest: BTreeMap<&str, (DateTime<Utc>, f64)> = BTreeMap::new();
    for s in snapshots {
        latest
            .entry(s.entity_id.as_str())
            .and_modify(|(at, balance)| {
                if s.timestamp >= *at {
                    *at = s.timestamp;
                    *balance = s.balance;
                }
            })
            .or_insert((s.timestamp, s.balance));
    }
    latest
}

#[allow(clippy::float_cmp)]
fn find_outliers<'a>(
    previous: &'a [Snapshot],
    recent: &'a [Snapshot],
) -> (usize, Vec<Outlier<'a>>) {
    let before = latest_balances(previous);
    let after = latest_balances(recent);

    let mut compared = 0;
    let mut outliers = Vec::new();
    for (entity_id, (_, old)) in &before {
        // a zero baseline has no meaningful percentage change
        if *old == 0.0 {
            continue;
        }
        let Some((_, new)) = after.get(entity_id) else {
            continue;
        };
        compared += 1;
        let change_pct = (new - old).abs() / old.abs() * 100.0;
        if change_pct > OUTLIER_CHANGE_PCT {
            outliers.push(Outlier {
                entity_id: *entity_id,
                before: *old,
                after: *new,
                change_pct,
            });
        }
    }
    (compared, outliers)
}

#[allow(clippy::cast_precision_loss)]
fn evaluate(previous: &[Snapshot], recent: &[Snapshot], now: DateTime<Utc>) -> CheckResult {
    let (compared, outliers) = find_outliers(previous, recent);

    let base = |status, score| {
        CheckResult::new(CheckKind::Outliers.name(), status, score, now)
            .with_metric("entities_compared", compared as f64)
            .with_metric("outliers", outliers.len() as f64)
    };

    match outliers.len() {
        0 => base(HealthStatus::Healthy, 100.0),
        1..=MAX_DEGRADED_OUTLIERS => base(HealthStatus::Degraded, 70.0)
            .with_issues(outliers.iter().map(ToString::to_string)),
        total => base(HealthStatus::Critical, 30.0)
            .with_issues(outliers.iter().take(LISTED_OUTLIERS).map(ToString::to_string))
            .with_issue(format!(
                "{total} entities changed balance by more than {OUTLIER_CHANGE_PCT}% within one hour"
            )),
    }
}
