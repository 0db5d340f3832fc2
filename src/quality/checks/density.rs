use super::{CheckContext, CheckKind};
use crate::error::StoreError;
use crate::quality::types::{CheckResult, HealthStatus};
use crate::store::SnapshotStore;
use chrono::{DateTime, Utc};

const HEALTHY_DENSITY_PCT: f64 = 85.0;
const DEGRADED_DENSITY_PCT: f64 = 70.0;

pub(super) async fn run<S>(store: &mut S, ctx: &CheckContext) -> Result<CheckResult, StoreError>
where
    S: SnapshotStore + ?Sized,
{
    let entities = store.count_distinct_entities(ctx.window).await?;
    let snapshots = store.count_snapshots(ctx.window).await?;
    let result = evaluate(entities, snapshots, ctx.window.hours(), ctx.now);
    tracing::debug!(
        entities,
        snapshots,
        status = %result.status,
        "density check finished"
    );
    Ok(result)
}

#[allow(clippy::cast_precision_loss)]
fn evaluate(entities: u64, snapshots: u64, hours: u64, now: DateTime<Utc>) -> CheckResult {
    let expected = entities.saturating_mul(hours);
    let density = if expected == 0 {
        0.0
    } else {
        snapshots as f64 * 100.0 / expected as f64
    };

    let base = |status, score| {
        CheckResult::new(CheckKind::Density.name(), status, score, now)
            .with_metric("unique_entities", entities as f64)
            .with_metric("total_snapshots", snapshots as f64)
            .with_metric("expected_snapshots", expected as f64)
            .with_metric("density_pct", density)
    };

    if expected == 0 {
        return base(HealthStatus::Critical, 50.0)
            .with_issue(format!("no snapshots found in the last {hours}h"));
    }

    let missing = expected.saturating_sub(snapshots);
    if density >= HEALTHY_DENSITY_PCT {
        base(HealthStatus::Healthy, 100.0)
    } else if density >= DEGRADED_DENSITY_PCT {
        base(HealthStatus::Degraded, 75.0).with_issue(format!(
            "Snapshot density {density:.1}% below {HEALTHY_DENSITY_PCT}% target: \
             {missing} of {expected} expected snapshots missing"
        ))
    } else {
        base(HealthStatus::Critical, 50.0).with_issue(format!(
            "Snapshot density {density:.1}% below {DEGRADED_DENSITY_PCT}%: \
             {missing} snapshots missing, historical deltas are unreliable"
        ))
    }
}
