use super::{CheckContext, CheckKind, preview};
use crate::error::StoreError;
use crate::quality::types::{CheckResult, HealthStatus};
use crate::store::SnapshotStore;
use chrono::{DateTime, Utc};

/// More affected entities than this is critical.
const MAX_DEGRADED_ENTITIES: usize = 5;

pub(super) async fn run<S>(store: &mut S, ctx: &CheckContext) -> Result<CheckResult, StoreError>
where
    S: SnapshotStore + ?Sized,
{
    let zero_balances = store.snapshots_with_zero_balance(ctx.window).await?;
    let result = evaluate(&zero_balances, ctx.now);
    tracing::debug!(
        affected = zero_balances.len(),
        status = %result.status,
        "precision check finished"
    );
    Ok(result)
}

/// A zero balance is the signature of an upstream batch read that returned
/// null instead of failing.
#[allow(clippy::cast_precision_loss)]
fn evaluate(zero_balances: &[(String, u64)], now: DateTime<Utc>) -> CheckResult {
    let affected = zero_balances.len();
    let zero_snapshots: u64 = zero_balances.iter().map(|(_, count)| count).sum();

    let base = |status, score| {
        CheckResult::new(CheckKind::Precision.name(), status, score, now)
            .with_metric("zero_balance_entities", affected as f64)
            .with_metric("zero_balance_snapshots", zero_snapshots as f64)
    };

    match affected {
        0 => base(HealthStatus::Healthy, 100.0),
        1..=MAX_DEGRADED_ENTITIES => {
            base(HealthStatus::Degraded, 70.0).with_issues(zero_balances.iter().map(
                |(entity, count)| {
                    format!(
                        "Entity {entity} reported a zero balance {count} time(s): \
                         possible failed batch read"
                    )
                },
            ))
        }
        _ => base(HealthStatus::Critical, 30.0).with_issue(format!(
            "{affected} entities reported zero balances ({}): \
             batch reads are likely failing upstream",
            preview(zero_balances.iter().map(|(entity, _)| entity), 3)
        )),
    }
}
