use super::{CheckContext, CheckKind};
use crate::error::StoreError;
use crate::quality::types::{CheckResult, HealthStatus};
use crate::store::{Snapshot, SnapshotStore};
use chrono::{DateTime, Utc};

const DEGRADED_AVG_DRIFT_PCT: f64 = 5.0;
const CRITICAL_AVG_DRIFT_PCT: f64 = 10.0;
/// A single sample above this counts as high drift.
const HIGH_SAMPLE_DRIFT_PCT: f64 = 10.0;
/// Drift is expressed relative to this many block intervals.
const TOLERANCE_BLOCKS: f64 = 60.0;

pub(super) async fn run<S>(store: &mut S, ctx: &CheckContext) -> Result<CheckResult, StoreError>
where
    S: SnapshotStore + ?Sized,
{
    let samples = store
        .recent_snapshots_with_block_height(ctx.window, ctx.settings.drift_sample_limit)
        .await?;
    let result = evaluate(&samples, ctx.settings.block_interval_secs, ctx.now);
    tracing::debug!(
        samples = samples.len(),
        status = %result.status,
        "drift check finished"
    );
    Ok(result)
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct DriftStats {
    compared: usize,
    avg_pct: f64,
    max_pct: f64,
    high_samples: usize,
}

/// Drift of each sample against the newest one, which is the reference.
///
/// The expected timestamp of a sample is the reference timestamp moved back
/// by `(ref_height - height) × interval` seconds.
#[allow(clippy::cast_precision_loss)]
fn measure(
    reference: (&Snapshot, u64),
    rest: &[(&Snapshot, u64)],
    interval_secs: u32,
) -> DriftStats {
    let (ref_snapshot, ref_height) = reference;
    let interval = f64::from(interval_secs);
    let tolerance_secs = interval * TOLERANCE_BLOCKS;

    let drifts: Vec<f64> = rest
        .iter()
        .map(|(snapshot, height)| {
            let blocks_back = ref_height as f64 - *height as f64;
            let expected_offset = -blocks_back * interval;
            let actual_offset =
                (snapshot.timestamp - ref_snapshot.timestamp).num_milliseconds() as f64 / 1000.0;
            (actual_offset - expected_offset).abs() / tolerance_secs * 100.0
        })
        .collect();

    if drifts.is_empty() {
        return DriftStats::default();
    }

    DriftStats {
        compared: drifts.len(),
        avg_pct: drifts.iter().sum::<f64>() / drifts.len() as f64,
        max_pct: drifts.iter().copied().fold(0.0, f64::max),
        high_samples: drifts.iter().filter(|d| **d > HIGH_SAMPLE_DRIFT_PCT).count(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn evaluate(samples: &[Snapshot], interval_secs: u32, now: DateTime<Utc>) -> CheckResult {
    let heighted: Vec<(&Snapshot, u64)> = samples
        .iter()
        .filter_map(|s| s.block_height.map(|h| (s, h)))
        .collect();

    let Some((reference, rest)) = heighted.split_first() else {
        return CheckResult::new(CheckKind::Drift.name(), HealthStatus::Degraded, 50.0, now)
            .with_metric("samples", 0.0)
            .with_issue("no block-numbered snapshots in the lookback window");
    };

    let stats = measure(*reference, rest, interval_secs);
    let (status, score) = if stats.avg_pct < DEGRADED_AVG_DRIFT_PCT {
        (HealthStatus::Healthy, 100.0)
    } else if stats.avg_pct < CRITICAL_AVG_DRIFT_PCT {
        (HealthStatus::Degraded, 75.0)
    } else {
        (HealthStatus::Critical, 40.0)
    };

    let result = CheckResult::new(CheckKind::Drift.name(), status, score, now)
        .with_metric("samples", heighted.len() as f64)
        .with_metric("avg_drift_pct", stats.avg_pct)
        .with_metric("max_drift_pct", stats.max_pct)
        .with_metric("high_drift_samples", stats.high_samples as f64);

    match status {
        HealthStatus::Healthy => result,
        HealthStatus::Degraded => result.with_issue(format!(
            "Average timestamp drift {:.2}% (max {:.2}%, {} of {} samples above {HIGH_SAMPLE_DRIFT_PCT}%)",
            stats.avg_pct, stats.max_pct, stats.high_samples, stats.compared
        )),
        HealthStatus::Critical => result.with_issue(format!(
            "Average timestamp drift {:.2}% exceeds {CRITICAL_AVG_DRIFT_PCT}%: \
             snapshot timestamps no longer line up with block heights \
             ({} of {} samples above {HIGH_SAMPLE_DRIFT_PCT}%)",
            stats.avg_pct, stats.high_samples, stats.compared
        )),
    }
}
