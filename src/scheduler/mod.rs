//! Periodic validation loop for `watch` mode.

use crate::config::Config;
use crate::error::{GateError, WhaleError};
use crate::gate::{Analysis, CircuitBreakerGate, GateDecision, GatedRun};
use crate::quality::{HealthReport, Validator};
use crate::store::{MetricWriter, SqliteStore};
use anyhow::Result;
use std::sync::Arc;
use tokio::time::{self, Duration};

const SECS_PER_HOUR: u64 = 3600;

/// Analysis step and metric sink run behind the gate on every cycle.
#[derive(Clone)]
pub struct Downstream {
    pub analysis: Arc<dyn Analysis>,
    pub writer: Arc<dyn MetricWriter>,
}

#[derive(Debug)]
pub enum CycleOutcome {
    /// Gate evaluated with no downstream wired.
    Evaluated {
        decision: GateDecision,
        report: HealthReport,
    },
    /// Downstream ran and its metric was persisted.
    Completed(GatedRun),
    /// Circuit breaker opened; nothing downstream ran.
    Aborted(Box<HealthReport>),
}

impl CycleOutcome {
    pub fn report(&self) -> &HealthReport {
        match self {
            Self::Evaluated { report, .. } => report,
            Self::Completed(run) => &run.report,
            Self::Aborted(report) => report,
        }
    }
}

/// One validation cycle: fresh session, all configured checks, then the gate.
///
/// The session is released before the gate runs so downstream writes never
/// wait on it.
pub async fn run_cycle(
    config: &Config,
    store: &SqliteStore,
    gate: &mut CircuitBreakerGate,
    downstream: Option<&Downstream>,
) -> Result<CycleOutcome, WhaleError> {
    let session = store
        .session()
        .await
        .inspect_err(|e| gate.monitor().record_cycle_error(e))?;

    let mut validator = Validator::new(session)
        .with_settings(config.validator.check_settings())
        .with_checks(config.validator.check_kinds());
    let report = validator.run_all_checks().await;
    drop(validator);

    let Some(downstream) = downstream else {
        let decision = gate.evaluate(&report).await;
        if decision == GateDecision::Abort {
            return Ok(CycleOutcome::Aborted(Box::new(report)));
        }
        return Ok(CycleOutcome::Evaluated { decision, report });
    };

    match gate
        .run_gated(report, downstream.analysis.as_ref(), downstream.writer.as_ref())
        .await
    {
        Ok(run) => Ok(CycleOutcome::Completed(run)),
        Err(GateError::CircuitOpen { report }) => Ok(CycleOutcome::Aborted(report)),
        Err(e) => {
            gate.monitor().record_cycle_error(&e);
            Err(e.into())
        }
    }
}

/// Run [`run_cycle`] every `scheduler.interval_hours`, starting immediately.
/// Aborts and cycle errors are logged; the loop only ends with the task.
pub async fn run(
    config: Arc<Config>,
    store: SqliteStore,
    mut gate: CircuitBreakerGate,
    downstream: Option<Downstream>,
) -> Result<()> {
    let hours = u64::from(config.scheduler.interval_hours.max(1));
    let mut interval = time::interval(Duration::from_secs(hours * SECS_PER_HOUR));
    interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    tracing::info!(interval_hours = hours, "validation scheduler started");

    loop {
        interval.tick().await;

        match run_cycle(&config, &store, &mut gate, downstream.as_ref()).await {
            Ok(CycleOutcome::Aborted(report)) => {
                tracing::warn!(
                    score = report.overall_score,
                    "cycle aborted by circuit breaker, analysis skipped"
                );
            }
            Ok(outcome) => {
                tracing::info!(status = %outcome.report().overall_status, "cycle complete");
            }
            Err(e) => tracing::warn!("validation cycle failed: {e}"),
        }
        tracing::debug!(health = %gate.monitor().snapshot_json(), "gate health");
    }
}
