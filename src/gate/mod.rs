//! Circuit breaker between data-quality validation and downstream analysis.
//!
//! The gate turns a [`HealthReport`] into a [`GateDecision`]. Critical data
//! aborts the cycle before analysis runs, degraded data lets analysis run but
//! flags the resulting metric, and healthy data passes through untouched.
//! Gating always happens before anything is written.

pub mod messages;

use crate::alerts::{AlertPriority, AlertSink};
use crate::diagnostics::health::HealthMonitor;
use crate::error::{AlertError, GateError};
use crate::quality::{HealthReport, HealthStatus};
use crate::store::{Metric, MetricWriter};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Tag appended to metrics produced from degraded data.
pub const DATA_QUALITY_WARNING_TAG: &str = "data_quality_warning";

/// Upper bound on a single alert delivery, whatever the sink.
pub const DEFAULT_ALERT_TIMEOUT: Duration = Duration::from_secs(15);

pub type AnalysisFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<Metric>> + Send + 'a>>;

/// Downstream analysis guarded by the gate. Produces the metric to persist.
pub trait Analysis: Send + Sync {
    fn analyze(&self) -> AnalysisFuture<'_>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    Proceed,
    ProceedDegraded { excluded_signals: u32 },
    Abort,
}

impl GateDecision {
    pub fn for_report(report: &HealthReport) -> Self {
        match report.overall_status {
            HealthStatus::Healthy => Self::Proceed,
            HealthStatus::Degraded => Self::ProceedDegraded {
                excluded_signals: u32::try_from(report.summary.warnings).unwrap_or(u32::MAX),
            },
            HealthStatus::Critical => Self::Abort,
        }
    }

    pub const fn allows_downstream(self) -> bool {
        !matches!(self, Self::Abort)
    }

    /// Apply the decision to a freshly produced metric. Only a degraded
    /// decision changes anything.
    pub fn annotate(self, metric: &mut Metric) {
        if let Self::ProceedDegraded { excluded_signals } = self {
            metric.is_anomaly = true;
            if !metric.tags.iter().any(|t| t == DATA_QUALITY_WARNING_TAG) {
                metric.tags.push(DATA_QUALITY_WARNING_TAG.to_string());
            }
            metric.excluded_signal_count = excluded_signals;
        }
    }
}

/// Outcome of a cycle that was allowed through the gate.
#[derive(Debug, Clone)]
pub struct GatedRun {
    pub decision: GateDecision,
    pub metric: Metric,
    pub metric_id: i64,
    pub report: HealthReport,
}

/// Stateful gate: remembers the previous cycle's status to detect transitions.
pub struct CircuitBreakerGate {
    sink: Arc<dyn AlertSink>,
    previous: Option<HealthStatus>,
    alert_timeout: Duration,
    monitor: HealthMonitor,
}

impl CircuitBreakerGate {
    pub fn new(sink: Arc<dyn AlertSink>) -> Self {
        Self {
            sink,
            previous: None,
            alert_timeout: DEFAULT_ALERT_TIMEOUT,
            monitor: HealthMonitor::new(),
        }
    }

    /// Give up on an alert after `timeout`. The decision is returned either way.
    pub fn with_alert_timeout(mut self, timeout: Duration) -> Self {
        self.alert_timeout = timeout;
        self
    }

    /// Record into `monitor` instead of a private one.
    pub fn with_monitor(mut self, monitor: HealthMonitor) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn monitor(&self) -> &HealthMonitor {
        &self.monitor
    }

    /// Status seen on the last evaluated cycle, `None` before the first.
    pub fn previous_status(&self) -> Option<HealthStatus> {
        self.previous
    }

    /// Decide on `report` and emit this cycle's alerts.
    ///
    /// A critical report alerts on every cycle; a status transition sends an
    /// extra alert, except on the very first cycle.
    pub async fn evaluate(&mut self, report: &HealthReport) -> GateDecision {
        let decision = GateDecision::for_report(report);
        self.monitor.record_decision(report, decision);

        match decision {
            GateDecision::Proceed => {
                tracing::info!(score = report.overall_score, "data quality healthy, proceeding");
            }
            GateDecision::ProceedDegraded { excluded_signals } => {
                tracing::warn!(
                    score = report.overall_score,
                    excluded_signals,
                    "data quality degraded, proceeding with anomaly flag"
                );
                self.notify(&messages::degraded_alert(report), AlertPriority::Normal)
                    .await;
            }
            GateDecision::Abort => {
                tracing::error!(
                    score = report.overall_score,
                    critical_checks = report.summary.checks_failed,
                    "data quality critical, circuit breaker open"
                );
                self.notify(&messages::critical_alert(report), AlertPriority::High)
                    .await;
            }
        }

        if let Some(previous) = self.previous
            && previous != report.overall_status
        {
            let priority = if report.overall_status == HealthStatus::Critical {
                AlertPriority::High
            } else {
                AlertPriority::Normal
            };
            self.notify(&messages::transition_alert(previous, report), priority)
                .await;
        }
        self.previous = Some(report.overall_status);

        decision
    }

    /// Evaluate, then run `analysis` and persist its metric unless aborted.
    ///
    /// An abort returns [`GateError::CircuitOpen`] carrying the report and
    /// neither `analysis` nor `writer` is touched.
    pub async fn run_gated(
        &mut self,
        report: HealthReport,
        analysis: &dyn Analysis,
        writer: &dyn MetricWriter,
    ) -> Result<GatedRun, GateError> {
        let decision = self.evaluate(&report).await;
        if !decision.allows_downstream() {
            return Err(GateError::CircuitOpen {
                report: Box::new(report),
            });
        }

        let mut metric = analysis.analyze().await.map_err(GateError::Downstream)?;
        decision.annotate(&mut metric);
        let metric_id = writer.persist_metric(&metric).await?;
        tracing::info!(metric_id, anomaly = metric.is_anomaly, "analysis metric persisted");

        Ok(GatedRun {
            decision,
            metric,
            metric_id,
            report,
        })
    }

    async fn notify(&self, message: &str, priority: AlertPriority) {
        let delivery = self.sink.send_alert(message, priority);
        let outcome = match tokio::time::timeout(self.alert_timeout, delivery).await {
            Ok(outcome) => outcome,
            Err(_) => Err(AlertError::Send {
                sink: self.sink.name().to_string(),
                message: format!("timed out after {:?}", self.alert_timeout),
            }),
        };
        if let Err(e) = &outcome {
            tracing::warn!(sink = self.sink.name(), "alert delivery failed: {e}");
        }
        self.monitor.record_alert(&outcome);
    }
}
