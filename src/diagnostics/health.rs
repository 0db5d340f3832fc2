//! Health of a running circuit breaker: what it last decided and whether its
//! alerts are getting through.
//!
//! A [`HealthMonitor`] is a cheap cloneable handle. The gate records into it;
//! whoever drives the gate (the scheduler, the `watch` command) keeps a clone
//! to read snapshots.

use crate::error::AlertError;
use crate::gate::GateDecision;
use crate::quality::{HealthReport, HealthStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GateHealth {
    /// Reports the gate has decided on.
    pub evaluations: u64,
    /// Evaluations that opened the circuit.
    pub aborts: u64,
    /// Cycles that failed outside the gate decision (store unreachable,
    /// downstream analysis or persistence failed).
    pub cycle_failures: u64,
    pub last_evaluated_at: Option<DateTime<Utc>>,
    pub last_status: Option<HealthStatus>,
    pub last_score: Option<f64>,
    pub last_decision: Option<GateDecision>,
    pub last_cycle_error: Option<String>,
    pub alerts_sent: u64,
    pub alert_failures: u64,
    pub last_alert_error: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HealthMonitor {
    state: Arc<RwLock<GateHealth>>,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    fn update<F>(&self, update: F)
    where
        F: FnOnce(&mut GateHealth),
    {
        if let Ok(mut state) = self.state.write() {
            update(&mut state);
        }
    }

    pub fn record_decision(&self, report: &HealthReport, decision: GateDecision) {
        self.update(|state| {
            state.evaluations = state.evaluations.saturating_add(1);
            if decision == GateDecision::Abort {
                state.aborts = state.aborts.saturating_add(1);
            }
            state.last_evaluated_at = Some(Utc::now());
            state.last_status = Some(report.overall_status);
            state.last_score = Some(report.overall_score);
            state.last_decision = Some(decision);
        });
    }

    pub fn record_alert(&self, outcome: &Result<(), AlertError>) {
        self.update(|state| match outcome {
            Ok(()) => state.alerts_sent = state.alerts_sent.saturating_add(1),
            Err(e) => {
                state.alert_failures = state.alert_failures.saturating_add(1);
                state.last_alert_error = Some(e.to_string());
            }
        });
    }

    pub fn record_cycle_error(&self, error: &impl Display) {
        let message = error.to_string();
        self.update(move |state| {
            state.cycle_failures = state.cycle_failures.saturating_add(1);
            state.last_cycle_error = Some(message);
        });
    }

    pub fn snapshot(&self) -> GateHealth {
        self.state
            .read()
            .map_or_else(|_| GateHealth::default(), |state| state.clone())
    }

    pub fn snapshot_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or_else(|_| {
            serde_json::json!({
                "status": "error",
                "message": "failed to serialize gate health"
            })
        })
    }
}
