//! The five data-quality checks run before every analysis cycle.
//!
//! Each check issues its store queries, then hands the raw numbers to a pure
//! `evaluate` function that applies the thresholds. Store failures surface as
//! [`StoreError`] and are scored by the validator, never here.

mod density;
mod drift;
mod outliers;
mod precision;
mod rate;

use super::types::CheckResult;
use crate::error::StoreError;
use crate::store::{QualityStore, TimeWindow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
pub(crate) mod fake;

/// Identifies one check. The variant order of [`CheckKind::ALL`] is the order
/// checks run in and appear in the report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CheckKind {
    /// Snapshot coverage: one observation per entity per hour.
    Density,
    /// Exact-zero balances left behind by failed batch reads.
    Precision,
    /// Recorded timestamps versus block-height extrapolation.
    Drift,
    /// Hour-over-hour balance jumps above 50%.
    Outliers,
    /// Cross-asset rate kept inside its peg band.
    RateConsistency,
}

impl CheckKind {
    pub const ALL: [Self; 5] = [
        Self::Density,
        Self::Precision,
        Self::Drift,
        Self::Outliers,
        Self::RateConsistency,
    ];

    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Weight of this check in the overall score.
    pub const fn weight(self) -> f64 {
        match self {
            Self::Density | Self::Precision => 0.25,
            Self::Drift | Self::Outliers => 0.20,
            Self::RateConsistency => 0.10,
        }
    }

    pub async fn run<S>(self, store: &mut S, ctx: &CheckContext) -> Result<CheckResult, StoreError>
    where
        S: QualityStore + ?Sized,
    {
        match self {
            Self::Density => density::run(store, ctx).await,
            Self::Precision => precision::run(store, ctx).await,
            Self::Drift => drift::run(store, ctx).await,
            Self::Outliers => outliers::run(store, ctx).await,
            Self::RateConsistency => rate::run(store, ctx).await,
        }
    }
}

/// Tunables shared by all checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckSettings {
    pub lookback_hours: u32,
    pub drift_sample_limit: usize,
    pub block_interval_secs: u32,
    pub rate_lower_bound: f64,
    pub rate_upper_bound: f64,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            lookback_hours: 24,
            drift_sample_limit: 100,
            block_interval_secs: 12,
            rate_lower_bound: 0.90,
            rate_upper_bound: 1.10,
        }
    }
}

/// Everything a check needs besides the store: the evaluation instant, the
/// lookback window ending at it, and the settings.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext {
    pub now: DateTime<Utc>,
    pub window: TimeWindow,
    pub settings: CheckSettings,
}

impl CheckContext {
    pub fn new(now: DateTime<Utc>, settings: CheckSettings) -> Self {
        Self {
            now,
            window: TimeWindow::lookback(now, settings.lookback_hours),
            settings,
        }
    }
}

/// Renders up to `limit` items followed by `(+N more)`.
fn preview<I, T>(items: I, limit: usize) -> String
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    let items: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    let shown = items.iter().take(limit).cloned().collect::<Vec<_>>().join(", ");
    if items.len() > limit {
        format!("{shown} (+{} more)", items.len() - limit)
    } else {
        shown
    }
}
