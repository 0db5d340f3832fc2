use crate::quality::{CheckKind, CheckSettings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Hours of history every check looks at
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,
    /// Newest block-numbered snapshots sampled by the drift check
    #[serde(default = "default_drift_sample_limit")]
    pub drift_sample_limit: usize,
    /// Nominal seconds between blocks on the monitored chain
    #[serde(default = "default_block_interval_secs")]
    pub block_interval_secs: u32,
    #[serde(default = "default_rate_lower_bound")]
    pub rate_lower_bound: f64,
    #[serde(default = "default_rate_upper_bound")]
    pub rate_upper_bound: f64,
    /// Checks to run, in report order
    #[serde(default = "default_checks")]
    pub checks: Vec<String>,
}

fn default_lookback_hours() -> u32 {
    24
}
fn default_drift_sample_limit() -> usize {
    100
}
fn default_block_interval_secs() -> u32 {
    12
}
fn default_rate_lower_bound() -> f64 {
    0.90
}
fn default_rate_upper_bound() -> f64 {
    1.10
}
fn default_checks() -> Vec<String> {
    CheckKind::ALL.iter().map(|k| k.name().to_string()).collect()
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            lookback_hours: default_lookback_hours(),
            drift_sample_limit: default_drift_sample_limit(),
            block_interval_secs: default_block_interval_secs(),
            rate_lower_bound: default_rate_lower_bound(),
            rate_upper_bound: default_rate_upper_bound(),
            checks: default_checks(),
        }
    }
}

impl ValidatorConfig {
    pub fn check_settings(&self) -> CheckSettings {
        CheckSettings {
            lookback_hours: self.lookback_hours,
            drift_sample_limit: self.drift_sample_limit,
            block_interval_secs: self.block_interval_secs,
            rate_lower_bound: self.rate_lower_bound,
            rate_upper_bound: self.rate_upper_bound,
        }
    }

    /// Configured checks in order. Unknown names are skipped here;
    /// `Config::validate` rejects them up front.
    pub fn check_kinds(&self) -> Vec<CheckKind> {
        self.checks
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect()
    }
}
