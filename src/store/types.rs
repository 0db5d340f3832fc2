use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single balance observation for a monitored entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub entity_id: String,
    pub balance: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
}

impl Snapshot {
    pub fn new(entity_id: impl Into<String>, balance: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            entity_id: entity_id.into(),
            balance,
            timestamp,
            block_height: None,
        }
    }

    pub fn with_block_height(mut self, block_height: u64) -> Self {
        self.block_height = Some(block_height);
        self
    }
}

/// A computed analytics record.
///
/// The circuit breaker only ever touches `is_anomaly`, `tags` and
/// `excluded_signal_count`, and only on degraded runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_asset_rate: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_anomaly: bool,
    #[serde(default)]
    pub excluded_signal_count: u32,
}

impl Metric {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            timestamp,
            cross_asset_rate: None,
            tags: Vec::new(),
            is_anomaly: false,
            excluded_signal_count: 0,
        }
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.cross_asset_rate = Some(rate);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window of `hours` ending at `end`.
    pub fn lookback(end: DateTime<Utc>, hours: u32) -> Self {
        Self {
            start: end - Duration::hours(i64::from(hours)),
            end,
        }
    }

    /// Whole hours covered by the window, never negative.
    pub fn hours(&self) -> u64 {
        u64::try_from((self.end - self.start).num_hours()).unwrap_or(0)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}
