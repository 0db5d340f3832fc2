use crate::quality::HealthReport;
use std::path::PathBuf;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `whalewatch`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; application glue continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum WhaleError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Store ───────────────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Circuit breaker ─────────────────────────────────────────────────
    #[error("gate: {0}")]
    Gate(#[from] GateError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ─── Store errors ────────────────────────────────────────────────────────────

/// Failure of a snapshot or metric store operation.
///
/// This is the only error a quality check may return. The validator scores it
/// as a critical check result instead of propagating it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("schema migration failed: {0}")]
    Migration(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Tls(_) => Self::Connection(err.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::Decode(err.to_string())
            }
            other => Self::Query(other.to_string()),
        }
    }
}

// ─── Alert errors ────────────────────────────────────────────────────────────

/// Produced by sinks. The gate logs and swallows these, so they never reach
/// [`WhaleError`].
#[derive(Debug, Error)]
pub enum AlertError {
    #[error("sink {sink} send failed: {message}")]
    Send { sink: String, message: String },

    #[error("sink misconfigured: {0}")]
    Config(String),
}

// ─── Circuit breaker errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GateError {
    /// Data quality is critical; downstream analysis was not invoked.
    ///
    /// Carries the full report so callers can print it for diagnosis.
    #[error(
        "circuit breaker open: data quality {} (score {:.1}/100)",
        report.overall_status,
        report.overall_score
    )]
    CircuitOpen { report: Box<HealthReport> },

    #[error("downstream analysis failed: {0}")]
    Downstream(#[source] anyhow::Error),

    #[error("metric persistence failed: {0}")]
    Persist(#[from] StoreError),
}

impl GateError {
    /// Report attached to an abort, if this is one.
    pub fn report(&self) -> Option<&HealthReport> {
        match self {
            Self::CircuitOpen { report } => Some(report),
            _ => None,
        }
    }
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, WhaleError>;
