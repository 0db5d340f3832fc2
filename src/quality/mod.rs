//! Data-quality validation of the whale snapshot store.
//!
//! A [`Validator`] runs the [`CheckKind`] checks sequentially on one store
//! session and a [`HealthAggregator`] folds their results into a
//! [`HealthReport`], which the circuit-breaker gate then acts on.

pub mod aggregate;
pub mod checks;
pub mod render;
pub mod types;
pub mod validator;

pub use aggregate::{DEFAULT_CHECK_WEIGHT, HealthAggregator};
pub use checks::{CheckContext, CheckKind, CheckSettings};
pub use render::render_report;
pub use types::{CheckResult, HealthReport, HealthStatus, HealthSummary};
pub use validator::Validator;
