use crate::error::AlertError;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

pub type AlertFuture<'a> = Pin<Box<dyn Future<Output = Result<(), AlertError>> + Send + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertPriority {
    Normal,
    High,
}

/// Destination for operator alerts raised by the circuit-breaker gate.
///
/// Delivery is best effort: callers log a returned error and carry on.
pub trait AlertSink: Send + Sync {
    fn name(&self) -> &str;

    fn send_alert<'a>(&'a self, message: &'a str, priority: AlertPriority) -> AlertFuture<'a>;
}
