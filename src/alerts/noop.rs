use super::traits::{AlertFuture, AlertPriority, AlertSink};

/// Zero-overhead sink: all alerts are dropped.
pub struct NoopAlertSink;

impl AlertSink for NoopAlertSink {
    fn name(&self) -> &str {
        "noop"
    }

    fn send_alert<'a>(&'a self, _message: &'a str, _priority: AlertPriority) -> AlertFuture<'a> {
        Box::pin(async { Ok(()) })
    }
}
