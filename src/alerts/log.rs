use super::traits::{AlertFuture, AlertPriority, AlertSink};

/// Writes alerts to the tracing log.
pub struct LogAlertSink;

impl LogAlertSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogAlertSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertSink for LogAlertSink {
    fn name(&self) -> &str {
        "log"
    }

    fn send_alert<'a>(&'a self, message: &'a str, priority: AlertPriority) -> AlertFuture<'a> {
        Box::pin(async move {
            match priority {
                AlertPriority::High => tracing::warn!(%priority, "alert: {message}"),
                AlertPriority::Normal => tracing::info!(%priority, "alert: {message}"),
            }
            Ok(())
        })
    }
}
