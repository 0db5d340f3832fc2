pub mod log;
pub mod noop;
pub mod telegram;
pub mod traits;

pub use self::log::LogAlertSink;
pub use noop::NoopAlertSink;
pub use telegram::TelegramAlertSink;
pub use traits::{AlertFuture, AlertPriority, AlertSink};

use crate::config::AlertsConfig;
use crate::error::AlertError;
use std::sync::Arc;

/// Factory: create the alert sink selected in config
pub fn create_sink(config: &AlertsConfig) -> Arc<dyn AlertSink> {
    match config.backend.as_str() {
        "log" => Arc::new(LogAlertSink::new()),
        "telegram" => {
            let sink = config
                .telegram
                .as_ref()
                .ok_or_else(|| AlertError::Config("missing [alerts.telegram] section".into()))
                .and_then(TelegramAlertSink::from_config);
            match sink {
                Ok(sink) => Arc::new(sink),
                Err(e) => {
                    tracing::warn!("{e}, falling back to noop");
                    Arc::new(NoopAlertSink)
                }
            }
        }
        "none" | "noop" => Arc::new(NoopAlertSink),
        _ => {
            tracing::warn!(
                "Unknown alert backend '{}', falling back to noop",
                config.backend
            );
            Arc::new(NoopAlertSink)
        }
    }
}
