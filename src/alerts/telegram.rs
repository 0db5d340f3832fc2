use super::traits::{AlertFuture, AlertPriority, AlertSink};
use crate::config::TelegramAlertConfig;
use crate::error::AlertError;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const HIGH_PRIORITY_PREFIX: &str = "🚨 ";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Sends alerts through the Telegram Bot API `sendMessage` method.
pub struct TelegramAlertSink {
    bot_token: String,
    chat_id: String,
    api_base: String,
    client: Client,
}

impl TelegramAlertSink {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            client: build_client(REQUEST_TIMEOUT),
        }
    }

    /// Build from the `[alerts.telegram]` section. Missing credentials are a
    /// configuration error.
    pub fn from_config(config: &TelegramAlertConfig) -> Result<Self, AlertError> {
        if config.bot_token.trim().is_empty() {
            return Err(AlertError::Config("telegram bot_token is empty".into()));
        }
        if config.chat_id.trim().is_empty() {
            return Err(AlertError::Config("telegram chat_id is empty".into()));
        }
        let sink = Self::new(&config.bot_token, &config.chat_id);
        Ok(match &config.api_base {
            Some(base) => sink.with_api_base(base),
            None => sink,
        })
    }

    /// Fail a request that has not completed within `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }

    fn payload(&self, message: &str, priority: AlertPriority) -> serde_json::Value {
        let text = match priority {
            AlertPriority::High => format!("{HIGH_PRIORITY_PREFIX}{message}"),
            AlertPriority::Normal => message.to_string(),
        };
        serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "disable_notification": priority == AlertPriority::Normal,
        })
    }

    fn send_error(message: impl Into<String>) -> AlertError {
        AlertError::Send {
            sink: "telegram".into(),
            message: message.into(),
        }
    }
}

impl AlertSink for TelegramAlertSink {
    fn name(&self) -> &str {
        "telegram"
    }

    fn send_alert<'a>(&'a self, message: &'a str, priority: AlertPriority) -> AlertFuture<'a> {
        Box::pin(async move {
            let resp = self
                .client
                .post(self.api_url("sendMessage"))
                .json(&self.payload(message, priority))
                .send()
                .await
                .map_err(|e| Self::send_error(e.to_string()))?;

            if !resp.status().is_success() {
                let status = resp.status();
                let err = resp
                    .text()
                    .await
                    .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
                return Err(Self::send_error(format!(
                    "sendMessage failed ({status}): {err}"
                )));
            }
            Ok(())
        })
    }
}
