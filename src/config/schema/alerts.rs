use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// "none" | "log" | "telegram"
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default)]
    pub telegram: Option<TelegramAlertConfig>,
}

fn default_backend() -> String {
    "log".into()
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            telegram: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelegramAlertConfig {
    pub bot_token: String,
    pub chat_id: String,
    /// Override for the Bot API host, mainly for self-hosted API servers
    #[serde(default)]
    pub api_base: Option<String>,
}
