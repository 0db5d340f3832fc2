use super::Config;
use crate::config::TelegramAlertConfig;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("WHALEWATCH_DATABASE")
            && !path.is_empty()
        {
            self.storage.database_path = path;
        }

        if let Ok(hours_str) = std::env::var("WHALEWATCH_LOOKBACK_HOURS")
            && let Ok(hours) = hours_str.parse::<u32>()
            && hours > 0
        {
            self.validator.lookback_hours = hours;
        }

        if let Ok(backend) = std::env::var("WHALEWATCH_ALERT_BACKEND")
            && !backend.is_empty()
        {
            self.alerts.backend = backend;
        }

        if let Ok(token) = std::env::var("WHALEWATCH_TELEGRAM_BOT_TOKEN")
            && !token.is_empty()
        {
            self.alerts
                .telegram
                .get_or_insert_with(TelegramAlertConfig::default)
                .bot_token = token;
        }

        if let Ok(chat_id) = std::env::var("WHALEWATCH_TELEGRAM_CHAT_ID")
            && !chat_id.is_empty()
        {
            self.alerts
                .telegram
                .get_or_insert_with(TelegramAlertConfig::default)
                .chat_id = chat_id;
        }
    }
}
