use super::Config;
use crate::error::ConfigError;
use crate::quality::CheckKind;
use std::collections::HashSet;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.validator;
        if v.lookback_hours == 0 {
            return Err(invalid("validator.lookback_hours must be at least 1"));
        }
        if v.drift_sample_limit == 0 {
            return Err(invalid("validator.drift_sample_limit must be at least 1"));
        }
        if v.block_interval_secs == 0 {
            return Err(invalid("validator.block_interval_secs must be at least 1"));
        }
        if !(v.rate_lower_bound > 0.0 && v.rate_lower_bound < v.rate_upper_bound) {
            return Err(invalid(format!(
                "validator rate bounds must satisfy 0 < lower < upper (got {} / {})",
                v.rate_lower_bound, v.rate_upper_bound
            )));
        }

        if v.checks.is_empty() {
            return Err(invalid(
                "validator.checks must name at least one check; an empty list gates nothing",
            ));
        }
        let mut seen = HashSet::new();
        for name in &v.checks {
            if name.parse::<CheckKind>().is_err() {
                return Err(invalid(format!("validator.checks: unknown check '{name}'")));
            }
            if !seen.insert(name.as_str()) {
                return Err(invalid(format!("validator.checks: duplicate check '{name}'")));
            }
        }

        if self.scheduler.interval_hours == 0 {
            return Err(invalid("scheduler.interval_hours must be at least 1"));
        }

        if self.alerts.backend == "telegram" {
            let complete = self
                .alerts
                .telegram
                .as_ref()
                .is_some_and(|tg| !tg.bot_token.is_empty() && !tg.chat_id.is_empty());
            if !complete {
                return Err(invalid(
                    "alerts.backend = \"telegram\" requires alerts.telegram.bot_token and chat_id",
                ));
            }
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation(message.into())
}
