pub mod schema;

pub use schema::{
    AlertsConfig, Config, SchedulerConfig, StorageConfig, TelegramAlertConfig, ValidatorConfig,
};
