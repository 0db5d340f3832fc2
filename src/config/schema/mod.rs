mod alerts;
mod core;
mod scheduler;
mod storage;
mod validator;

pub use alerts::{AlertsConfig, TelegramAlertConfig};
pub use core::Config;
pub use scheduler::SchedulerConfig;
pub use storage::StorageConfig;
pub use validator::ValidatorConfig;
