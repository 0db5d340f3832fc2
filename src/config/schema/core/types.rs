use super::super::{AlertsConfig, SchedulerConfig, StorageConfig, ValidatorConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - resolved at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub validator: ValidatorConfig,

    #[serde(default)]
    pub alerts: AlertsConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,
}
