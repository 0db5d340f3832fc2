use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Hours between validation cycles in `watch` mode (minimum 1)
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u32,
}

fn default_interval_hours() -> u32 {
    6
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_hours: default_interval_hours(),
        }
    }
}
