//! Periodic credit check configuration

use serde::Deserialize;

/// Settings for the background credit check task
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Whether the periodic check runs at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Seconds between checks
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

const fn default_enabled() -> bool {
    true
}

const fn default_interval() -> u64 {
    3600
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            interval_secs: default_interval(),
        }
    }
}
