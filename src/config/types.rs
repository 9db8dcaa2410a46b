use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the sequence dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_stats_interval_ms")]
    pub stats_interval_ms: u64,

    #[serde(default = "default_health_interval_ms")]
    pub health_interval_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub discard_stale_responses: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            stats_interval_ms: default_stats_interval_ms(),
            health_interval_ms: default_health_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            discard_stale_responses: false,
        }
    }
}

impl Config {
    pub fn stats_interval(&self) -> Duration {
        Duration::from_millis(self.stats_interval_ms.max(1))
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_millis(self.health_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_stats_interval_ms() -> u64 {
    3000
}

fn default_health_interval_ms() -> u64 {
    5000
}

fn default_request_timeout_secs() -> u64 {
    8
}
