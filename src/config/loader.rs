use std::env;
use std::path::Path;

use tokio::fs;
use tracing::{info, warn};

use crate::types::DashboardError;

use super::{paths, Config};

pub const API_URL_ENV: &str = "DASHBOARD_API_URL";

impl Config {
    /// Load configuration from config.json
    /// Falls back to defaults if the file doesn't exist or can't be parsed
    pub async fn load() -> Self {
        let config_path = paths::get_config_path();
        let mut config = match Self::load_from(&config_path).await {
            Ok(config) => config,
            Err(err) => {
                warn!(error = ?err, "Failed to load config.json, using defaults");
                Self::default()
            }
        };

        if let Ok(custom) = env::var(API_URL_ENV) {
            let trimmed = custom.trim();
            if !trimmed.is_empty() {
                config.api_base_url = trimmed.to_string();
            }
        }

        if config.stats_interval_ms == config.health_interval_ms {
            warn!(
                interval_ms = config.stats_interval_ms,
                "Stats and health polls share one interval; their ticks will coincide"
            );
        }

        info!(
            api = %config.api_base_url,
            stats_ms = config.stats_interval_ms,
            health_ms = config.health_interval_ms,
            "Loaded configuration"
        );
        config
    }

    /// Read a config file, treating a missing file as "all defaults".
    pub async fn load_from(config_path: &Path) -> Result<Self, DashboardError> {
        if !config_path.exists() {
            warn!(path = %config_path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(config_path)
            .await
            .map_err(|err| DashboardError::Config(format!("Failed to read config file: {err}")))?;

        serde_json::from_str(&contents)
            .map_err(|err| DashboardError::Config(format!("Failed to parse config.json: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).await.unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.stats_interval_ms, 3000);
        assert_eq!(config.health_interval_ms, 5000);
    }

    #[tokio::test]
    async fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"api_base_url": "http://seq.local:9000", "discard_stale_responses": true}}"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).await.unwrap();
        assert_eq!(config.api_base_url, "http://seq.local:9000");
        assert!(config.discard_stale_responses);
        assert_eq!(config.request_timeout_secs, 8);
    }

    #[tokio::test]
    async fn broken_json_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Config::load_from(file.path()).await.unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }
}
