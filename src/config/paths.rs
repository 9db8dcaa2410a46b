use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";

/// Get the path to the config.json file
/// Honors DASHBOARD_CONFIG, then looks next to the install root (parent of the bin folder)
pub(super) fn get_config_path() -> PathBuf {
    if let Ok(custom) = env::var(CONFIG_PATH_ENV) {
        let trimmed = custom.trim();
        if !trimmed.is_empty() {
            debug!(path = %trimmed, "Config path taken from environment");
            return PathBuf::from(trimmed);
        }
    }

    // Executable is at: app_root/bin/sequence-dashboard
    // Config should be at: app_root/config.json
    if let Ok(exe_path) = env::current_exe() {
        debug!(path = %exe_path.display(), "Executable path detected");

        if let Some(app_root) = exe_path.parent().and_then(|bin_dir| bin_dir.parent()) {
            let config_path = app_root.join("config.json");
            if config_path.exists() {
                debug!(path = %config_path.display(), "Looking for config");
                return config_path;
            }
        }
    }

    warn!("Using fallback: looking for config.json in current directory");
    PathBuf::from("config.json")
}
