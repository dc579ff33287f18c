use super::AppConfig;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Load configuration from `path`, falling back to defaults when the file is
/// missing or unparseable. The UI always launches.
pub fn load_config(path: &Path) -> AppConfig {
    match fs::read_to_string(path) {
        Ok(data) => parse_config(&data),
        Err(err) => {
            info!(path = %path.display(), "No config file ({err}); using defaults");
            AppConfig::default()
        }
    }
}

pub fn parse_config(data: &str) -> AppConfig {
    match toml::from_str::<AppConfig>(data) {
        Ok(config) => config,
        Err(err) => {
            warn!("Config file did not parse ({err}); using defaults");
            AppConfig::default()
        }
    }
}

/// Persist the configuration (window geometry mainly). Best effort; a failed
/// write is logged and otherwise ignored.
pub fn save_config(path: &Path, config: &AppConfig) {
    if let Some(parent) = path.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {err}");
            return;
        }
    }
    match toml::to_string(config) {
        Ok(contents) => {
            if let Err(err) = fs::write(path, contents) {
                warn!(path = %path.display(), "Failed to save config: {err}");
            }
        }
        Err(err) => warn!("Failed to serialize config: {err}"),
    }
}
