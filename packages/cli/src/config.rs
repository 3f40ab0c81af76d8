use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use dropzone_editor::SessionOptions;

pub const DEFAULT_CONFIG_NAME: &str = "dropzone.config.json";

/// Dropzone configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Maximum number of history entries (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Session id used to seed generated item ids
    #[serde(default = "default_session_id")]
    pub session_id: String,

    /// Log filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_history_limit() -> usize {
    100
}

fn default_session_id() -> String {
    "dropzone".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            session_id: self.session_id.clone(),
            history_limit: self.history_limit,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            session_id: default_session_id(),
            log_level: default_log_level(),
        }
    }
}
