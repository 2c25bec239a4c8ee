use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "geostory.config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Engine configuration file format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Pause between two lookups of a freshly added element
    #[serde(default = "default_scroll_retry_delay_ms")]
    pub scroll_retry_delay_ms: u64,

    /// Lookups before giving up on scrolling to it
    #[serde(default = "default_scroll_max_attempts")]
    pub scroll_max_attempts: u32,

    /// Delay before reloading the story after login or logout
    #[serde(default = "default_auth_reload_delay_ms")]
    pub auth_reload_delay_ms: u64,

    /// Quiet period before the route follows the reader's position
    #[serde(default = "default_url_update_debounce_ms")]
    pub url_update_debounce_ms: u64,

    /// Directory holding static story configurations (`<id>.json`)
    #[serde(default = "default_stories_dir")]
    pub stories_dir: String,

    /// Actions buffered per workflow before it starts lagging
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
}

fn default_scroll_retry_delay_ms() -> u64 {
    200
}

fn default_scroll_max_attempts() -> u32 {
    10
}

fn default_auth_reload_delay_ms() -> u64 {
    500
}

fn default_url_update_debounce_ms() -> u64 {
    500
}

fn default_stories_dir() -> String {
    "configs".to_string()
}

fn default_bus_capacity() -> usize {
    256
}

impl EngineConfig {
    /// Load config from a directory, defaults when the file is absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
                path: config_path.clone(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: config_path,
                source,
            })
        } else {
            Ok(EngineConfig::default())
        }
    }

    /// Absolute location of the static stories
    pub fn get_stories_dir(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(&self.stories_dir)
    }

    pub fn scroll_retry_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_retry_delay_ms)
    }

    pub fn auth_reload_delay(&self) -> Duration {
        Duration::from_millis(self.auth_reload_delay_ms)
    }

    pub fn url_update_debounce(&self) -> Duration {
        Duration::from_millis(self.url_update_debounce_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scroll_retry_delay_ms: default_scroll_retry_delay_ms(),
            scroll_max_attempts: default_scroll_max_attempts(),
            auth_reload_delay_ms: default_auth_reload_delay_ms(),
            url_update_debounce_ms: default_url_update_debounce_ms(),
            stories_dir: default_stories_dir(),
            bus_capacity: default_bus_capacity(),
        }
    }
}
