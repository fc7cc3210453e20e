//! Gateway configuration.
//!
//! Supports reading settings from `~/.config/lantern/config.toml`, with
//! environment variables taking precedence over the file and the file taking
//! precedence over built-in defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lantern_core::error::{LanternError, Result};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable overriding the backend address.
pub const BACKEND_URL_ENV: &str = "LANTERN_BACKEND_URL";

/// Connection settings for the chat backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the backend HTTP API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout; generation on CPU-only hosts can be slow
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    /// Loads the configuration from the standard locations.
    ///
    /// Resolution order: `LANTERN_BACKEND_URL` environment variable, then
    /// `~/.config/lantern/config.toml`, then built-in defaults. A missing
    /// file is not an error; an unreadable or malformed one is.
    pub fn load() -> Result<Self> {
        let config = match config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        Ok(config.with_env_override(env::var(BACKEND_URL_ENV).ok()))
    }

    /// Loads the configuration from a specific TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LanternError::config(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            LanternError::config(format!(
                "Failed to parse configuration file at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies an environment-provided backend URL over this configuration.
    fn with_env_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    /// The request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Returns the path to the configuration file: ~/.config/lantern/config.toml
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("lantern").join("config.toml"))
}
