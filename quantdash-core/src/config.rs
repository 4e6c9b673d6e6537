//! Dashboard configuration, loaded from TOML.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000/api"
//! timeout_secs = 30
//! hydrate_results = true
//!
//! [ui]
//! tick_ms = 50
//! auto_refresh_secs = 15
//! ```
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! `QUANTDASH_API_URL` overrides `api.base_url`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the backend base URL.
pub const API_URL_ENV: &str = "QUANTDASH_API_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout; the HTTP client rejects slower responses.
    pub timeout_secs: u64,
    /// Fetch results for completed tasks the listing returns without them.
    pub hydrate_results: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
            hydrate_results: true,
        }
    }
}

/// Terminal UI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Input poll interval.
    pub tick_ms: u64,
    /// Refresh the task list periodically; `None` means manual refresh only.
    pub auto_refresh_secs: Option<u64>,
    /// Show the welcome overlay on start.
    pub welcome: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            auto_refresh_secs: None,
            welcome: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantDashConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
}

impl QuantDashConfig {
    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load from `path`, falling back to defaults when the file does not
    /// exist. A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Apply `QUANTDASH_API_URL` if it is set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                self.api.base_url = url.trim().to_string();
            }
        }
        self
    }
}

/// Platform config location: `<config_dir>/quantdash/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quantdash")
        .join("config.toml")
}
