use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::TrackError;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// REST endpoint for price data
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Quote currency for all prices (e.g. "usd")
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            vs_currency: default_vs_currency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Refresh interval in seconds for watch mode
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_interval_secs() -> u64 {
    30
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the user config file and environment
    pub fn load() -> crate::error::Result<Self> {
        let mut builder = Config::builder();

        // Optional user config file (~/.config/cryptotrack/config.toml)
        if let Some(path) = Self::user_config_path() {
            builder = builder.add_source(File::from(path).required(false));
        }

        let cfg: AppConfig = builder
            // Override with environment variables (CRYPTOTRACK_API__VS_CURRENCY, etc.)
            .add_source(
                Environment::with_prefix("CRYPTOTRACK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        cfg.validate()
            .map_err(|errors| TrackError::InvalidInput(errors.join("; ")))?;

        Ok(cfg)
    }

    /// Per-user configuration directory
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("cryptotrack"))
    }

    /// Path of the optional user config file
    pub fn user_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.api.base_url.trim().is_empty() {
            errors.push("api.base_url must not be empty".to_string());
        } else if !self.api.base_url.starts_with("http") {
            errors.push(format!(
                "api.base_url must be an http(s) URL: {}",
                self.api.base_url
            ));
        }

        let vs = &self.api.vs_currency;
        if vs.len() < 2 || vs.len() > 5 || !vs.chars().all(|c| c.is_ascii_lowercase()) {
            errors.push(format!(
                "api.vs_currency must be a lowercase currency code: {vs}"
            ));
        }

        if self.api.timeout_secs == 0 {
            errors.push("api.timeout_secs must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
