//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Environment variables
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub default: DefaultConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultConfig {
    #[serde(default = "default_source")]
    pub source: String,
}

/// Ledger gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the ledger gateway
    pub url: Option<String>,

    /// API token for authenticated gateway access
    pub api_token: Option<String>,

    /// Maximum number of retries for read requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retries
    #[serde(default = "default_retry_delay")]
    pub retry_delay: Duration,

    /// How long to wait for a write confirmation before reporting it ambiguous
    #[serde(default = "default_confirmation_timeout")]
    pub confirmation_timeout: Duration,
}

/// Watch mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Polling interval between background refreshes
    #[serde(default = "default_poll_interval")]
    pub poll_interval: Duration,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

// Default value functions

fn default_source() -> String {
    "gateway".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> Duration {
    Duration::from_millis(1000)
}

fn default_confirmation_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for DefaultConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_token: None,
            max_retries: default_max_retries(),
            retry_delay: default_retry_delay(),
            confirmation_timeout: default_confirmation_timeout(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./config.toml
    /// 2. ~/.pharmatrack-viz/config.toml
    /// 3. /etc/pharmatrack-viz/config.toml
    pub fn load() -> Result<Self> {
        let paths = vec![
            PathBuf::from("config.toml"),
            dirs::home_dir()
                .map(|h| h.join(".pharmatrack-viz").join("config.toml"))
                .unwrap_or_else(|| PathBuf::from("/dev/null")),
            PathBuf::from("/etc/pharmatrack-viz/config.toml"),
        ];

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Get the gateway URL from config or environment
    pub fn gateway_url(&self) -> Result<String> {
        if let Some(url) = &self.gateway.url {
            return Ok(url.clone());
        }

        std::env::var("PHARMATRACK_GATEWAY_URL").map_err(|_| {
            Error::MissingConfig(
                "Gateway URL not found. Set PHARMATRACK_GATEWAY_URL environment variable or configure in config file".to_string(),
            )
        })
    }

    /// Get the gateway API token from config or environment, if any.
    ///
    /// The token is optional: read-only gateways accept unauthenticated
    /// requests, and the gateway reports missing credentials on writes.
    pub fn gateway_api_token(&self) -> Option<String> {
        if let Some(token) = &self.gateway.api_token {
            return Some(token.clone());
        }

        std::env::var("PHARMATRACK_API_TOKEN").ok()
    }
}
