//! Application configuration loaded from environment variables.

use crate::catalog::MatchPolicy;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// LINE channel configuration
    pub line: LineConfig,

    /// Document store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Webhook configuration
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Unit catalog configuration
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Notification endpoint configuration
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineConfig {
    /// Channel secret, used to verify webhook signatures
    pub channel_secret: String,

    /// Long-lived channel access token
    pub channel_access_token: String,

    /// Messaging API base URL
    #[serde(default = "default_line_api_url")]
    pub api_url: String,

    /// Request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Firebase Realtime Database URL
    #[serde(default = "default_store_url")]
    pub base_url: String,

    /// Request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Reject deliveries whose `x-line-signature` does not verify
    #[serde(default = "default_true")]
    pub verify_signature: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Write the default unit catalog on startup when none is stored
    #[serde(default = "default_true")]
    pub seed_on_startup: bool,

    /// How free text is resolved to a unit
    #[serde(default)]
    pub match_policy: MatchPolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotifyConfig {
    /// Bearer key required on the notify endpoint (open when unset)
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_store_url(),
            timeout: default_timeout(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            verify_signature: true,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_on_startup: true,
            match_policy: MatchPolicy::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_line_api_url() -> String {
    "https://api.line.me".into()
}

fn default_store_url() -> String {
    "https://line-safe-default-rtdb.asia-southeast1.firebasedatabase.app".into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_true() -> bool {
    true
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    // Secrets and tokens must stay strings.
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
