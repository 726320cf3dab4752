//! Configuration management for the rota scheduler
//!
//! This module handles loading and validating configuration from
//! environment variables and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scheduling fairness configuration
    pub scheduling: SchedulingConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Outbound webhook configuration
    pub webhook: WebhookSettings,

    /// Bot server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Fairness tunables for the scheduling core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Minimum rest days before a Support repeat is preferred
    pub support_cooldown_days: u32,

    /// Minimum rest days before a release-role repeat is preferred
    pub release_cooldown_days: u32,

    /// Days between periodic fairness counter resets
    pub reset_interval_days: u32,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database path
    pub path: PathBuf,
}

/// Outbound webhook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    /// Webhook URL; empty disables delivery
    pub url: String,

    /// Optional bearer token
    pub auth_token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum retry attempts on failure
    pub max_retries: u32,
}

/// Bot server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (pretty, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables (ROTA_ prefix),
    /// falling back to defaults for anything unset
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(days) = env_parse::<u32>("ROTA_SUPPORT_COOLDOWN_DAYS") {
            config.scheduling.support_cooldown_days = days;
        }
        if let Some(days) = env_parse::<u32>("ROTA_RELEASE_COOLDOWN_DAYS") {
            config.scheduling.release_cooldown_days = days;
        }
        if let Some(days) = env_parse::<u32>("ROTA_RESET_INTERVAL_DAYS") {
            config.scheduling.reset_interval_days = days;
        }

        if let Ok(path) = std::env::var("ROTA_DATABASE_PATH") {
            config.database.path = path.into();
        }

        if let Ok(url) = std::env::var("ROTA_WEBHOOK_URL") {
            config.webhook.url = url;
        }
        if let Ok(token) = std::env::var("ROTA_WEBHOOK_TOKEN") {
            config.webhook.auth_token = Some(token);
        }
        if let Some(secs) = env_parse::<u64>("ROTA_WEBHOOK_TIMEOUT") {
            config.webhook.timeout_secs = secs;
        }
        if let Some(retries) = env_parse::<u32>("ROTA_WEBHOOK_MAX_RETRIES") {
            config.webhook.max_retries = retries;
        }

        if let Ok(host) = std::env::var("ROTA_SERVER_HOST") {
            config.server.host = host;
        }
        if let Some(port) = env_parse::<u16>("ROTA_SERVER_PORT") {
            config.server.port = port;
        }

        if let Ok(level) = std::env::var("ROTA_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Ok(format) = std::env::var("ROTA_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.scheduling.support_cooldown_days == 0 {
            anyhow::bail!("support_cooldown_days must be greater than 0");
        }

        if self.scheduling.release_cooldown_days == 0 {
            anyhow::bail!("release_cooldown_days must be greater than 0");
        }

        if self.scheduling.reset_interval_days == 0 {
            anyhow::bail!("reset_interval_days must be greater than 0");
        }

        if !self.webhook.url.is_empty()
            && !self.webhook.url.starts_with("http://")
            && !self.webhook.url.starts_with("https://")
        {
            anyhow::bail!("webhook url must start with http:// or https://");
        }

        if self.webhook.timeout_secs == 0 {
            anyhow::bail!("webhook timeout_secs must be greater than 0");
        }

        if self.server.port == 0 {
            anyhow::bail!("server port must be greater than 0");
        }

        Ok(())
    }

    /// Get webhook timeout as Duration
    #[must_use]
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook.timeout_secs)
    }

    /// Whether outbound webhook delivery is configured
    #[must_use]
    pub fn webhook_enabled(&self) -> bool {
        !self.webhook.url.is_empty()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheduling: SchedulingConfig::default(),
            database: DatabaseConfig::default(),
            webhook: WebhookSettings::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            support_cooldown_days: 7,
            release_cooldown_days: 14,
            reset_interval_days: 90,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("rota.db"),
        }
    }
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            auth_token: None,
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("pretty"),
        }
    }
}
