use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::domain::FeedKind;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the read API
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port (the `PORT` env var overrides it)
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Notify endpoint shared by both feeds
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_platform_id")]
    pub platform_id: String,
    /// Game id of the standard feed
    #[serde(default = "default_standard_gid")]
    pub standard_gid: String,
    /// Game id of the MD5 feed
    #[serde(default = "default_md5_gid")]
    pub md5_gid: String,
    /// Per-request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://jakpotgwab.geightdors.net/glms/v1/notify/taixiu".to_string()
}

fn default_platform_id() -> String {
    "g8".to_string()
}

fn default_standard_gid() -> String {
    "vgmn_100".to_string()
}

fn default_md5_gid() -> String {
    "vgmn_101".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            platform_id: default_platform_id(),
            standard_gid: default_standard_gid(),
            md5_gid: default_md5_gid(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl UpstreamConfig {
    pub fn gid(&self, kind: FeedKind) -> &str {
        match kind {
            FeedKind::Standard => &self.standard_gid,
            FeedKind::Md5 => &self.md5_gid,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    /// Delay between successful polls in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Delay after a failed poll in milliseconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

fn default_poll_interval() -> u64 {
    5_000
}

fn default_retry_delay() -> u64 {
    5_000
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            retry_delay_ms: default_retry_delay(),
        }
    }
}

impl PollerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Rounds kept per feed
    #[serde(default = "default_max_len")]
    pub max_len: usize,
}

fn default_max_len() -> usize {
    crate::services::MAX_HISTORY
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_len: default_max_len(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            poller: PollerConfig::default(),
            history: HistoryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let mut builder = Config::builder()
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("TAIXIU_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (TAIXIU__SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("TAIXIU")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        // Bare PORT wins, as hosting platforms set it
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server.host.trim().is_empty() {
            errors.push("server.host must not be empty".to_string());
        }

        if !self.upstream.base_url.starts_with("http://")
            && !self.upstream.base_url.starts_with("https://")
        {
            errors.push(format!(
                "upstream.base_url must be an http(s) URL, got {}",
                self.upstream.base_url
            ));
        }

        if self.upstream.standard_gid == self.upstream.md5_gid {
            errors.push("upstream.standard_gid and upstream.md5_gid must differ".to_string());
        }

        if self.upstream.request_timeout_ms == 0 {
            errors.push("upstream.request_timeout_ms must be positive".to_string());
        }

        if self.poller.poll_interval_ms == 0 || self.poller.retry_delay_ms == 0 {
            errors.push("poller intervals must be positive".to_string());
        }

        if self.history.max_len == 0 {
            errors.push("history.max_len must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
