//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::client::ClientConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub identity: IdentityConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analytics backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Where the anonymous identifier is persisted
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("pgrkam").to_string_lossy().to_string())
        .unwrap_or_else(|| "./pgrkam_data".to_string())
}

fn default_storage_key() -> String {
    "pgrkam_uid".to_string()
}

impl IdentityConfig {
    /// Data directory with a leading `~/` expanded to the home directory
    pub fn data_path(&self) -> PathBuf {
        match (self.data_dir.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.data_dir),
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
        }
    }
}

/// Demographic profile and page label reported on mount
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_gender")]
    pub gender: String,

    #[serde(default = "default_location")]
    pub location: String,

    #[serde(default = "default_education")]
    pub education: String,

    #[serde(default = "default_skills")]
    pub skills: Vec<String>,

    #[serde(default = "default_channel")]
    pub channel: String,

    #[serde(default = "default_page")]
    pub page: String,
}

fn default_gender() -> String {
    "prefer_not_to_say".to_string()
}

fn default_location() -> String {
    "Demo City".to_string()
}

fn default_education() -> String {
    "Graduate".to_string()
}

fn default_skills() -> Vec<String> {
    vec![
        "javascript".to_string(),
        "react".to_string(),
        "python".to_string(),
    ]
}

fn default_channel() -> String {
    "Website".to_string()
}

fn default_page() -> String {
    "dashboard".to_string()
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            gender: default_gender(),
            location: default_location(),
            education: default_education(),
            skills: default_skills(),
            channel: default_channel(),
            page: default_page(),
        }
    }
}

/// Dashboard view configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,

    /// Automatic refresh period; 0 means manual refresh only
    #[serde(default)]
    pub refresh_interval_secs: u64,
}

fn default_bar_width() -> usize {
    30
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
            refresh_interval_secs: 0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, the default locations, or the environment
    pub fn load_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_with_env(path);
        }

        let config_paths = [
            dirs::config_dir().map(|p| p.join("pgrkam").join("config.toml")),
            Some(PathBuf::from("./pgrkam.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::from_env())
    }

    /// Backend base URL without a trailing slash
    pub fn backend_url(&self) -> &str {
        self.backend.url.trim_end_matches('/')
    }

    /// HTTP client settings for the configured backend
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.backend_url().to_string(),
            request_timeout_ms: self.backend.request_timeout_secs.saturating_mul(1000),
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PGRKAM_BACKEND_URL") {
            if !url.is_empty() {
                self.backend.url = url;
            }
        }

        if let Ok(data_dir) = std::env::var("PGRKAM_DATA_DIR") {
            self.identity.data_dir = data_dir;
        }

        if let Ok(level) = std::env::var("PGRKAM_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PGRKAM_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# PGRKAM Analytics Dashboard Configuration
#
# Environment variables override these settings:
# - PGRKAM_BACKEND_URL
# - PGRKAM_DATA_DIR
# - PGRKAM_LOG_LEVEL
# - PGRKAM_LOG_FORMAT

[backend]
# Analytics backend base URL
url = "http://localhost:8000"

# Request timeout in seconds
request_timeout_secs = 30

[identity]
# Directory holding the local key-value store
data_dir = "~/.local/share/pgrkam"

# Key under which the anonymous identifier is stored
storage_key = "pgrkam_uid"

[profile]
# Demo demographics reported when the dashboard opens
gender = "prefer_not_to_say"
location = "Demo City"
education = "Graduate"
skills = ["javascript", "react", "python"]
channel = "Website"
page = "dashboard"

[dashboard]
# Width of proportion bars in characters
bar_width = 30

# Automatic refresh period in seconds (0 = manual only)
refresh_interval_secs = 0

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
