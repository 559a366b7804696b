//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::api::ApiConfig;
use crate::forecast::ForecastConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Surveillance data source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,

    #[serde(default = "default_reporting_year")]
    pub reporting_year: i32,

    /// Rows shown on the home page hot-issue strip
    #[serde(default = "default_hot_issue_count")]
    pub hot_issue_count: usize,
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("법정감염병_월별_신고현황_20251201171522.csv")
}

fn default_reporting_year() -> i32 {
    2025
}

fn default_hot_issue_count() -> usize {
    3
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            reporting_year: default_reporting_year(),
            hot_issue_count: default_hot_issue_count(),
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

impl LoggingConfig {
    /// Filter directive for `tracing_subscriber::EnvFilter`
    pub fn filter_directive(&self) -> String {
        format!("mediscope={},tower_http=debug", self.level)
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })?;

        config
            .forecast
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(config)
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

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("mediscope").join("config.toml")),
            Some(PathBuf::from("/etc/mediscope/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Data overrides
        if let Ok(path) = std::env::var("MEDISCOPE_CSV_PATH") {
            self.data.csv_path = PathBuf::from(path);
        }
        if let Ok(year) = std::env::var("MEDISCOPE_REPORTING_YEAR") {
            if let Ok(y) = year.parse() {
                self.data.reporting_year = y;
            }
        }

        // API overrides
        if let Ok(host) = std::env::var("MEDISCOPE_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("MEDISCOPE_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("MEDISCOPE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("MEDISCOPE_LOG_FORMAT") {
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

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# MediScope Configuration
#
# Environment variables override these settings:
# - MEDISCOPE_CSV_PATH
# - MEDISCOPE_REPORTING_YEAR
# - MEDISCOPE_API_HOST
# - MEDISCOPE_API_PORT
# - MEDISCOPE_LOG_LEVEL
# - MEDISCOPE_LOG_FORMAT

[data]
# Monthly statutory infectious-disease report (UTF-8 or CP949)
csv_path = "법정감염병_월별_신고현황_20251201171522.csv"

# Year the monthly columns belong to
reporting_year = 2025

# Number of diseases on the home page hot-issue strip
hot_issue_count = 3

[forecast]
# Months to project past the last observation
periods = 12

# Maximum Fourier order of the yearly seasonality
fourier_order = 3

# Width of the uncertainty interval, between 0 and 1
interval_width = 0.8

# Ridge penalty on the trend slope and seasonal terms
regularization = 0.01

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8501

# Request timeout in seconds
request_timeout_secs = 30

# Maximum concurrent chat sessions kept in memory
max_chat_sessions = 1000

# Messages kept per chat transcript, oldest turns dropped first
max_chat_messages = 50

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
