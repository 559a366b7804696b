//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::DataConfig;
use crate::forecast::Forecaster;
use crate::surveillance::{Dataset, DatasetCache};
use crate::triage::SessionStore;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Where the surveillance CSV lives and which year it covers
    pub data: Arc<DataConfig>,
    /// Memoized datasets; cleared by the reload endpoint
    pub cache: Arc<DatasetCache>,
    /// Triage chat transcripts
    pub sessions: Arc<SessionStore>,
    /// Forecast model settings
    pub forecaster: Arc<Forecaster>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: ApiConfig, data: DataConfig, forecaster: Forecaster) -> Self {
        let sessions = SessionStore::new(config.max_chat_sessions)
            .with_max_messages(config.max_chat_messages);
        Self {
            config: Arc::new(config),
            data: Arc::new(data),
            cache: Arc::new(DatasetCache::new()),
            sessions: Arc::new(sessions),
            forecaster: Arc::new(forecaster),
            start_time: Instant::now(),
        }
    }

    /// Current dataset, loading (or falling back) on first use
    pub async fn dataset(&self) -> Arc<Dataset> {
        self.cache
            .get(&self.data.csv_path, self.data.reporting_year)
            .await
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Chat sessions kept in memory before the oldest is evicted
    #[serde(default = "default_max_chat_sessions")]
    pub max_chat_sessions: usize,
    /// Messages kept per chat transcript, greeting included
    #[serde(default = "default_max_chat_messages")]
    pub max_chat_messages: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_chat_sessions() -> usize {
    1000
}

fn default_max_chat_messages() -> usize {
    crate::triage::DEFAULT_MAX_MESSAGES
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            max_chat_sessions: default_max_chat_sessions(),
            max_chat_messages: default_max_chat_messages(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
