//! MediScope API Server
//!
//! Run with: cargo run --bin mediscope
//!
//! # Configuration
//!
//! Settings come from `MEDISCOPE_CONFIG` (a TOML file) or the default
//! config locations, then environment overrides:
//! - `MEDISCOPE_CSV_PATH`: Surveillance CSV
//! - `MEDISCOPE_REPORTING_YEAR`: Year of the monthly columns (default: 2025)
//! - `MEDISCOPE_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `MEDISCOPE_API_PORT`: Port to listen on (default: 8501)
//! - `MEDISCOPE_LOG_LEVEL`: Log level (default: info)
//! - `MEDISCOPE_LOG_FORMAT`: pretty or json (default: pretty)
//! - `RUST_LOG`: Full filter directive, overrides the log level

use mediscope::api::{serve, AppState};
use mediscope::config::{Config, LoggingConfig};
use mediscope::forecast::Forecaster;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::var("MEDISCOPE_CONFIG") {
        Ok(path) => Config::load_with_env(&PathBuf::from(path))?,
        Err(_) => Config::load_default(),
    };

    init_tracing(&config.logging);

    tracing::info!("Starting MediScope API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Surveillance data: {:?}", config.data.csv_path);
    tracing::info!("Reporting year: {}", config.data.reporting_year);

    let forecaster = Forecaster::new(config.forecast.clone())?;
    let state = AppState::new(config.api.clone(), config.data.clone(), forecaster);

    // Warm the cache so the first page view does not pay for the import
    let dataset = state.dataset().await;
    if dataset.is_fallback() {
        tracing::warn!("Serving placeholder data until the CSV is fixed and reloaded");
    } else {
        tracing::info!(
            "Loaded {} records across {} classes",
            dataset.len(),
            dataset.classes().len()
        );
    }

    tracing::info!("Starting server on {}:{}", config.api.host, config.api.port);
    serve(state, &config.api).await?;

    tracing::info!("MediScope API server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter_directive().into());

    let registry = tracing_subscriber::registry().with(filter);

    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
