//! MediScope REST API
//!
//! HTTP API layer for MediScope, built with Axum. Serves the data behind
//! the dashboard pages: home overview, disease deep dive, forecast,
//! triage chat and personal risk form.
//!
//! # Endpoints
//!
//! ## Overview
//! - `GET /api/v1/overview` - Hot issues and prevention tips
//!
//! ## Diseases
//! - `GET /api/v1/classes` - Disease classes
//! - `GET /api/v1/diseases?class=` - Diseases, optionally by class
//! - `GET /api/v1/diseases/:name` - Monthly series for one disease
//! - `GET /api/v1/heatmap?class=` - Disease × month matrix
//!
//! ## Forecast
//! - `GET /api/v1/forecast/:name?periods=` - Monthly projection
//!
//! ## Chat and risk
//! - `POST /api/v1/chat` - Symptom triage
//! - `POST /api/v1/risk` - Personal risk score
//!
//! ## Data
//! - `POST /api/v1/data/reload` - Re-read the surveillance CSV
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use mediscope::api::{serve, AppState};
//! use mediscope::config::Config;
//! use mediscope::forecast::Forecaster;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let forecaster = Forecaster::new(config.forecast.clone())?;
//!
//!     let state = AppState::new(config.api.clone(), config.data.clone(), forecaster);
//!     serve(state, &config.api).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    let api_routes = Router::new()
        .route("/overview", get(routes::overview::get_overview))
        // Disease routes
        .route("/classes", get(routes::diseases::list_classes))
        .route("/diseases", get(routes::diseases::list_diseases))
        .route("/diseases/:name", get(routes::diseases::get_disease))
        .route("/heatmap", get(routes::diseases::get_heatmap))
        // Forecast
        .route("/forecast/:name", get(routes::forecast::get_forecast))
        // Chat and risk
        .route("/chat", post(routes::chat::post_chat))
        .route("/risk", post(routes::risk::assess_risk))
        // Data
        .route("/data/reload", post(routes::data::reload_data));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("MediScope API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("MediScope API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
