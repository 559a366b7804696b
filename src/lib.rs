//! # MediScope
//!
//! Statutory infectious-disease surveillance for Korea. Turns the monthly
//! KDCA report export into dashboard data, forecasts and triage hints.
//!
//! ## Features
//!
//! - **Tolerant import**: UTF-8 or CP949 CSV, header found in the first rows,
//!   merged class cells forward-filled, subtotal rows dropped
//! - **Placeholder data**: a synthetic dataset keeps the dashboard up when
//!   the file is missing or malformed
//! - **Forecasting**: additive trend + yearly seasonality model with
//!   uncertainty bands
//! - **Triage**: keyword symptom classifier cross-checked with the data
//! - **Risk scoring**: rule table over age, occupation, conditions and
//!   vaccinations
//!
//! ## Modules
//!
//! - [`surveillance`]: CSV normalization, dataset and cache
//! - [`dashboard`]: Hot issues, disease summaries and heatmaps
//! - [`forecast`]: Monthly projections
//! - [`triage`]: Symptom chat
//! - [`risk`]: Personal risk score
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mediscope::surveillance::load_or_fallback;
//! use mediscope::dashboard::hot_issues;
//! use mediscope::forecast::Forecaster;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = load_or_fallback(Path::new("surveillance.csv"), 2025);
//!
//!     for issue in hot_issues(&dataset, 3) {
//!         println!("{} {}명", issue.disease, issue.count);
//!     }
//!
//!     let forecast = Forecaster::default().forecast("수두", &dataset.series("수두"))?;
//!     if let Some(comment) = forecast.peak_comment() {
//!         println!("{}", comment);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod forecast;
pub mod risk;
pub mod surveillance;
pub mod triage;

// Re-export top-level types for convenience
pub use surveillance::{
    load_or_fallback, DataSource, Dataset, DatasetCache, DiseaseClass, LoadError, LoadResult,
    MonthlyCount, Normalizer, Record, SourceEncoding,
};

pub use dashboard::{DiseaseSummary, Heatmap, HotIssue, Trend};

pub use forecast::{Forecast, ForecastConfig, ForecastError, ForecastPoint, Forecaster};

pub use triage::{ChatSession, SessionStore, TriageReply};

pub use risk::{RiskBand, RiskProfile, RiskReport};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, DataConfig, LoggingConfig};
