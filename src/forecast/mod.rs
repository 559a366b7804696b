//! Forecasting
//!
//! Projects a disease's monthly counts into the next year with an additive
//! linear-trend + yearly-seasonality model.
//!
//! - **model**: the regression model and its solver
//! - **forecaster**: series → [`Forecast`] (history fit, projections, peak)
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use mediscope::forecast::Forecaster;
//! use mediscope::surveillance::load_or_fallback;
//! use std::path::Path;
//!
//! let dataset = load_or_fallback(Path::new("surveillance.csv"), 2025);
//! let forecast = Forecaster::default().forecast("수두", &dataset.series("수두"))?;
//! if let Some(comment) = forecast.peak_comment() {
//!     println!("{}", comment);
//! }
//! # Ok::<(), mediscope::forecast::ForecastError>(())
//! ```

pub mod error;
pub mod forecaster;
pub mod model;

pub use error::{ForecastError, ForecastResult};
pub use forecaster::{Forecast, ForecastConfig, ForecastPoint, Forecaster, SeasonalPoint};
pub use model::AdditiveModel;
