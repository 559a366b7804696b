//! Forecast error types

use thiserror::Error;

/// Errors that can occur while fitting or projecting a series
#[derive(Error, Debug, PartialEq)]
pub enum ForecastError {
    /// Too few observations to fit a trend
    #[error("Insufficient data: need at least {required} points, found {found}")]
    InsufficientData { required: usize, found: usize },

    /// The normal equations could not be solved
    #[error("Model fit failed: singular system")]
    Singular,

    /// Forecast settings are out of range
    #[error("Invalid forecast configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for forecast operations
pub type ForecastResult<T> = Result<T, ForecastError>;
