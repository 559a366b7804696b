//! Forecast Route
//!
//! - GET /api/v1/forecast/:name - Project a disease's monthly counts

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ForecastParams, ForecastResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// Longest horizon a client may request
pub const MAX_FORECAST_PERIODS: u32 = 36;

/// GET /api/v1/forecast/:name?periods=12
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<ForecastParams>,
) -> ApiResult<Json<ForecastResponse>> {
    let periods = params
        .periods
        .unwrap_or(state.forecaster.config().periods);
    if periods == 0 || periods > MAX_FORECAST_PERIODS {
        return Err(ApiError::Validation(format!(
            "periods must be between 1 and {}",
            MAX_FORECAST_PERIODS
        )));
    }

    let dataset = state.dataset().await;
    if !dataset.contains_disease(&name) {
        return Err(ApiError::NotFound(format!("Disease '{}' not found", name)));
    }

    let series = dataset.series(&name);
    let forecast = state.forecaster.forecast_periods(&name, &series, periods)?;

    tracing::info!(
        disease = %name,
        periods,
        history = forecast.history.len(),
        "Forecast generated"
    );

    let comment = forecast.peak_comment();
    Ok(Json(ForecastResponse { forecast, comment }))
}
