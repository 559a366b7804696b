//! Data Route
//!
//! - POST /api/v1/data/reload - Drop cached datasets and reload the CSV

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{DataSourceSummary, ReloadResponse};
use crate::api::state::AppState;

/// POST /api/v1/data/reload
pub async fn reload_data(State(state): State<Arc<AppState>>) -> Json<ReloadResponse> {
    let invalidated = state.cache.invalidate().await;
    let dataset = state.dataset().await;

    tracing::info!(
        invalidated,
        records = dataset.len(),
        fallback = dataset.is_fallback(),
        "Dataset reloaded"
    );

    Json(ReloadResponse {
        invalidated,
        records: dataset.len(),
        data_source: DataSourceSummary::from(&dataset.source),
        notice: dataset.notice(),
    })
}
