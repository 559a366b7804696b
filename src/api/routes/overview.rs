//! Overview Route
//!
//! - GET /api/v1/overview - Hot issues of the latest month and prevention tips

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{DataSourceSummary, OverviewResponse};
use crate::api::state::AppState;
use crate::dashboard;

/// GET /api/v1/overview
pub async fn get_overview(State(state): State<Arc<AppState>>) -> Json<OverviewResponse> {
    let dataset = state.dataset().await;
    let hot_issues = dashboard::hot_issues(&dataset, state.data.hot_issue_count);

    tracing::debug!(count = hot_issues.len(), "Overview built");

    Json(OverviewResponse {
        reporting_year: dataset.reporting_year,
        latest_month: dataset.latest_month(),
        notice: dataset.notice(),
        data_source: DataSourceSummary::from(&dataset.source),
        hot_issues,
        prevention_tips: dashboard::prevention_tips(),
    })
}
