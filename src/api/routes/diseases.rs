//! Disease Routes
//!
//! - GET /api/v1/classes - Disease classes present in the data
//! - GET /api/v1/diseases - Diseases, optionally filtered by class
//! - GET /api/v1/diseases/:name - Monthly series and totals for one disease
//! - GET /api/v1/heatmap - Disease × month matrix for one class

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ClassesResponse, DiseasesParams, DiseasesResponse, HeatmapParams};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::{self, DiseaseSummary, Heatmap};
use crate::surveillance::{Dataset, DiseaseClass};

/// GET /api/v1/classes
pub async fn list_classes(State(state): State<Arc<AppState>>) -> Json<ClassesResponse> {
    let dataset = state.dataset().await;
    Json(ClassesResponse {
        classes: dataset.classes(),
    })
}

/// GET /api/v1/diseases?class=제2급
pub async fn list_diseases(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DiseasesParams>,
) -> ApiResult<Json<DiseasesResponse>> {
    let dataset = state.dataset().await;

    let class = params
        .class
        .map(|label| known_class(&dataset, &label))
        .transpose()?;

    let diseases = dataset
        .diseases(class.as_ref())
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(Json(DiseasesResponse { class, diseases }))
}

/// GET /api/v1/diseases/:name
pub async fn get_disease(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<DiseaseSummary>> {
    let dataset = state.dataset().await;

    dashboard::disease_summary(&dataset, &name)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Disease '{}' not found", name)))
}

/// GET /api/v1/heatmap?class=제2급
pub async fn get_heatmap(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HeatmapParams>,
) -> ApiResult<Json<Heatmap>> {
    let dataset = state.dataset().await;
    let class = known_class(&dataset, &params.class)?;

    Ok(Json(dashboard::class_heatmap(&dataset, &class)))
}

fn known_class(dataset: &Dataset, label: &str) -> ApiResult<DiseaseClass> {
    let label = label.trim();
    if label.is_empty() {
        return Err(ApiError::Validation("class must not be empty".to_string()));
    }

    let class = DiseaseClass::new(label);
    if dataset.classes().contains(&class) {
        Ok(class)
    } else {
        Err(ApiError::NotFound(format!("Class '{}' not found", label)))
    }
}
