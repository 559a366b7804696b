//! Risk Route
//!
//! - POST /api/v1/risk - Score a personal health profile

use axum::Json;

use crate::risk::{self, RiskProfile, RiskReport};

/// POST /api/v1/risk
pub async fn assess_risk(Json(profile): Json<RiskProfile>) -> Json<RiskReport> {
    let report = risk::assess(&profile);
    tracing::debug!(score = report.score, warnings = report.warnings.len(), "Risk assessed");
    Json(report)
}
