//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dashboard::{HotIssue, PreventionTip};
use crate::forecast::Forecast;
use crate::surveillance::{DataSource, DiseaseClass, SourceEncoding};
use crate::triage::{ChatMessage, TriageReply};

// ============================================
// DATA SOURCE DTOs
// ============================================

/// Where the served data came from, without server paths or load errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSourceSummary {
    File {
        encoding: SourceEncoding,
        header_row: usize,
    },
    Fallback,
}

impl From<&DataSource> for DataSourceSummary {
    fn from(source: &DataSource) -> Self {
        match source {
            DataSource::File {
                encoding,
                header_row,
                ..
            } => DataSourceSummary::File {
                encoding: *encoding,
                header_row: *header_row,
            },
            DataSource::Fallback { .. } => DataSourceSummary::Fallback,
        }
    }
}

// ============================================
// OVERVIEW DTOs
// ============================================

/// Home page payload
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub reporting_year: i32,
    /// Latest month present in the data
    pub latest_month: Option<NaiveDate>,
    /// Set when placeholder data is being served
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
    pub data_source: DataSourceSummary,
    pub hot_issues: Vec<HotIssue>,
    pub prevention_tips: &'static [PreventionTip],
}

// ============================================
// DISEASE DTOs
// ============================================

/// Class list response
#[derive(Debug, Serialize)]
pub struct ClassesResponse {
    pub classes: Vec<DiseaseClass>,
}

/// Query parameters for listing diseases
#[derive(Debug, Deserialize)]
pub struct DiseasesParams {
    /// Restrict to one class label, e.g. "제2급"
    pub class: Option<String>,
}

/// Disease list response
#[derive(Debug, Serialize)]
pub struct DiseasesResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<DiseaseClass>,
    pub diseases: Vec<String>,
}

/// Query parameters for the class heatmap
#[derive(Debug, Deserialize)]
pub struct HeatmapParams {
    pub class: String,
}

// ============================================
// FORECAST DTOs
// ============================================

/// Query parameters for a forecast
#[derive(Debug, Deserialize)]
pub struct ForecastParams {
    /// Months to project; defaults to the configured horizon
    pub periods: Option<u32>,
}

/// Forecast response
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    #[serde(flatten)]
    pub forecast: Forecast,
    /// Human-readable peak sentence
    pub comment: Option<String>,
}

// ============================================
// CHAT DTOs
// ============================================

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Existing session to continue; a new one is opened when absent
    #[serde(default)]
    pub session_id: Option<Uuid>,
    pub message: String,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub reply: TriageReply,
    /// Full transcript including the greeting
    pub messages: Vec<ChatMessage>,
}

// ============================================
// DATA DTOs
// ============================================

/// Reload response
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    /// Cached datasets dropped
    pub invalidated: usize,
    /// Records in the freshly loaded dataset
    pub records: usize,
    pub data_source: DataSourceSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded"
    pub status: String,
    /// "file" or "fallback"
    pub data: String,
    /// Records in the current dataset
    pub records: usize,
    /// Open chat sessions
    pub chat_sessions: usize,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Server version
    pub version: String,
}
