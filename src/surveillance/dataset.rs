//! Dataset
//!
//! The normalized record table together with where it came from. A dataset
//! is immutable once built; reloading produces a new one.

use super::mock;
use super::normalizer::Normalizer;
use super::types::{DiseaseClass, MonthlyCount, Record, SourceEncoding};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// User-facing message shown while placeholder data is served
pub const FALLBACK_NOTICE: &str =
    "데이터 파일을 불러오지 못해 예시 데이터를 표시합니다.";

/// Provenance of a dataset
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// Normalized from a CSV file
    File {
        path: PathBuf,
        encoding: SourceEncoding,
        header_row: usize,
        rows_skipped: usize,
    },
    /// Synthetic placeholder data; `reason` is the load error
    Fallback { reason: String },
}

/// Long-format surveillance table for one reporting year
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub source: DataSource,
    pub reporting_year: i32,
    pub loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(records: Vec<Record>, source: DataSource, reporting_year: i32) -> Self {
        Self {
            records,
            source,
            reporting_year,
            loaded_at: Utc::now(),
        }
    }

    /// Whether placeholder data is being served
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, DataSource::Fallback { .. })
    }

    /// Generic notice for clients when the real data is unavailable
    pub fn notice(&self) -> Option<&'static str> {
        self.is_fallback().then_some(FALLBACK_NOTICE)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Distinct classes in grade order
    pub fn classes(&self) -> Vec<DiseaseClass> {
        let mut classes: Vec<DiseaseClass> = self.records.iter().map(|r| r.class.clone()).collect();
        classes.sort();
        classes.dedup();
        classes
    }

    /// Distinct disease names in first-seen order, optionally within one class
    pub fn diseases(&self, class: Option<&DiseaseClass>) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.records {
            if class.is_some_and(|c| *c != record.class) {
                continue;
            }
            if !names.contains(&record.disease.as_str()) {
                names.push(&record.disease);
            }
        }
        names
    }

    pub fn contains_disease(&self, disease: &str) -> bool {
        self.records.iter().any(|r| r.disease == disease)
    }

    /// Most recent reporting month
    pub fn latest_month(&self) -> Option<NaiveDate> {
        self.records.iter().map(|r| r.date).max()
    }

    /// Records reported for the given month
    pub fn records_at(&self, date: NaiveDate) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(move |r| r.date == date)
    }

    /// Records of one disease, ordered by month
    pub fn disease_records(&self, disease: &str) -> Vec<&Record> {
        let mut records: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| r.disease == disease)
            .collect();
        records.sort_by_key(|r| r.date);
        records
    }

    /// Monthly series of one disease, ordered by month
    pub fn series(&self, disease: &str) -> Vec<MonthlyCount> {
        self.disease_records(disease)
            .into_iter()
            .map(MonthlyCount::from)
            .collect()
    }
}

/// Normalize `path`, or serve the placeholder dataset if anything fails.
///
/// Never fails: the load error is logged and kept as the fallback reason.
pub fn load_or_fallback(path: &Path, reporting_year: i32) -> Dataset {
    let normalizer = Normalizer::new(reporting_year);

    match normalizer.normalize_file(path) {
        Ok(normalized) => {
            tracing::info!(
                path = %path.display(),
                records = normalized.records.len(),
                encoding = %normalized.encoding,
                "Loaded surveillance data"
            );
            Dataset::new(
                normalized.records,
                DataSource::File {
                    path: path.to_path_buf(),
                    encoding: normalized.encoding,
                    header_row: normalized.header_row,
                    rows_skipped: normalized.rows_skipped,
                },
                reporting_year,
            )
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to load surveillance data, serving placeholder dataset"
            );
            Dataset::new(
                mock::generate_placeholder(reporting_year),
                DataSource::Fallback {
                    reason: e.to_string(),
                },
                reporting_year,
            )
        }
    }
}
