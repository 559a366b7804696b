//! Core data types for surveillance records
//!
//! - `DiseaseClass`: statutory grade label ("1급".."4급")
//! - `Record`: one (month, class, disease, count) observation in long format
//! - `MonthlyCount`: a (month, count) pair used for per-disease series

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Statutory infectious-disease grade.
///
/// Ordered by the grade digit (an optional "제" prefix is skipped); labels without one sort after the
/// graded ones, lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiseaseClass(String);

impl DiseaseClass {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric grade from the label's leading digits, after an optional
    /// "제" prefix ("2급" -> 2, "제2급" -> 2)
    pub fn grade(&self) -> Option<u8> {
        let label = self.0.strip_prefix('제').unwrap_or(&self.0).trim_start();
        let digits: String = label.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

impl Ord for DiseaseClass {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.grade(), other.grade()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for DiseaseClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DiseaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DiseaseClass {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// A single monthly surveillance observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// First day of the reporting month
    pub date: NaiveDate,
    /// Statutory grade
    pub class: DiseaseClass,
    /// Disease name
    pub disease: String,
    /// Reported cases in the month
    pub count: u64,
}

impl Record {
    pub fn new(
        date: NaiveDate,
        class: impl Into<DiseaseClass>,
        disease: impl Into<String>,
        count: u64,
    ) -> Self {
        Self {
            date,
            class: class.into(),
            disease: disease.into(),
            count,
        }
    }

    /// Calendar month (1-12)
    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// Count for one month of a disease series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    pub date: NaiveDate,
    pub count: u64,
}

impl From<&Record> for MonthlyCount {
    fn from(record: &Record) -> Self {
        Self {
            date: record.date,
            count: record.count,
        }
    }
}

/// Text encoding a source file was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceEncoding {
    Utf8,
    Cp949,
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceEncoding::Utf8 => write!(f, "utf-8"),
            SourceEncoding::Cp949 => write!(f, "cp949"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_ordering_by_grade() {
        let mut classes: Vec<DiseaseClass> = ["4급", "1급", "기타", "3급", "2급"]
            .iter()
            .map(|&s| DiseaseClass::from(s))
            .collect();
        classes.sort();

        let labels: Vec<&str> = classes.iter().map(|c| c.as_str()).collect();
        assert_eq!(labels, vec!["1급", "2급", "3급", "4급", "기타"]);
    }

    #[test]
    fn test_report_style_labels_use_grade() {
        let mut classes: Vec<DiseaseClass> = ["제10급", "기타", "제2급", "제1급"]
            .iter()
            .map(|&s| DiseaseClass::from(s))
            .collect();
        classes.sort();

        let labels: Vec<&str> = classes.iter().map(|c| c.as_str()).collect();
        assert_eq!(labels, vec!["제1급", "제2급", "제10급", "기타"]);
        assert_eq!(DiseaseClass::from("제3급").grade(), Some(3));
        assert_eq!(DiseaseClass::from("제급").grade(), None);
    }

    #[test]
    fn test_class_label_is_trimmed() {
        let class = DiseaseClass::new("  2급 ");
        assert_eq!(class.as_str(), "2급");
        assert_eq!(class.grade(), Some(2));
    }

    #[test]
    fn test_class_serializes_as_string() {
        let json = serde_json::to_string(&DiseaseClass::from("3급")).unwrap();
        assert_eq!(json, "\"3급\"");
    }

    #[test]
    fn test_record_month() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let record = Record::new(date, "2급", "수두", 1_234);
        assert_eq!(record.month(), 7);
    }
}
