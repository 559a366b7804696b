//! Dashboard Data
//!
//! Derived views over a [`Dataset`] that the home and analytics pages render:
//! monthly hot issues, per-disease summaries, class heatmaps and the static
//! prevention briefing.

use crate::surveillance::{Dataset, DiseaseClass, MonthlyCount};
use chrono::{Months, NaiveDate};
use serde::Serialize;

/// Month-over-month direction of a disease count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Steady,
}

impl Trend {
    fn from_change(change: i64) -> Self {
        match change {
            c if c > 0 => Trend::Rising,
            c if c < 0 => Trend::Falling,
            _ => Trend::Steady,
        }
    }

    /// "▲ 1,234" / "▼ 56"; an unchanged count shows "▼ 0"
    pub fn label(&self, change: i64) -> String {
        let arrow = match self {
            Trend::Rising => "▲",
            Trend::Falling | Trend::Steady => "▼",
        };
        format!("{} {}", arrow, format_count(change.unsigned_abs()))
    }
}

/// One of the top diseases in the latest reporting month
#[derive(Debug, Clone, Serialize)]
pub struct HotIssue {
    pub class: DiseaseClass,
    pub disease: String,
    pub month: NaiveDate,
    pub count: u64,
    /// Count in the previous month, if reported
    pub previous: Option<u64>,
    /// Difference against the previous month (0 when unknown)
    pub change: i64,
    pub trend: Trend,
}

/// Deep-dive numbers for a single disease
#[derive(Debug, Clone, Serialize)]
pub struct DiseaseSummary {
    pub disease: String,
    pub class: DiseaseClass,
    /// Sum over the reporting year
    pub total: u64,
    pub latest: Option<MonthlyCount>,
    pub series: Vec<MonthlyCount>,
}

/// Disease × month intensity matrix for one class
#[derive(Debug, Clone, Serialize)]
pub struct Heatmap {
    pub class: DiseaseClass,
    /// Column labels ("01월".."12월")
    pub months: Vec<String>,
    pub rows: Vec<HeatmapRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapRow {
    pub disease: String,
    /// One value per entry of [`Heatmap::months`]
    pub counts: Vec<u64>,
}

/// Static briefing card
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PreventionTip {
    pub title: &'static str,
    pub body: &'static str,
}

const PREVENTION_TIPS: [PreventionTip; 2] = [
    PreventionTip {
        title: "올바른 손 씻기",
        body: "감염병 70% 예방 효과가 있습니다.",
    },
    PreventionTip {
        title: "백신 접종",
        body: "독감, 폐렴구균 접종을 확인하세요.",
    },
];

/// Top `limit` diseases of the latest month with a positive count
pub fn hot_issues(dataset: &Dataset, limit: usize) -> Vec<HotIssue> {
    let Some(latest) = dataset.latest_month() else {
        return Vec::new();
    };
    let previous_month = latest.checked_sub_months(Months::new(1));

    let mut candidates: Vec<_> = dataset.records_at(latest).filter(|r| r.count > 0).collect();
    candidates.sort_by(|a, b| b.count.cmp(&a.count));

    candidates
        .into_iter()
        .take(limit)
        .map(|record| {
            let previous = previous_month.and_then(|month| {
                dataset
                    .records_at(month)
                    .find(|r| r.disease == record.disease)
                    .map(|r| r.count)
            });
            let change = previous.map_or(0, |p| record.count as i64 - p as i64);

            HotIssue {
                class: record.class.clone(),
                disease: record.disease.clone(),
                month: latest,
                count: record.count,
                previous,
                change,
                trend: Trend::from_change(change),
            }
        })
        .collect()
}

/// Summary of one disease, or `None` if the dataset does not know it
pub fn disease_summary(dataset: &Dataset, disease: &str) -> Option<DiseaseSummary> {
    let records = dataset.disease_records(disease);
    let first = records.first()?;

    let series: Vec<MonthlyCount> = records.iter().copied().map(MonthlyCount::from).collect();

    Some(DiseaseSummary {
        disease: disease.to_string(),
        class: first.class.clone(),
        total: series.iter().map(|m| m.count).sum(),
        latest: series.last().copied(),
        series,
    })
}

/// Heatmap of every disease in `class`, one column per reported month
pub fn class_heatmap(dataset: &Dataset, class: &DiseaseClass) -> Heatmap {
    let mut months: Vec<NaiveDate> = dataset
        .records
        .iter()
        .filter(|r| r.class == *class)
        .map(|r| r.date)
        .collect();
    months.sort();
    months.dedup();

    let rows = dataset
        .diseases(Some(class))
        .into_iter()
        .map(|disease| {
            let counts = months
                .iter()
                .map(|month| {
                    dataset
                        .records_at(*month)
                        .filter(|r| r.class == *class && r.disease == disease)
                        .map(|r| r.count)
                        .sum()
                })
                .collect();
            HeatmapRow {
                disease: disease.to_string(),
                counts,
            }
        })
        .collect();

    Heatmap {
        class: class.clone(),
        months: months.iter().map(|m| m.format("%m월").to_string()).collect(),
        rows,
    }
}

pub fn prevention_tips() -> &'static [PreventionTip] {
    &PREVENTION_TIPS
}

/// Format a count with comma thousands separators
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surveillance::{DataSource, Record};

    fn date(month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, 1).unwrap()
    }

    fn dataset(records: Vec<Record>) -> Dataset {
        Dataset::new(
            records,
            DataSource::Fallback {
                reason: "test".to_string(),
            },
            2025,
        )
    }

    fn sample() -> Dataset {
        dataset(vec![
            Record::new(date(11), "2급", "수두", 300),
            Record::new(date(12), "2급", "수두", 250),
            Record::new(date(11), "2급", "결핵", 1_000),
            Record::new(date(12), "2급", "결핵", 1_500),
            Record::new(date(12), "3급", "파상풍", 0),
            Record::new(date(11), "3급", "B형간염", 40),
            Record::new(date(12), "3급", "B형간염", 40),
            Record::new(date(12), "1급", "디프테리아", 1),
        ])
    }

    #[test]
    fn test_hot_issues_ranked_by_latest_count() {
        let issues = hot_issues(&sample(), 3);
        let names: Vec<&str> = issues.iter().map(|i| i.disease.as_str()).collect();
        assert_eq!(names, vec!["결핵", "수두", "B형간염"]);

        assert_eq!(issues[0].change, 500);
        assert_eq!(issues[0].trend, Trend::Rising);
        assert_eq!(issues[1].change, -50);
        assert_eq!(issues[1].trend, Trend::Falling);
        assert_eq!(issues[2].trend, Trend::Steady);
    }

    #[test]
    fn test_hot_issues_skip_zero_counts() {
        let issues = hot_issues(&sample(), 10);
        assert!(issues.iter().all(|i| i.count > 0));
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_hot_issue_without_previous_month() {
        let issues = hot_issues(&sample(), 10);
        let diphtheria = issues.iter().find(|i| i.disease == "디프테리아").unwrap();
        assert_eq!(diphtheria.previous, None);
        assert_eq!(diphtheria.change, 0);
    }

    #[test]
    fn test_hot_issues_empty_dataset() {
        assert!(hot_issues(&dataset(Vec::new()), 3).is_empty());
    }

    #[test]
    fn test_disease_summary() {
        let summary = disease_summary(&sample(), "결핵").unwrap();
        assert_eq!(summary.class.as_str(), "2급");
        assert_eq!(summary.total, 2_500);
        assert_eq!(summary.latest.unwrap().count, 1_500);
        assert_eq!(summary.series.len(), 2);

        assert!(disease_summary(&sample(), "없는병").is_none());
    }

    #[test]
    fn test_class_heatmap() {
        let heatmap = class_heatmap(&sample(), &DiseaseClass::from("3급"));
        assert_eq!(heatmap.months, vec!["11월", "12월"]);
        assert_eq!(heatmap.rows.len(), 2);

        let hepatitis = heatmap.rows.iter().find(|r| r.disease == "B형간염").unwrap();
        assert_eq!(hepatitis.counts, vec![40, 40]);

        let tetanus = heatmap.rows.iter().find(|r| r.disease == "파상풍").unwrap();
        assert_eq!(tetanus.counts, vec![0, 0]);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_trend_label() {
        assert_eq!(Trend::Rising.label(1_200), "▲ 1,200");
        assert_eq!(Trend::Falling.label(-50), "▼ 50");
        assert_eq!(Trend::Steady.label(0), "▼ 0");
    }
}
