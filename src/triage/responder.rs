//! Keyword triage responder
//!
//! Scores free text against [`SYMPTOM_CATEGORIES`] and, on a match, picks
//! the candidate disease that currently shows up in the surveillance data.

use super::dictionary::{SymptomCategory, SYMPTOM_CATEGORIES};
use crate::surveillance::Dataset;
use serde::Serialize;

/// Reply when no keyword matched
pub const UNCLEAR_REPLY: &str =
    "증상이 명확하지 않습니다. '열이 나요', '배가 아파요' 처럼 구체적인 증상을 말씀해 주세요.";

/// Best-scoring category for a piece of text
#[derive(Debug, Clone, Copy)]
pub struct TriageMatch {
    pub category: &'static SymptomCategory,
    pub score: usize,
}

/// Outcome of triaging one message
#[derive(Debug, Clone, Serialize)]
pub struct TriageReply {
    pub category: Option<&'static str>,
    pub suggested_disease: Option<String>,
    pub department: Option<&'static str>,
    pub score: usize,
    pub message: String,
}

/// Opening assistant message of a chat session
pub fn greeting(reporting_year: i32) -> String {
    format!(
        "안녕하세요. 증상을 말씀해주시면 {}년 데이터와 대조하여 분석해 드립니다.",
        reporting_year
    )
}

/// Highest keyword score wins; the earlier category wins ties
pub fn classify(text: &str) -> Option<TriageMatch> {
    let mut best: Option<TriageMatch> = None;

    for category in SYMPTOM_CATEGORIES {
        let score = category.score(text);
        if score > best.map_or(0, |b| b.score) {
            best = Some(TriageMatch { category, score });
        }
    }

    best
}

/// Triage `text` against the current dataset
pub fn respond(text: &str, dataset: &Dataset) -> TriageReply {
    let Some(matched) = classify(text) else {
        return TriageReply {
            category: None,
            suggested_disease: None,
            department: None,
            score: 0,
            message: UNCLEAR_REPLY.to_string(),
        };
    };

    let category = matched.category;
    let disease = circulating_candidate(category, dataset)
        .or_else(|| category.candidates.first().copied())
        .unwrap_or(category.name);

    tracing::debug!(
        category = category.name,
        score = matched.score,
        disease = %disease,
        "Triage matched"
    );

    TriageReply {
        category: Some(category.name),
        suggested_disease: Some(disease.to_string()),
        department: Some(category.department),
        score: matched.score,
        message: format!(
            "분석 결과 **[{}]** 의심됩니다.\n데이터상 **{}** 유행 가능성이 높으니 **{}** 진료를 권장합니다.",
            category.name, disease, category.department
        ),
    }
}

/// First candidate reported in the latest month of the dataset
fn circulating_candidate(category: &SymptomCategory, dataset: &Dataset) -> Option<&'static str> {
    let latest = dataset.latest_month()?;

    category.candidates.iter().copied().find(|candidate| {
        dataset
            .records_at(latest)
            .any(|r| r.disease.contains(candidate))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surveillance::{DataSource, Record};
    use chrono::NaiveDate;

    fn dataset(diseases: &[&str]) -> Dataset {
        let date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let records = diseases
            .iter()
            .map(|d| Record::new(date, "2급", *d, 10))
            .collect();
        Dataset::new(
            records,
            DataSource::Fallback {
                reason: "test".to_string(),
            },
            2025,
        )
    }

    #[test]
    fn test_no_keywords_is_unclear() {
        assert!(classify("안녕하세요").is_none());

        let reply = respond("안녕하세요", &dataset(&[]));
        assert_eq!(reply.category, None);
        assert_eq!(reply.message, UNCLEAR_REPLY);
    }

    #[test]
    fn test_highest_score_wins() {
        // one respiratory keyword, two gastrointestinal ones
        let matched = classify("열도 있고 복통에 설사까지").unwrap();
        assert_eq!(matched.category.name, "소화기(장염)");
        assert_eq!(matched.score, 2);
    }

    #[test]
    fn test_tie_goes_to_first_category() {
        // "기침" is respiratory, "발진" is skin: one each
        let matched = classify("기침과 발진").unwrap();
        assert_eq!(matched.category.name, "호흡기 감염");
    }

    #[test]
    fn test_candidate_from_latest_data() {
        let data = dataset(&["백일해", "수두"]);
        let reply = respond("기침이 계속 나요", &data);

        assert_eq!(reply.category, Some("호흡기 감염"));
        assert_eq!(reply.suggested_disease.as_deref(), Some("백일해"));
        assert_eq!(reply.department, Some("내과/이비인후과"));
        assert!(reply.message.contains("**백일해**"));
    }

    #[test]
    fn test_candidate_defaults_to_first() {
        let reply = respond("물집이 생겼어요", &dataset(&["결핵"]));
        assert_eq!(reply.category, Some("피부 질환"));
        assert_eq!(reply.suggested_disease.as_deref(), Some("수두"));
    }

    #[test]
    fn test_greeting_mentions_year() {
        assert!(greeting(2025).contains("2025년"));
    }
}
