//! Symptom dictionary
//!
//! Hand-authored keyword table. Order matters: ties in keyword score go to
//! the category listed first.

use serde::Serialize;

/// A symptom category and what to suggest when it matches
#[derive(Debug, Serialize)]
pub struct SymptomCategory {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    /// Candidate diseases, most likely first
    pub candidates: &'static [&'static str],
    /// Recommended clinical department
    pub department: &'static str,
}

pub static SYMPTOM_CATEGORIES: &[SymptomCategory] = &[
    SymptomCategory {
        name: "호흡기 감염",
        keywords: &[
            "열", "기침", "가래", "콧물", "인후통", "목", "오한", "근육통", "숨", "폐렴", "감기",
            "독감",
        ],
        candidates: &["인플루엔자", "백일해", "폐렴구균"],
        department: "내과/이비인후과",
    },
    SymptomCategory {
        name: "소화기(장염)",
        keywords: &[
            "복통", "설사", "구토", "메스꺼움", "속", "체한", "배가", "장염", "식중독",
        ],
        candidates: &["A형간염", "노로바이러스", "장티푸스", "세균성이질"],
        department: "내과",
    },
    SymptomCategory {
        name: "피부 질환",
        keywords: &[
            "발진", "두드러기", "수포", "물집", "가려움", "피부", "따가움", "반점",
        ],
        candidates: &["수두", "홍역", "수족구병"],
        department: "피부과",
    },
    SymptomCategory {
        name: "발열성/매개체",
        keywords: &["벌레", "물린", "산", "진드기", "야외"],
        candidates: &["쯔쯔가무시증", "말라리아", "일본뇌염", "뎅기열"],
        department: "감염내과",
    },
    SymptomCategory {
        name: "성매개 감염",
        keywords: &["소변", "분비물", "성기", "매독", "임질"],
        candidates: &["매독", "임질", "성기단순포진"],
        department: "비뇨기과/산부인과",
    },
    SymptomCategory {
        name: "해외유입",
        keywords: &["여행", "해외", "공항", "귀국", "동남아", "아프리카"],
        candidates: &["뎅기열", "지카바이러스", "메르스"],
        department: "감염내과",
    },
];

impl SymptomCategory {
    /// Number of this category's keywords contained in `text`
    pub fn score(&self, text: &str) -> usize {
        self.keywords.iter().filter(|k| text.contains(*k)).count()
    }
}
