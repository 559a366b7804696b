//! Personal Risk Scorer
//!
//! Fixed point-accumulation rules over age group, occupation, underlying
//! conditions and vaccinations. The score starts at 10, is clipped to
//! [0, 100] and banded at 40 and 70.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BASE_SCORE: i32 = 10;
const MEDIUM_THRESHOLD: u8 = 40;
const HIGH_THRESHOLD: u8 = 70;

/// Marker in warning titles that flags a high-risk warning
const HIGH_RISK_MARKER: &str = "고위험";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    UnderTen,
    Teens,
    TwentiesThirties,
    FortiesFifties,
    SixtyPlus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupation {
    Student,
    UnemployedRetired,
    Office,
    Healthcare,
    EducationChildcare,
    FoodService,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Diabetes,
    ChronicRespiratory,
    Liver,
    Immunocompromised,
    Cardiovascular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vaccine {
    Influenza,
    Pneumococcal,
    Hepatitis,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::UnderTen,
        AgeGroup::Teens,
        AgeGroup::TwentiesThirties,
        AgeGroup::FortiesFifties,
        AgeGroup::SixtyPlus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::UnderTen => "10대 미만",
            AgeGroup::Teens => "10대",
            AgeGroup::TwentiesThirties => "20-30대",
            AgeGroup::FortiesFifties => "40-50대",
            AgeGroup::SixtyPlus => "60대 이상",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            AgeGroup::UnderTen => "under_ten",
            AgeGroup::Teens => "teens",
            AgeGroup::TwentiesThirties => "twenties_thirties",
            AgeGroup::FortiesFifties => "forties_fifties",
            AgeGroup::SixtyPlus => "sixty_plus",
        }
    }
}

impl Occupation {
    pub const ALL: [Occupation; 6] = [
        Occupation::Student,
        Occupation::UnemployedRetired,
        Occupation::Office,
        Occupation::Healthcare,
        Occupation::EducationChildcare,
        Occupation::FoodService,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Occupation::Student => "학생",
            Occupation::UnemployedRetired => "무직/은퇴",
            Occupation::Office => "일반 사무직",
            Occupation::Healthcare => "의료 종사자",
            Occupation::EducationChildcare => "교육/보육 종사자",
            Occupation::FoodService => "요식업 종사자",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Occupation::Student => "student",
            Occupation::UnemployedRetired => "unemployed_retired",
            Occupation::Office => "office",
            Occupation::Healthcare => "healthcare",
            Occupation::EducationChildcare => "education_childcare",
            Occupation::FoodService => "food_service",
        }
    }
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::Diabetes,
        Condition::ChronicRespiratory,
        Condition::Liver,
        Condition::Immunocompromised,
        Condition::Cardiovascular,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Condition::Diabetes => "당뇨병",
            Condition::ChronicRespiratory => "만성 호흡기 질환",
            Condition::Liver => "간 질환",
            Condition::Immunocompromised => "면역 저하",
            Condition::Cardiovascular => "심혈관 질환",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Condition::Diabetes => "diabetes",
            Condition::ChronicRespiratory => "chronic_respiratory",
            Condition::Liver => "liver",
            Condition::Immunocompromised => "immunocompromised",
            Condition::Cardiovascular => "cardiovascular",
        }
    }
}

impl Vaccine {
    pub const ALL: [Vaccine; 3] = [Vaccine::Influenza, Vaccine::Pneumococcal, Vaccine::Hepatitis];

    pub fn label(&self) -> &'static str {
        match self {
            Vaccine::Influenza => "독감",
            Vaccine::Pneumococcal => "폐렴구균",
            Vaccine::Hepatitis => "간염",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Vaccine::Influenza => "influenza",
            Vaccine::Pneumococcal => "pneumococcal",
            Vaccine::Hepatitis => "hepatitis",
        }
    }
}

/// Error for an unrecognized choice label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownChoice {
    pub kind: &'static str,
    pub value: String,
}

// Each choice parses from its snake_case key or its Korean label
macro_rules! choice_from_str {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|c| c.key().eq_ignore_ascii_case(s) || c.label() == s)
                    .ok_or_else(|| UnknownChoice {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice_from_str!(AgeGroup, "age group");
choice_from_str!(Occupation, "occupation");
choice_from_str!(Condition, "condition");
choice_from_str!(Vaccine, "vaccine");

/// Answers from the personal health form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfile {
    pub age_group: AgeGroup,
    pub occupation: Occupation,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub vaccinations: Vec<Vaccine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn from_score(score: u8) -> Self {
        if score < MEDIUM_THRESHOLD {
            RiskBand::Low
        } else if score < HIGH_THRESHOLD {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBand::Low => write!(f, "low"),
            RiskBand::Medium => write!(f, "medium"),
            RiskBand::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskWarning {
    pub title: &'static str,
    pub message: &'static str,
    pub high_risk: bool,
}

impl RiskWarning {
    fn new(title: &'static str, message: &'static str) -> Self {
        Self {
            title,
            message,
            high_risk: title.contains(HIGH_RISK_MARKER),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    /// Vulnerability score in [0, 100]
    pub score: u8,
    pub band: RiskBand,
    pub warnings: Vec<RiskWarning>,
}

/// Score a profile against the rule table
pub fn assess(profile: &RiskProfile) -> RiskReport {
    let mut score = BASE_SCORE;
    let mut warnings = Vec::new();

    if profile.age_group == AgeGroup::UnderTen {
        score += 20;
        warnings.push(RiskWarning::new("소아 취약", "수두 주의"));
    }
    if profile.age_group == AgeGroup::SixtyPlus {
        score += 40;
        warnings.push(RiskWarning::new("고령층 고위험", "폐렴구균/독감 주의"));
    }
    if profile.conditions.contains(&Condition::Diabetes) {
        score += 30;
        warnings.push(RiskWarning::new("당뇨 고위험", "합병증 주의"));
    }

    if profile.occupation == Occupation::Healthcare {
        score += 20;
        warnings.push(RiskWarning::new("의료인", "감염 노출 주의"));
    }
    if profile.occupation == Occupation::Student {
        score += 10;
        warnings.push(RiskWarning::new("단체 생활", "유행성 질환 주의"));
    }
    if profile.occupation == Occupation::UnemployedRetired && profile.age_group == AgeGroup::SixtyPlus
    {
        score += 10;
        warnings.push(RiskWarning::new("가정 내 감염", "가족 간 전파 주의"));
    }

    if profile.vaccinations.contains(&Vaccine::Influenza) {
        score -= 10;
    }

    let score = score.clamp(0, 100) as u8;

    RiskReport {
        score,
        band: RiskBand::from_score(score),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(age_group: AgeGroup, occupation: Occupation) -> RiskProfile {
        RiskProfile {
            age_group,
            occupation,
            conditions: Vec::new(),
            vaccinations: Vec::new(),
        }
    }

    #[test]
    fn test_baseline_is_low() {
        let report = assess(&profile(AgeGroup::TwentiesThirties, Occupation::Office));
        assert_eq!(report.score, 10);
        assert_eq!(report.band, RiskBand::Low);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_flu_shot_can_reach_zero() {
        let mut p = profile(AgeGroup::FortiesFifties, Occupation::Office);
        p.vaccinations.push(Vaccine::Influenza);
        assert_eq!(assess(&p).score, 0);
    }

    #[test]
    fn test_elderly_retired_diabetic_is_high() {
        let mut p = profile(AgeGroup::SixtyPlus, Occupation::UnemployedRetired);
        p.conditions.push(Condition::Diabetes);

        let report = assess(&p);
        // 10 + 40 + 30 + 10
        assert_eq!(report.score, 90);
        assert_eq!(report.band, RiskBand::High);
        assert_eq!(report.warnings.len(), 3);
        assert_eq!(report.warnings.iter().filter(|w| w.high_risk).count(), 2);
    }

    #[test]
    fn test_score_clipped_to_hundred() {
        let mut p = profile(AgeGroup::SixtyPlus, Occupation::Healthcare);
        p.conditions.push(Condition::Diabetes);
        // 10 + 40 + 30 + 20 = 100
        assert_eq!(assess(&p).score, 100);
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(RiskBand::from_score(39), RiskBand::Low);
        assert_eq!(RiskBand::from_score(40), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(69), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(70), RiskBand::High);
    }

    #[test]
    fn test_child_student() {
        let report = assess(&profile(AgeGroup::UnderTen, Occupation::Student));
        assert_eq!(report.score, 40);
        assert_eq!(report.band, RiskBand::Medium);
        assert_eq!(report.warnings[0].title, "소아 취약");
        assert!(!report.warnings[0].high_risk);
    }

    #[test]
    fn test_conditions_without_rules_add_nothing() {
        let mut p = profile(AgeGroup::Teens, Occupation::FoodService);
        p.conditions = vec![Condition::Liver, Condition::Cardiovascular];
        p.vaccinations = vec![Vaccine::Hepatitis];
        assert_eq!(assess(&p).score, 10);
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!("sixty_plus".parse::<AgeGroup>().unwrap(), AgeGroup::SixtyPlus);
        assert_eq!("60대 이상".parse::<AgeGroup>().unwrap(), AgeGroup::SixtyPlus);
        assert_eq!("의료 종사자".parse::<Occupation>().unwrap(), Occupation::Healthcare);
        assert_eq!("Diabetes".parse::<Condition>().unwrap(), Condition::Diabetes);
        assert!("astronaut".parse::<Occupation>().is_err());
    }

    #[test]
    fn test_profile_deserializes() {
        let json = r#"{"age_group": "sixty_plus", "occupation": "office", "vaccinations": ["influenza"]}"#;
        let p: RiskProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.age_group, AgeGroup::SixtyPlus);
        assert!(p.conditions.is_empty());
        assert_eq!(assess(&p).score, 40);
    }
}
