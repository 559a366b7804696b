use chrono::{Datelike, NaiveDate};
use mediscope::forecast::Forecaster;
use mediscope::risk::{self, AgeGroup, Condition, Occupation, RiskBand, RiskProfile, Vaccine};
use mediscope::surveillance::{parse_count, MonthlyCount, Normalizer, SourceEncoding};
use proptest::prelude::*;

const HEADER: &str = "급,질병,계,1월,2월,3월,4월,5월,6월,7월,8월,9월,10월,11월,12월";

fn with_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn table(rows: &[[u64; 12]]) -> String {
    let mut csv = format!("{}\n", HEADER);
    for (i, counts) in rows.iter().enumerate() {
        let class = if i == 0 { "제2급" } else { "" };
        let cells: Vec<String> = counts
            .iter()
            .map(|c| format!("\"{}\"", with_thousands(*c)))
            .collect();
        csv.push_str(&format!("{},질병{},0,{}\n", class, i, cells.join(",")));
    }
    csv
}

proptest! {
    #[test]
    fn thousands_separators_are_ignored(n in 0u64..10_000_000_000) {
        prop_assert_eq!(parse_count(&with_thousands(n)), n);
    }

    #[test]
    fn every_disease_gets_twelve_months(rows in prop::collection::vec(prop::array::uniform12(0u64..100_000), 1..20)) {
        let normalized = Normalizer::new(2025).normalize_bytes(table(&rows).as_bytes()).unwrap();

        prop_assert_eq!(normalized.records.len(), rows.len() * 12);
        prop_assert!(normalized.records.iter().all(|r| r.date.year() == 2025 && r.date.day() == 1));

        for (i, counts) in rows.iter().enumerate() {
            let disease = format!("질병{}", i);
            let total: u64 = normalized
                .records
                .iter()
                .filter(|r| r.disease == disease)
                .map(|r| r.count)
                .sum();
            prop_assert_eq!(total, counts.iter().sum::<u64>());
        }
    }

    #[test]
    fn cp949_matches_utf8(rows in prop::collection::vec(prop::array::uniform12(0u64..5_000), 1..8)) {
        let utf8 = table(&rows);
        let (cp949, _, unmappable) = encoding_rs::EUC_KR.encode(&utf8);
        prop_assume!(!unmappable);

        let normalizer = Normalizer::new(2025);
        let from_utf8 = normalizer.normalize_bytes(utf8.as_bytes()).unwrap();
        let from_cp949 = normalizer.normalize_bytes(&cp949).unwrap();

        prop_assert_eq!(from_utf8.encoding, SourceEncoding::Utf8);
        prop_assert_eq!(from_cp949.encoding, SourceEncoding::Cp949);
        prop_assert_eq!(from_utf8.records, from_cp949.records);
    }

    #[test]
    fn risk_score_is_bounded(
        age_group in prop::sample::select(AgeGroup::ALL.to_vec()),
        occupation in prop::sample::select(Occupation::ALL.to_vec()),
        conditions in prop::sample::subsequence(Condition::ALL.to_vec(), 0..=Condition::ALL.len()),
        vaccinations in prop::sample::subsequence(Vaccine::ALL.to_vec(), 0..=Vaccine::ALL.len()),
    ) {
        let report = risk::assess(&RiskProfile { age_group, occupation, conditions, vaccinations });

        prop_assert!(report.score <= 100);
        prop_assert_eq!(report.band, RiskBand::from_score(report.score));
    }

    #[test]
    fn forecast_bands_are_ordered(counts in prop::collection::vec(0u64..5_000, 2..36), periods in 1u32..24) {
        let series: Vec<MonthlyCount> = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| MonthlyCount {
                date: NaiveDate::from_ymd_opt(2020 + (i / 12) as i32, (i % 12) as u32 + 1, 1).unwrap(),
                count,
            })
            .collect();

        let forecast = Forecaster::default().forecast_periods("질병", &series, periods).unwrap();

        prop_assert_eq!(forecast.future.len(), periods as usize);
        for point in forecast.fitted.iter().chain(&forecast.future) {
            prop_assert!(point.yhat_lower >= 0.0);
            prop_assert!(point.yhat_lower <= point.yhat);
            prop_assert!(point.yhat <= point.yhat_upper);
        }
    }
}
