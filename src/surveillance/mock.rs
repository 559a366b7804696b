//! Placeholder dataset
//!
//! Synthetic records served when the real CSV cannot be normalized, so the
//! dashboard always has something to show. Winter months are inflated to
//! give the charts a visible seasonal shape.

use super::normalizer::MONTHS;
use super::types::Record;
use chrono::NaiveDate;
use rand::Rng;

/// (class, disease) pairs present in the placeholder data
pub const PLACEHOLDER_DISEASES: [(&str, &str); 5] = [
    ("2급", "결핵"),
    ("2급", "수두"),
    ("2급", "A형간염"),
    ("3급", "파상풍"),
    ("3급", "B형간염"),
];

/// Monthly counts are drawn from this half-open range
const COUNT_RANGE: std::ops::Range<u64> = 100..1500;

const WINTER_MONTHS: [u32; 3] = [12, 1, 2];
const WINTER_FACTOR: f64 = 1.3;

/// Generate placeholder records with the thread-local RNG
pub fn generate_placeholder(reporting_year: i32) -> Vec<Record> {
    generate_with(reporting_year, &mut rand::thread_rng())
}

/// Generate placeholder records from the given RNG
pub fn generate_with<R: Rng + ?Sized>(reporting_year: i32, rng: &mut R) -> Vec<Record> {
    // Fall back to a fixed year rather than produce nothing
    let year = if NaiveDate::from_ymd_opt(reporting_year, 1, 1).is_some() {
        reporting_year
    } else {
        2025
    };

    let mut records = Vec::with_capacity(PLACEHOLDER_DISEASES.len() * MONTHS);

    for (class, disease) in PLACEHOLDER_DISEASES {
        for month in 1..=MONTHS as u32 {
            let Some(date) = NaiveDate::from_ymd_opt(year, month, 1) else {
                continue;
            };

            let mut value = rng.gen_range(COUNT_RANGE) as f64;
            if WINTER_MONTHS.contains(&month) {
                value *= WINTER_FACTOR;
            }

            records.push(Record::new(date, class, disease, value as u64));
        }
    }

    records
}
