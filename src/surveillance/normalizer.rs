//! CSV Normalizer
//!
//! Reshapes the wide monthly report (one row per disease, one column per
//! month) into long-format [`Record`]s.
//!
//! Source files come in two vintages: UTF-8 with the month header on the
//! first row, or CP949 with a title row above the header. Both are handled
//! here; callers that need a dataset no matter what should go through
//! [`load_or_fallback`](super::load_or_fallback).

use super::error::{LoadError, LoadResult};
use super::types::{DiseaseClass, Record, SourceEncoding};
use chrono::NaiveDate;
use csv::StringRecord;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

/// Months per reporting year
pub const MONTHS: usize = 12;

/// class, disease, total, then twelve month columns
pub const MIN_COLUMNS: usize = 3 + MONTHS;

/// Row labels that carry aggregates rather than a single disease
const SUBTOTAL_LABELS: &[&str] = &["소계", "합계", "계", "총계", "subtotal", "total"];

/// Cell values that mean "no cases reported"
const EMPTY_MARKERS: &[&str] = &["", "-", "nan", "None"];

/// Header rows are searched within this many leading rows
const HEADER_SEARCH_ROWS: usize = 2;

/// Wide-to-long surveillance CSV normalizer
#[derive(Debug, Clone)]
pub struct Normalizer {
    reporting_year: i32,
}

/// Output of a successful normalization
#[derive(Debug, Clone)]
pub struct Normalized {
    pub records: Vec<Record>,
    pub encoding: SourceEncoding,
    /// Zero-based row index the month header was found on
    pub header_row: usize,
    /// Data rows dropped (subtotals, unlabeled or duplicate diseases)
    pub rows_skipped: usize,
}

impl Normalizer {
    pub fn new(reporting_year: i32) -> Self {
        Self { reporting_year }
    }

    pub fn reporting_year(&self) -> i32 {
        self.reporting_year
    }

    /// Normalize a CSV file on disk
    pub fn normalize_file(&self, path: &Path) -> LoadResult<Normalized> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.normalize_bytes(&bytes)
    }

    /// Normalize raw CSV bytes in either supported encoding
    pub fn normalize_bytes(&self, bytes: &[u8]) -> LoadResult<Normalized> {
        let (text, encoding) = decode(bytes)?;
        let rows = read_rows(&text)?;
        let (header_row, month_columns) = locate_header(&rows)?;
        let dates = self.month_dates()?;

        let required = month_columns
            .iter()
            .copied()
            .max()
            .map_or(MIN_COLUMNS, |last| MIN_COLUMNS.max(last + 1));

        let mut records = Vec::new();
        let mut seen: HashSet<(DiseaseClass, String)> = HashSet::new();
        let mut current_class: Option<DiseaseClass> = None;
        let mut rows_skipped = 0;

        for (idx, row) in rows.iter().enumerate().skip(header_row + 1) {
            let line = row
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 1);

            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            if row.len() < required {
                return Err(LoadError::ColumnCount {
                    line,
                    expected: required,
                    found: row.len(),
                });
            }

            let class_cell = row[0].trim();
            let disease = row[1].trim();

            // Merged-cell exports leave the class blank on continuation rows
            if !class_cell.is_empty() && !is_subtotal(class_cell) {
                current_class = Some(DiseaseClass::new(class_cell));
            }

            if is_subtotal(class_cell) || is_subtotal(disease) {
                tracing::trace!(line, class = %class_cell, disease = %disease, "Skipping subtotal row");
                rows_skipped += 1;
                continue;
            }

            let class = match (&current_class, disease.is_empty()) {
                (Some(class), false) => class.clone(),
                _ => {
                    tracing::debug!(line, "Skipping row without class or disease label");
                    rows_skipped += 1;
                    continue;
                }
            };

            if !seen.insert((class.clone(), disease.to_string())) {
                tracing::warn!(line, class = %class, disease = %disease, "Duplicate disease row dropped");
                rows_skipped += 1;
                continue;
            }

            for (date, &col) in dates.iter().zip(month_columns.iter()) {
                records.push(Record {
                    date: *date,
                    class: class.clone(),
                    disease: disease.to_string(),
                    count: parse_count(&row[col]),
                });
            }
        }

        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        tracing::debug!(
            records = records.len(),
            encoding = %encoding,
            header_row,
            rows_skipped,
            "Normalized surveillance CSV"
        );

        Ok(Normalized {
            records,
            encoding,
            header_row,
            rows_skipped,
        })
    }

    /// First day of each month of the reporting year
    fn month_dates(&self) -> LoadResult<[NaiveDate; MONTHS]> {
        let mut dates = [NaiveDate::MIN; MONTHS];
        for (idx, slot) in dates.iter_mut().enumerate() {
            *slot = NaiveDate::from_ymd_opt(self.reporting_year, idx as u32 + 1, 1)
                .ok_or(LoadError::InvalidYear(self.reporting_year))?;
        }
        Ok(dates)
    }
}

/// Decode bytes as UTF-8 (BOM stripped), falling back to CP949
pub fn decode(bytes: &[u8]) -> LoadResult<(Cow<'_, str>, SourceEncoding)> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok((Cow::Borrowed(text), SourceEncoding::Utf8));
    }

    // WHATWG "EUC-KR" is the CP949 superset
    let (text, had_errors) = encoding_rs::EUC_KR.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(LoadError::Encoding);
    }

    Ok((text, SourceEncoding::Cp949))
}

/// Parse a locale-formatted count cell.
///
/// Thousands separators are stripped; dashes, blanks and anything that is
/// not a non-negative integer become 0.
pub fn parse_count(cell: &str) -> u64 {
    let trimmed = cell.trim();
    if EMPTY_MARKERS.contains(&trimmed) {
        return 0;
    }

    let digits = trimmed.replace(',', "");
    if let Ok(n) = digits.parse::<u64>() {
        return n;
    }

    // Spreadsheet exports sometimes write integers as "12.0"
    match digits.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => v as u64,
        _ => 0,
    }
}

/// Whether a row label denotes a subtotal or aggregate row
pub fn is_subtotal(label: &str) -> bool {
    let label = label.trim();
    SUBTOTAL_LABELS
        .iter()
        .any(|s| s.eq_ignore_ascii_case(label))
}

fn read_rows(text: &str) -> LoadResult<Vec<StringRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    Ok(reader.records().collect::<Result<Vec<_>, _>>()?)
}

fn locate_header(rows: &[StringRecord]) -> LoadResult<(usize, [usize; MONTHS])> {
    rows.iter()
        .take(HEADER_SEARCH_ROWS)
        .enumerate()
        .find_map(|(idx, row)| month_columns(row).map(|cols| (idx, cols)))
        .ok_or(LoadError::MissingHeader)
}

/// Column index of each month, if the row labels all twelve
fn month_columns(row: &StringRecord) -> Option<[usize; MONTHS]> {
    let mut found: [Option<usize>; MONTHS] = [None; MONTHS];

    for (col, cell) in row.iter().enumerate() {
        if let Some(month) = parse_month_label(cell) {
            let slot = &mut found[month as usize - 1];
            if slot.is_none() {
                *slot = Some(col);
            }
        }
    }

    let mut columns = [0usize; MONTHS];
    for (slot, col) in columns.iter_mut().zip(found) {
        *slot = col?;
    }
    Some(columns)
}

/// "3", "3월", "03", "2025.03", "2025년 3월" -> 3
fn parse_month_label(cell: &str) -> Option<u32> {
    static MONTH_LABEL: OnceLock<Regex> = OnceLock::new();
    let re = MONTH_LABEL.get_or_init(|| {
        Regex::new(r"^(?:\d{4}\s*[.\-/년]\s*)?(\d{1,2})\s*월?$").expect("month label regex")
    });

    let caps = re.captures(cell.trim())?;
    let month: u32 = caps.get(1)?.as_str().parse().ok()?;
    (1..=MONTHS as u32).contains(&month).then_some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "급,질병,계,1월,2월,3월,4월,5월,6월,7월,8월,9월,10월,11월,12월";

    fn row(class: &str, disease: &str, counts: [&str; 12]) -> String {
        let cells: Vec<String> = counts.iter().map(|c| format!("\"{}\"", c)).collect();
        format!("{},{},0,{}", class, disease, cells.join(","))
    }

    fn flat(count: &str) -> [&str; 12] {
        [count; 12]
    }

    #[test]
    fn test_header_on_first_row() {
        let csv = [HEADER.to_string(), row("2급", "수두", flat("1,234"))].join("\n");
        let result = Normalizer::new(2025).normalize_bytes(csv.as_bytes()).unwrap();

        assert_eq!(result.header_row, 0);
        assert_eq!(result.encoding, SourceEncoding::Utf8);
        assert_eq!(result.records.len(), 12);
        assert!(result.records.iter().all(|r| r.count == 1_234));
        assert_eq!(
            result.records[0].date,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert_eq!(
            result.records[11].date,
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
        );
    }

    #[test]
    fn test_header_on_second_row_in_cp949() {
        let csv = [
            "법정감염병 월별 신고현황,,,,,,,,,,,,,,".to_string(),
            HEADER.to_string(),
            row("3급", "파상풍", flat("7")),
        ]
        .join("\n");
        let (bytes, _, unmappable) = encoding_rs::EUC_KR.encode(&csv);
        assert!(!unmappable);

        let result = Normalizer::new(2025).normalize_bytes(&bytes).unwrap();

        assert_eq!(result.header_row, 1);
        assert_eq!(result.encoding, SourceEncoding::Cp949);
        assert_eq!(result.records[0].disease, "파상풍");
        assert_eq!(result.records[0].class.as_str(), "3급");
    }

    #[test]
    fn test_dash_and_blank_cells_are_zero() {
        let counts = ["-", "", " ", "nan", "None", "5", "-", "1,000", "x", "12.0", "-3", "2"];
        let csv = [HEADER.to_string(), row("2급", "결핵", counts)].join("\n");
        let result = Normalizer::new(2025).normalize_bytes(csv.as_bytes()).unwrap();

        let values: Vec<u64> = result.records.iter().map(|r| r.count).collect();
        assert_eq!(values, vec![0, 0, 0, 0, 0, 5, 0, 1_000, 0, 12, 0, 2]);
    }

    #[test]
    fn test_subtotal_rows_filtered() {
        let csv = [
            HEADER.to_string(),
            row("계", "", flat("900")),
            row("2급", "소계", flat("500")),
            row("2급", "수두", flat("300")),
            row("", "결핵", flat("200")),
        ]
        .join("\n");
        let result = Normalizer::new(2025).normalize_bytes(csv.as_bytes()).unwrap();

        assert_eq!(result.rows_skipped, 2);
        assert!(result.records.iter().all(|r| r.disease != "소계"));
        assert_eq!(result.records.len(), 24);

        // blank class inherits the class above it
        let tb = result.records.iter().find(|r| r.disease == "결핵").unwrap();
        assert_eq!(tb.class.as_str(), "2급");
    }

    #[test]
    fn test_duplicate_disease_keeps_first() {
        let csv = [
            HEADER.to_string(),
            row("2급", "수두", flat("1")),
            row("2급", "수두", flat("2")),
        ]
        .join("\n");
        let result = Normalizer::new(2025).normalize_bytes(csv.as_bytes()).unwrap();

        assert_eq!(result.records.len(), 12);
        assert!(result.records.iter().all(|r| r.count == 1));
    }

    #[test]
    fn test_short_row_is_column_mismatch() {
        let csv = [HEADER, "2급,수두,10,1,2,3"].join("\n");
        let err = Normalizer::new(2025)
            .normalize_bytes(csv.as_bytes())
            .unwrap_err();

        assert!(matches!(
            err,
            LoadError::ColumnCount {
                expected: 15,
                found: 6,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_header() {
        let csv = "a,b,c\n1,2,3\n4,5,6";
        let err = Normalizer::new(2025)
            .normalize_bytes(csv.as_bytes())
            .unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader));
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = Normalizer::new(2025)
            .normalize_bytes(HEADER.as_bytes())
            .unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn test_undecodable_bytes() {
        let bytes = [0xFF, 0xFE, 0xFF, 0x80, 0xFF];
        assert!(matches!(decode(&bytes), Err(LoadError::Encoding)));
    }

    #[test]
    fn test_utf8_bom_stripped() {
        let mut bytes = b"\xEF\xBB\xBF".to_vec();
        bytes.extend_from_slice(HEADER.as_bytes());
        let (text, encoding) = decode(&bytes).unwrap();
        assert_eq!(encoding, SourceEncoding::Utf8);
        assert!(text.starts_with("급"));
    }

    #[test]
    fn test_year_prefixed_month_labels() {
        let header = format!(
            "class,disease,total,{}",
            (1..=12)
                .map(|m| format!("2025.{:02}", m))
                .collect::<Vec<_>>()
                .join(",")
        );
        let csv = [header, row("4급", "인플루엔자", flat("3"))].join("\n");
        let result = Normalizer::new(2025).normalize_bytes(csv.as_bytes()).unwrap();
        assert_eq!(result.records.len(), 12);
    }

    #[test]
    fn test_missing_file() {
        let err = Normalizer::new(2025)
            .normalize_file(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_parse_month_label() {
        assert_eq!(parse_month_label("1월"), Some(1));
        assert_eq!(parse_month_label("12"), Some(12));
        assert_eq!(parse_month_label("2025년 3월"), Some(3));
        assert_eq!(parse_month_label("13월"), None);
        assert_eq!(parse_month_label("2025"), None);
        assert_eq!(parse_month_label("계"), None);
    }

    #[test]
    fn test_is_subtotal() {
        assert!(is_subtotal("소계"));
        assert!(is_subtotal(" 합계 "));
        assert!(is_subtotal("Total"));
        assert!(!is_subtotal("수두"));
    }
}
