//! Audience sizing and the contact-list import.

use std::path::Path;

use super::types::CsvImport;
use crate::backend::MockBackend;
use crate::error::{StoreError, ValidationError};

/// Known segments and their approximate size.
pub const SEGMENT_REACH: &[(&str, u64)] = &[
    ("young-adults", 25_000),
    ("families", 18_000),
    ("seniors", 12_000),
    ("professionals", 22_000),
    ("students", 8_000),
    ("tech-enthusiasts", 15_000),
    ("local-businesses", 5_000),
];

/// Estimated reach of an audience.
///
/// An imported list wins outright (its valid rows). Otherwise segment sizes
/// are summed, each custom filter trims 10% (80% at most) and combining
/// several segments removes 15% overlap.
pub fn estimate_reach(segments: &[String], custom_filters: usize, csv: Option<&CsvImport>) -> u64 {
    if let Some(csv) = csv {
        return csv.valid_rows;
    }

    let mut reach: f64 = segments
        .iter()
        .filter_map(|s| SEGMENT_REACH.iter().find(|(name, _)| name == s))
        .map(|(_, size)| *size as f64)
        .sum();
    if custom_filters > 0 {
        let reduction = (custom_filters as f64 * 0.1).min(0.8);
        reach *= 1.0 - reduction;
    }
    if segments.len() > 1 {
        reach *= 0.85;
    }
    reach.round() as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReachQuality {
    VeryNarrow,
    Narrow,
    Broad,
    VeryBroad,
}

pub fn reach_quality(reach: u64) -> ReachQuality {
    match reach {
        0..=999 => ReachQuality::VeryNarrow,
        1_000..=9_999 => ReachQuality::Narrow,
        10_000..=49_999 => ReachQuality::Broad,
        _ => ReachQuality::VeryBroad,
    }
}

const CSV_HEADERS: [&str; 5] = ["email", "nom", "prénom", "ville", "age"];
const CSV_PREVIEW: [[&str; 5]; 3] = [
    ["jean.dupont@email.com", "Dupont", "Jean", "Paris", "32"],
    ["marie.martin@email.com", "Martin", "Marie", "Lyon", "28"],
    ["pierre.bernard@email.com", "Bernard", "Pierre", "Marseille", "45"],
];
const CSV_ROW_COUNT: u64 = 1500;
const CSV_VALID_ROWS: u64 = 1350;

/// Import a contact list.
///
/// The file content is not read yet: any `.csv` name yields the same sample
/// result after the backend round-trip.
// TODO: parse the real file once the upload endpoint exists.
pub async fn import_csv(backend: &MockBackend, file_name: &str) -> Result<CsvImport, StoreError> {
    let is_csv = Path::new(file_name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(StoreError::validation(vec![ValidationError::new(
            "csvImport",
            "Only .csv files are accepted",
        )]));
    }

    backend.round_trip().await;
    Ok(CsvImport {
        file_name: file_name.to_string(),
        headers: CSV_HEADERS.iter().map(|h| h.to_string()).collect(),
        row_count: CSV_ROW_COUNT,
        valid_rows: CSV_VALID_ROWS,
        preview: CSV_PREVIEW
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_segment_is_its_size() {
        assert_eq!(estimate_reach(&segments(&["families"]), 0, None), 18_000);
        assert_eq!(estimate_reach(&segments(&["unknown"]), 0, None), 0);
    }

    #[test]
    fn overlap_and_filters_shrink_reach() {
        // (25000 + 8000) * 0.8 * 0.85
        assert_eq!(
            estimate_reach(&segments(&["young-adults", "students"]), 2, None),
            22_440
        );
        // filters cap at an 80% cut
        assert_eq!(estimate_reach(&segments(&["seniors"]), 20, None), 2_400);
    }

    #[test]
    fn quality_buckets() {
        assert_eq!(reach_quality(500), ReachQuality::VeryNarrow);
        assert_eq!(reach_quality(1_350), ReachQuality::Narrow);
        assert_eq!(reach_quality(18_000), ReachQuality::Broad);
        assert_eq!(reach_quality(80_000), ReachQuality::VeryBroad);
    }

    #[tokio::test]
    async fn csv_import_returns_sample_and_drives_reach() {
        let backend = MockBackend::instant();
        let import = import_csv(&backend, "contacts.CSV").await.unwrap();
        assert_eq!(import.headers, vec!["email", "nom", "prénom", "ville", "age"]);
        assert_eq!(import.row_count, 1500);
        assert_eq!(import.valid_rows, 1350);
        assert_eq!(import.invalid_rows(), 150);
        assert_eq!(import.preview[1][3], "Lyon");
        assert_eq!(estimate_reach(&segments(&["families"]), 0, Some(&import)), 1350);
    }

    #[tokio::test]
    async fn non_csv_is_rejected() {
        let backend = MockBackend::instant();
        let err = import_csv(&backend, "contacts.xlsx").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
    }
}
