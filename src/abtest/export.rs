//! JSON export and import of A/B tests.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use super::types::AbTest;
use crate::error::ExportError;

/// Serialized export ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBundle {
    pub file_name: String,
    pub contents: String,
}

impl ExportBundle {
    /// Write the bundle into `dir`, creating it when missing.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        let io_err = |source| ExportError::Io {
            path: path.display().to_string(),
            source,
        };
        fs::create_dir_all(dir).map_err(io_err)?;
        fs::write(&path, &self.contents).map_err(io_err)?;
        Ok(path)
    }
}

/// `ab-tests-<RFC 3339 timestamp>.json`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!(
        "ab-tests-{}.json",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

/// Pretty-printed JSON array of `tests`.
pub fn export_tests(tests: &[AbTest], now: DateTime<Utc>) -> Result<ExportBundle, ExportError> {
    Ok(ExportBundle {
        file_name: export_file_name(now),
        contents: serde_json::to_string_pretty(tests)?,
    })
}

pub fn import_tests(json: &str) -> Result<Vec<AbTest>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_uses_iso_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        assert_eq!(export_file_name(now), "ab-tests-2024-06-01T09:30:00.000Z.json");
    }

    #[test]
    fn empty_export_is_empty_array() {
        let bundle = export_tests(&[], Utc::now()).unwrap();
        assert_eq!(bundle.contents, "[]");
        assert!(import_tests(&bundle.contents).unwrap().is_empty());
    }
}
