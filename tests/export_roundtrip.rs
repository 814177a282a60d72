mod common;

use campaign_desk::abtest::seed::sample_tests;
use campaign_desk::abtest::{export_tests, import_tests};
use common::fixed_now;

#[test]
fn exported_tests_parse_back_with_same_identity() {
    let tests = sample_tests(fixed_now());
    let bundle = export_tests(&tests, fixed_now()).unwrap();
    assert_eq!(bundle.file_name, "ab-tests-2024-06-10T12:00:00.000Z.json");

    let parsed = import_tests(&bundle.contents).unwrap();
    assert_eq!(parsed.len(), tests.len());
    for (original, back) in tests.iter().zip(&parsed) {
        assert_eq!(original.id, back.id);
        assert_eq!(original.name, back.name);
        assert_eq!(original.status, back.status);
    }
}

#[test]
fn export_is_pretty_printed_camel_case() {
    let tests = sample_tests(fixed_now());
    let bundle = export_tests(&tests[..1], fixed_now()).unwrap();
    assert!(bundle.contents.starts_with("[\n"));
    assert!(bundle.contents.contains("\"campaignName\": \"Spring Sale 2024\""));
    assert!(bundle.contents.contains("\"status\": \"running\""));
}

#[test]
fn bundle_is_written_into_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("exports");
    let bundle = export_tests(&sample_tests(fixed_now()), fixed_now()).unwrap();

    let path = bundle.write_to(&target).unwrap();
    assert_eq!(path, target.join(&bundle.file_name));
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(import_tests(&written).unwrap().len(), 4);
}

#[test]
fn garbage_is_rejected() {
    assert!(import_tests("{\"not\": \"an array\"}").is_err());
}
