mod common;

use campaign_desk::config::{Config, ConfigError, ConfigStore};
use common::temp_config;

/// Test that Config::default() produces the documented values.
#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.defaults.latency_ms, 0);
    assert_eq!(config.defaults.page_size, 20);
    assert_eq!(config.defaults.current_user, "current-user");

    assert_eq!(config.stats.min_confidence, 95.0);
    assert_eq!(config.stats.min_sample_size, 1000);
    assert_eq!(config.stats.default_confidence, 95);
    assert_eq!(config.stats.default_power, 80);

    assert!(config.storage.state_dir.is_none());
    assert!(config.storage.persist_ui_state);
}

#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("campaign-desk/config.toml"));
}

#[test]
fn test_validation_passes_for_default() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validation_fails_zero_page_size() {
    let mut config = Config::default();
    config.defaults.page_size = 0;

    match config.validate() {
        Err(ConfigError::ValidationError { message }) => {
            assert!(message.contains("page_size"));
        }
        other => panic!("Expected ValidationError, got {:?}", other),
    }
}

#[test]
fn test_validation_fails_out_of_range_confidence() {
    for bad in [0.0, -5.0, 100.5] {
        let mut config = Config::default();
        config.stats.min_confidence = bad;
        assert!(
            matches!(config.validate(), Err(ConfigError::ValidationError { .. })),
            "confidence {} should be rejected",
            bad
        );
    }
}

#[test]
fn test_validation_fails_zero_sample_size() {
    let mut config = Config::default();
    config.stats.min_sample_size = 0;
    assert!(config.validate().is_err());
}

/// Partial TOML keeps defaults for everything it omits.
#[test]
fn test_parse_partial_toml() {
    let toml_content = r#"
[defaults]
latency_ms = 300
current_user = "jean.dupont"

[stats]
min_confidence = 90.0
"#;

    let config: Config = toml::from_str(toml_content).expect("Should parse valid TOML");

    assert_eq!(config.defaults.latency_ms, 300);
    assert_eq!(config.defaults.page_size, 20);
    assert_eq!(config.defaults.current_user, "jean.dupont");
    assert_eq!(config.stats.min_confidence, 90.0);
    assert_eq!(config.stats.min_sample_size, 1000);
}

#[test]
fn test_parse_invalid_toml() {
    let result: Result<Config, _> = toml::from_str("this is not valid toml [[[");
    assert!(result.is_err());
}

#[test]
fn test_config_roundtrip() {
    let original = Config::default();
    let serialized = toml::to_string(&original).expect("Should serialize");
    let deserialized: Config = toml::from_str(&serialized).expect("Should deserialize");
    assert_eq!(original, deserialized);
}

#[test]
fn test_missing_file_yields_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_reports_parse_error_with_path() {
    let (_dir, path) = temp_config("[defaults\npage_size = ");
    match Config::load_from(&path) {
        Err(ConfigError::ParseError { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

#[test]
fn test_load_from_validates() {
    let (_dir, path) = temp_config("[defaults]\npage_size = 0\n");
    assert!(matches!(
        Config::load_from(&path),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn test_state_dir_override() {
    let (_dir, path) = temp_config("[storage]\nstate_dir = \"/var/lib/desk\"\npersist_ui_state = false\n");
    let config = Config::load_from(&path).unwrap();
    assert_eq!(
        config.storage.resolved_state_dir(),
        std::path::PathBuf::from("/var/lib/desk")
    );
    assert!(!config.storage.persist_ui_state);
}

#[test]
fn test_config_store_reload_keeps_old_on_error() {
    let (_dir, path) = temp_config("[defaults]\npage_size = 50\n");
    let store = ConfigStore::open(path.clone()).unwrap();
    assert_eq!(store.get().defaults.page_size, 50);

    std::fs::write(&path, "[defaults]\npage_size = 10\n").unwrap();
    store.reload().unwrap();
    assert_eq!(store.get().defaults.page_size, 10);

    std::fs::write(&path, "not toml [[[").unwrap();
    assert!(store.reload().is_err());
    assert_eq!(store.get().defaults.page_size, 10);
    assert_eq!(store.path(), path.as_path());
}
