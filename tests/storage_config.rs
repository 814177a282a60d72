mod common;

use campaign_desk::abtest::{AbTestFiltersPatch, AbTestsStore, Channel};
use campaign_desk::config::Config;
use campaign_desk::wizard::WizardStore;
use common::{manual_backend, temp_config};

fn load(persist: bool) -> (tempfile::TempDir, Config) {
    let state = tempfile::tempdir().unwrap();
    let body = format!(
        "[storage]\nstate_dir = \"{}\"\npersist_ui_state = {}\n",
        state.path().display(),
        persist
    );
    let (_dir, path) = temp_config(&body);
    let config = Config::load_from(&path).unwrap();
    (state, config)
}

#[test]
fn enabled_storage_writes_under_state_dir() {
    let (state, config) = load(true);

    let (backend, _) = manual_backend();
    let store = AbTestsStore::seeded(backend)
        .with_configured_persistence(&config)
        .unwrap();
    store.set_filters(AbTestFiltersPatch {
        channels: Some(vec![Channel::Sms]),
        ..AbTestFiltersPatch::default()
    });
    assert!(state.path().join("ab-tests-storage.json").exists());

    let (backend, _) = manual_backend();
    let restored = AbTestsStore::seeded(backend)
        .with_configured_persistence(&config)
        .unwrap();
    assert_eq!(restored.state().filters.channels, vec![Channel::Sms]);
}

#[test]
fn disabled_storage_keeps_state_in_memory() {
    let (state, config) = load(false);

    let (backend, _) = manual_backend();
    let store = WizardStore::new(backend)
        .with_configured_persistence(&config)
        .unwrap();
    store.set_ai_credits(3);
    assert!(!state.path().join("campaign-storage.json").exists());

    let (backend, _) = manual_backend();
    let fresh = WizardStore::new(backend)
        .with_configured_persistence(&config)
        .unwrap();
    assert_eq!(fresh.state().ai_credits, 10);
}

#[test]
fn enabled_storage_resumes_wizard() {
    let (state, config) = load(true);

    let (backend, _) = manual_backend();
    let store = WizardStore::new(backend)
        .with_configured_persistence(&config)
        .unwrap();
    store.set_ai_credits(3);
    assert!(state.path().join("campaign-storage.json").exists());

    let (backend, _) = manual_backend();
    let resumed = WizardStore::new(backend)
        .with_configured_persistence(&config)
        .unwrap();
    assert_eq!(resumed.state().ai_credits, 3);
}
