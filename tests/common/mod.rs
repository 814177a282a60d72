//! Shared fixtures for store-level tests.

#![allow(dead_code, unused_imports)]

use std::path::PathBuf;
use std::sync::Arc;

use campaign_desk::abtest::{
    AbTestsStore, Channel, CreateAbTestInput, Creative, MetricType, VariantInput,
};
use campaign_desk::backend::{Latency, ManualClock, MockBackend};
use campaign_desk::drafts::DraftsStore;
use campaign_desk::wizard::WizardStore;
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

/// Fixed "now" used by every fixture.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
}

/// Instant backend on a manual clock, plus the clock handle.
pub fn manual_backend() -> (MockBackend, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(fixed_now()));
    let backend = MockBackend::new(clock.clone(), Latency::None).with_user("tester");
    (backend, clock)
}

pub fn abtests_store() -> (AbTestsStore, Arc<ManualClock>) {
    let (backend, clock) = manual_backend();
    (AbTestsStore::seeded(backend), clock)
}

pub fn drafts_store() -> (DraftsStore, Arc<ManualClock>) {
    let (backend, clock) = manual_backend();
    (DraftsStore::seeded(backend), clock)
}

pub fn wizard_store() -> (WizardStore, Arc<ManualClock>) {
    let (backend, clock) = manual_backend();
    (WizardStore::new(backend), clock)
}

pub fn variant_input(name: &str, pct: f64) -> VariantInput {
    VariantInput {
        name: name.to_string(),
        traffic_percentage: pct,
        creative: Creative::Text {
            content: format!("{} body", name),
        },
        headline: format!("{} headline", name),
        cta: "Go".to_string(),
        description: None,
    }
}

/// A valid two-variant 50/50 draft input.
pub fn test_input(name: &str) -> CreateAbTestInput {
    CreateAbTestInput {
        name: name.to_string(),
        description: None,
        campaign_id: "camp-9".to_string(),
        channel: Channel::Email,
        variants: vec![variant_input("A", 50.0), variant_input("B", 50.0)],
        target_metric: MetricType::Ctr,
        duration_days: Some(14),
        sample_size: Some(1_000),
        tags: vec!["fixture".to_string()],
    }
}

/// Create a temporary config file with the given TOML body.
pub fn temp_config(body: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, body).expect("Failed to write config");
    (temp_dir, config_path)
}
