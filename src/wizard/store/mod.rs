//! Campaign wizard store.
//!
//! Keeps the per-step form data, navigation, AI credits and the publish
//! progress. Everything except the transient generation and publishing
//! flags is persisted under [`STORAGE_KEY`] once persistence is attached.

mod intent;
mod reducer;
mod state;

pub use intent::WizardIntent;
pub use reducer::WizardReducer;
pub use state::{WizardState, DEFAULT_AI_CREDITS};

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::audience::{self, estimate_reach};
use super::export::{export_campaign, CampaignSummary};
use super::types::{
    Audience, BasicInfo, CampaignData, Creatives, CsvImport, Planning, StepStatus, TemplateData,
    Tracking, ValidationStep, WizardStep,
};
use super::utm::utm_url;
use super::validation::{step_statuses, validate_wizard};
use crate::abtest::ExportBundle;
use crate::backend::MockBackend;
use crate::config::Config;
use crate::error::{ErrorRegistry, ExportError, StoreError};
use crate::mvi::Store;
use crate::persist::{self, KeyValueStore};

pub const STORAGE_KEY: &str = "campaign-storage";

const SOURCE: &str = "wizard";

/// Publishing stages, each worth an equal share of the progress bar.
const PUBLISH_STAGES: [&str; 5] = [
    "Validating data",
    "Uploading creatives",
    "Configuring targeting",
    "Setting up tracking",
    "Launching campaign",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedWizard {
    #[serde(default)]
    data: CampaignData,
    #[serde(default)]
    step_validation: BTreeMap<WizardStep, bool>,
    #[serde(default)]
    current_step: usize,
    #[serde(default)]
    completed_steps: Vec<WizardStep>,
    #[serde(default = "default_credits")]
    ai_credits: u32,
    #[serde(default)]
    last_saved: Option<DateTime<Utc>>,
}

fn default_credits() -> u32 {
    DEFAULT_AI_CREDITS
}

pub struct WizardStore {
    store: Store<WizardReducer>,
    backend: MockBackend,
    errors: ErrorRegistry,
    persistence: Option<Arc<dyn KeyValueStore>>,
}

impl WizardStore {
    pub fn new(backend: MockBackend) -> Self {
        Self {
            store: Store::new(WizardState::default()),
            backend,
            errors: ErrorRegistry::default(),
            persistence: None,
        }
    }

    /// Attach file persistence as configured by `[storage]`. A disabled
    /// section leaves the store in memory only.
    pub fn with_configured_persistence(self, config: &Config) -> Result<Self, StoreError> {
        match persist::open_configured(&config.storage) {
            Some(kv) => self.with_persistence(kv),
            None => Ok(self),
        }
    }

    /// Attach persisted state and resume the saved campaign, if any.
    pub fn with_persistence(mut self, kv: Arc<dyn KeyValueStore>) -> Result<Self, StoreError> {
        if let Some(saved) = persist::load::<PersistedWizard>(kv.as_ref(), STORAGE_KEY)? {
            debug!(step = saved.current_step, "Restoring campaign in progress");
            self.store.dispatch(WizardIntent::Hydrate {
                data: saved.data,
                step_validation: saved.step_validation,
                current_step: saved.current_step,
                completed_steps: saved.completed_steps,
                ai_credits: saved.ai_credits,
                last_saved: saved.last_saved,
            });
        }
        self.persistence = Some(kv);
        Ok(self)
    }

    pub fn state(&self) -> WizardState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<WizardState> {
        self.store.subscribe()
    }

    pub fn errors(&self) -> &ErrorRegistry {
        &self.errors
    }

    // ========== Step data ==========

    pub fn set_template(&self, template: TemplateData) {
        self.commit(WizardIntent::SetTemplate { template });
    }

    pub fn set_basic_info(&self, info: BasicInfo) {
        self.commit(WizardIntent::SetBasicInfo { info });
    }

    pub fn set_creatives(&self, creatives: Creatives) {
        self.commit(WizardIntent::SetCreatives { creatives });
    }

    /// Store the audience step, recomputing its estimated reach.
    pub fn set_audience(&self, mut audience: Audience) {
        audience.estimated_reach = Some(estimate_reach(
            &audience.selected_segments,
            audience.custom_filters.len(),
            audience.csv_import.as_ref(),
        ));
        self.commit(WizardIntent::SetAudience { audience });
    }

    pub fn set_planning(&self, planning: Planning) {
        self.commit(WizardIntent::SetPlanning { planning });
    }

    pub fn set_tracking(&self, tracking: Tracking) {
        self.commit(WizardIntent::SetTracking { tracking });
    }

    pub fn set_validation(&self, validation: ValidationStep) {
        self.commit(WizardIntent::SetValidation { validation });
    }

    /// Import a contact list into the audience step.
    pub async fn import_csv(&self, file_name: &str) -> Result<CsvImport, StoreError> {
        let import = match audience::import_csv(&self.backend, file_name).await {
            Ok(import) => import,
            Err(err) => {
                self.fail("import csv", &err);
                return Err(err);
            }
        };
        let reach = self.store.dispatch_with(|s| {
            let (segments, filters) = s
                .data
                .audience
                .as_ref()
                .map(|a| (a.selected_segments.clone(), a.custom_filters.len()))
                .unwrap_or_default();
            let reach = estimate_reach(&segments, filters, Some(&import));
            let intent = WizardIntent::CsvImported {
                import: import.clone(),
                reach,
            };
            Ok::<_, StoreError>((intent, reach))
        })?;
        info!(file = %import.file_name, rows = import.row_count, valid = import.valid_rows, reach, "Contact list imported");
        self.persist_ui();
        Ok(import)
    }

    // ========== Navigation ==========

    pub fn set_current_step(&self, step: WizardStep) {
        self.go_to_step(step.index());
    }

    /// Jump to a step by position. Out-of-range indices land on the last step.
    pub fn go_to_step(&self, index: usize) {
        self.commit(WizardIntent::GoToStep { index });
    }

    pub fn complete_step(&self, step: WizardStep) {
        self.commit(WizardIntent::CompleteStep { step });
    }

    pub fn set_step_validation(&self, step: WizardStep, valid: bool) {
        self.commit(WizardIntent::SetStepValidation { step, valid });
    }

    pub fn step_statuses(&self) -> Vec<StepStatus> {
        self.store.read(|s| step_statuses(&s.data))
    }

    // ========== AI generation ==========

    pub fn set_ai_credits(&self, credits: u32) {
        self.commit(WizardIntent::SetAiCredits { credits });
    }

    /// Spend credits, stopping at zero.
    pub fn use_ai_credits(&self, amount: u32) {
        self.commit(WizardIntent::UseAiCredits { amount });
    }

    pub fn set_generating(&self, generating: bool) {
        self.store.dispatch(WizardIntent::SetGenerating { generating });
    }

    pub fn set_generation_error(&self, error: Option<String>) {
        self.store.dispatch(WizardIntent::SetGenerationError { error });
    }

    // ========== Publishing ==========

    /// Validate the whole campaign and publish it.
    ///
    /// Progress advances by 20 after each stage's round-trip. A call made
    /// while another publish is in flight is refused without touching it.
    pub async fn publish(&self) -> Result<(), StoreError> {
        if self.store.read(|s| s.is_publishing) {
            return Err(already_publishing());
        }
        let errors = self.store.read(|s| validate_wizard(&s.data));
        if !errors.is_empty() {
            let err = StoreError::validation(errors);
            self.fail("publish", &err);
            return Err(err);
        }
        if !self.store.dispatch(WizardIntent::PublishStarted) {
            return Err(already_publishing());
        }

        let step = 100.0 / PUBLISH_STAGES.len() as f64;
        for (idx, stage) in PUBLISH_STAGES.iter().enumerate() {
            debug!(stage, "Publishing");
            self.backend.round_trip().await;
            self.store.dispatch(WizardIntent::PublishProgress {
                progress: step * (idx + 1) as f64,
            });
        }

        self.save_progress();
        self.store.dispatch(WizardIntent::PublishFinished);
        let name = self
            .store
            .read(|s| s.data.basic_info.as_ref().map(|b| b.name.clone()))
            .unwrap_or_default();
        info!(campaign = %name, "Campaign published");
        Ok(())
    }

    // ========== Persistence & summary ==========

    /// Stamp `last_saved` and write the persisted subset.
    pub fn save_progress(&self) {
        let now = self.backend.now();
        self.commit(WizardIntent::Saved { at: now });
        debug!(at = %now, "Campaign progress saved");
    }

    /// Start over with an empty campaign. AI credits are kept.
    pub fn reset_campaign(&self) {
        self.commit(WizardIntent::Reset);
        info!("Campaign wizard reset");
    }

    pub fn clear_error(&self) {
        self.store.dispatch(WizardIntent::ClearError);
    }

    pub fn summary(&self) -> CampaignSummary {
        self.store.read(|s| {
            CampaignSummary::new(
                s.data.clone(),
                s.step_validation.clone(),
                s.current_step,
                s.completed_steps.clone(),
            )
        })
    }

    pub fn export(&self, date: NaiveDate) -> Result<ExportBundle, ExportError> {
        export_campaign(&self.summary(), date)
    }

    /// Tracking link for `base` built from the tracking step.
    pub fn tracking_url(&self, base: &str) -> String {
        self.store
            .read(|s| utm_url(base, s.data.tracking.as_ref().map(|t| &t.utm)))
    }

    // ========== Internals ==========

    /// Dispatch and persist when the state changed.
    fn commit(&self, intent: WizardIntent) {
        if self.store.dispatch(intent) {
            self.persist_ui();
        }
    }

    fn fail(&self, action: &'static str, err: &StoreError) {
        let message = err.to_string();
        warn!(action, error = %message, "Wizard action failed");
        self.errors.record(self.backend.now(), SOURCE, message.clone());
        self.store.dispatch(WizardIntent::Failed { message });
    }

    fn persist_ui(&self) {
        let Some(kv) = &self.persistence else {
            return;
        };
        let snapshot = self.store.read(|s| PersistedWizard {
            data: s.data.clone(),
            step_validation: s.step_validation.clone(),
            current_step: s.current_step,
            completed_steps: s.completed_steps.clone(),
            ai_credits: s.ai_credits,
            last_saved: s.last_saved,
        });
        if let Err(e) = persist::save(kv.as_ref(), STORAGE_KEY, &snapshot) {
            warn!(error = %e, "Failed to persist campaign wizard state");
            self.errors.record(self.backend.now(), SOURCE, e.to_string());
        }
    }
}

fn already_publishing() -> StoreError {
    debug!("Publish already in progress");
    StoreError::InvalidTransition {
        id: "campaign".to_string(),
        from: "publishing".to_string(),
        action: "publish",
    }
}
