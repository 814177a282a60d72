//! A/B tests store.
//!
//! Holds the test collection plus list-view state (selection, filters,
//! pagination, sorting, editor buffer). Async actions simulate a backend
//! round-trip, then fold their result into the state through
//! [`AbTestsReducer`]. A failed action leaves its message in
//! `state.error`, lands in the [`ErrorRegistry`] and is returned.

mod intent;
mod reducer;
mod state;

pub use intent::AbTestsIntent;
pub use reducer::AbTestsReducer;
pub use state::{performance, AbTestsState, EditingDraft};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::stats::{self, DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_SAMPLE_SIZE};
use super::types::{
    AbTest, AbTestFilters, AbTestFiltersPatch, AbTestStatus, CreateAbTestInput,
    PaginationPatch, Sorting, UpdateAbTestInput, Variant, VariantInput, WinnerAnalysis,
};
use super::validation::{can_start_test, can_stop_test, validate_ab_test, Gate};
use crate::backend::MockBackend;
use crate::config::Config;
use crate::error::{ErrorRegistry, StoreError};
use crate::mvi::Store;
use crate::persist::{self, KeyValueStore};

/// Key of the persisted UI subset.
pub const STORAGE_KEY: &str = "ab-tests-storage";

const SOURCE: &str = "ab-tests";
const KIND: &str = "A/B test";

/// Fields that survive a restart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedAbTests {
    #[serde(default)]
    filters: AbTestFilters,
    #[serde(default)]
    sorting: Sorting,
    #[serde(default)]
    editing_draft: Option<EditingDraft>,
}

pub struct AbTestsStore {
    store: Store<AbTestsReducer>,
    backend: MockBackend,
    errors: ErrorRegistry,
    persistence: Option<Arc<dyn KeyValueStore>>,
    min_confidence: f64,
    min_sample_size: u64,
}

impl AbTestsStore {
    pub fn new(backend: MockBackend, tests: Vec<AbTest>) -> Self {
        let mut initial = AbTestsState {
            tests,
            ..AbTestsState::default()
        };
        initial.pagination.total = initial.tests.len();
        Self {
            store: Store::new(initial),
            backend,
            errors: ErrorRegistry::default(),
            persistence: None,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_sample_size: DEFAULT_MIN_SAMPLE_SIZE,
        }
    }

    /// Store pre-filled with the sample tests.
    pub fn seeded(backend: MockBackend) -> Self {
        let tests = super::seed::sample_tests(backend.now());
        Self::new(backend, tests)
    }

    /// Apply page size and statistics thresholds from `config`.
    pub fn configured(mut self, config: &Config) -> Self {
        self.min_confidence = config.stats.min_confidence;
        self.min_sample_size = config.stats.min_sample_size;
        self.store.dispatch(AbTestsIntent::SetPagination {
            patch: PaginationPatch {
                page: None,
                page_size: Some(config.defaults.page_size),
            },
        });
        self
    }

    /// Attach file persistence as configured by `[storage]`. A disabled
    /// section leaves the store in memory only.
    pub fn with_configured_persistence(self, config: &Config) -> Result<Self, StoreError> {
        match persist::open_configured(&config.storage) {
            Some(kv) => self.with_persistence(kv),
            None => Ok(self),
        }
    }

    /// Attach persisted UI state and restore whatever was saved before.
    pub fn with_persistence(mut self, kv: Arc<dyn KeyValueStore>) -> Result<Self, StoreError> {
        if let Some(saved) = persist::load::<PersistedAbTests>(kv.as_ref(), STORAGE_KEY)? {
            debug!("Restoring persisted A/B test view state");
            self.store.dispatch(AbTestsIntent::Hydrate {
                filters: saved.filters,
                sorting: saved.sorting,
                editing_draft: saved.editing_draft,
            });
        }
        self.persistence = Some(kv);
        Ok(self)
    }

    pub fn state(&self) -> AbTestsState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<AbTestsState> {
        self.store.subscribe()
    }

    pub fn errors(&self) -> &ErrorRegistry {
        &self.errors
    }

    pub fn get_test_by_id(&self, id: &str) -> Option<AbTest> {
        self.store.read(|s| s.test(id).cloned())
    }

    pub fn visible_tests(&self) -> Vec<AbTest> {
        self.store.read(AbTestsState::visible_tests)
    }

    pub fn filtered_count(&self) -> usize {
        self.store.read(AbTestsState::filtered_count)
    }

    /// Winner analysis of a test's current metrics.
    pub fn analyze(&self, id: &str) -> Option<WinnerAnalysis> {
        self.store
            .read(|s| s.test(id).and_then(|t| t.analyze(self.min_confidence)))
    }

    /// Whether a test has enough traffic and a significant winner.
    pub fn has_reached_significance(&self, id: &str) -> bool {
        self.store.read(|s| {
            s.test(id).is_some_and(|t| {
                t.metrics.as_deref().is_some_and(|m| {
                    stats::has_reached_significance(m, t.target_metric, self.min_sample_size)
                })
            })
        })
    }

    // ========== CRUD ==========

    /// Merge `params` into the current filters and reload the list.
    pub async fn fetch_tests(&self, params: AbTestFiltersPatch) -> Result<(), StoreError> {
        self.perform("fetch tests", |state| {
            let filters = state.filters.merged(params);
            Ok((AbTestsIntent::Loaded { filters }, ()))
        })
        .await?;
        self.persist_ui();
        Ok(())
    }

    pub async fn create_draft(&self, input: CreateAbTestInput) -> Result<AbTest, StoreError> {
        let test = self
            .perform("create test", |_| {
                let errors = validate_ab_test(&input);
                if !errors.is_empty() {
                    return Err(StoreError::validation(errors));
                }
                let test = self.new_test(input);
                Ok((AbTestsIntent::Created { test: test.clone() }, test))
            })
            .await?;
        info!(test_id = %test.id, name = %test.name, "A/B test draft created");
        Ok(test)
    }

    /// Patch a draft. Existing variants keep their ids by position.
    pub async fn update_draft(&self, input: UpdateAbTestInput) -> Result<AbTest, StoreError> {
        let test = self
            .perform("update test", |state| {
                let current = find(state, &input.id)?;
                if current.status != AbTestStatus::Draft {
                    return Err(StoreError::InvalidTransition {
                        id: current.id.clone(),
                        from: current.status.to_string(),
                        action: "edit",
                    });
                }
                let updated = self.apply_update(current, input);
                let errors = validate_ab_test(&updated.to_input());
                if !errors.is_empty() {
                    return Err(StoreError::validation(errors));
                }
                Ok((
                    AbTestsIntent::Replaced {
                        test: updated.clone(),
                    },
                    updated,
                ))
            })
            .await?;
        debug!(test_id = %test.id, "A/B test draft updated");
        Ok(test)
    }

    pub async fn delete_draft(&self, id: &str) -> Result<(), StoreError> {
        self.perform("delete test", |state| {
            let test = find(state, id)?;
            Ok((
                AbTestsIntent::Deleted {
                    id: test.id.clone(),
                },
                (),
            ))
        })
        .await?;
        info!(test_id = %id, "A/B test deleted");
        Ok(())
    }

    // ========== Lifecycle ==========

    pub async fn start(&self, id: &str) -> Result<(), StoreError> {
        self.transition(id, "start", |test, now| {
            require(test, &[AbTestStatus::Draft], "start")?;
            if let Gate::Blocked(reason) = can_start_test(test) {
                debug!(test_id = %test.id, %reason, "Start refused");
                return Err(StoreError::validation(validate_ab_test(&test.to_input())));
            }
            let mut next = test.clone();
            next.status = AbTestStatus::Running;
            next.start_date = Some(now);
            Ok(next)
        })
        .await
    }

    pub async fn pause(&self, id: &str) -> Result<(), StoreError> {
        self.transition(id, "pause", |test, _| {
            require(test, &[AbTestStatus::Running], "pause")?;
            let mut next = test.clone();
            next.status = AbTestStatus::Paused;
            Ok(next)
        })
        .await
    }

    pub async fn resume(&self, id: &str) -> Result<(), StoreError> {
        self.transition(id, "resume", |test, _| {
            require(test, &[AbTestStatus::Paused], "resume")?;
            let mut next = test.clone();
            next.status = AbTestStatus::Running;
            Ok(next)
        })
        .await
    }

    /// Complete a running or paused test, optionally declaring a winner.
    pub async fn stop(&self, id: &str, winner: Option<&str>) -> Result<(), StoreError> {
        self.transition(id, "stop", |test, now| {
            if !can_stop_test(test).is_allowed() {
                return Err(invalid_transition(test, "stop"));
            }
            if let Some(variant_id) = winner {
                if test.variant(variant_id).is_none() {
                    return Err(StoreError::UnknownVariant {
                        test_id: test.id.clone(),
                        variant_id: variant_id.to_string(),
                    });
                }
            }
            let mut next = test.clone();
            next.status = AbTestStatus::Completed;
            next.end_date = Some(now);
            next.winner = winner.map(str::to_string);
            Ok(next)
        })
        .await
    }

    pub async fn archive(&self, id: &str) -> Result<(), StoreError> {
        self.transition(id, "archive", |test, _| {
            require(
                test,
                &[
                    AbTestStatus::Draft,
                    AbTestStatus::Paused,
                    AbTestStatus::Completed,
                ],
                "archive",
            )?;
            let mut next = test.clone();
            next.status = AbTestStatus::Archived;
            Ok(next)
        })
        .await
    }

    // ========== Bulk ==========
    //
    // Items run one after another. The first failure stops the batch; later
    // ids are never attempted.

    pub async fn bulk_start(&self, ids: &[String]) -> Result<(), StoreError> {
        let mut completed = 0;
        for id in ids {
            self.start(id).await.map_err(|e| bulk_error(completed, id, e))?;
            completed += 1;
        }
        Ok(())
    }

    pub async fn bulk_pause(&self, ids: &[String]) -> Result<(), StoreError> {
        let mut completed = 0;
        for id in ids {
            self.pause(id).await.map_err(|e| bulk_error(completed, id, e))?;
            completed += 1;
        }
        Ok(())
    }

    pub async fn bulk_archive(&self, ids: &[String]) -> Result<(), StoreError> {
        let mut completed = 0;
        for id in ids {
            self.archive(id).await.map_err(|e| bulk_error(completed, id, e))?;
            completed += 1;
        }
        Ok(())
    }

    // ========== Selection & UI ==========

    pub fn set_selected(&self, ids: Vec<String>) {
        self.store.dispatch(AbTestsIntent::SetSelected { ids });
    }

    pub fn toggle_selection(&self, id: &str) {
        self.store.dispatch(AbTestsIntent::ToggleSelection { id: id.to_string() });
    }

    pub fn select_all(&self) {
        self.store.dispatch(AbTestsIntent::SelectAll);
    }

    pub fn clear_selection(&self) {
        self.store.dispatch(AbTestsIntent::ClearSelection);
    }

    pub fn set_editing_draft(&self, draft: Option<EditingDraft>) {
        if self.store.dispatch(AbTestsIntent::SetEditingDraft { draft }) {
            self.persist_ui();
        }
    }

    /// Open the editor on an existing test.
    pub fn edit_test(&self, id: &str) -> Result<(), StoreError> {
        let draft = self.store.read(|s| {
            find(s, id).map(|t| EditingDraft {
                id: Some(t.id.clone()),
                input: t.to_input(),
            })
        })?;
        self.set_editing_draft(Some(draft));
        Ok(())
    }

    // ========== Filters & pagination ==========

    pub fn set_filters(&self, patch: AbTestFiltersPatch) {
        if self.store.dispatch(AbTestsIntent::SetFilters { patch }) {
            self.persist_ui();
        }
    }

    pub fn set_pagination(&self, patch: PaginationPatch) {
        self.store.dispatch(AbTestsIntent::SetPagination { patch });
    }

    pub fn set_sorting(&self, sorting: Sorting) {
        if self.store.dispatch(AbTestsIntent::SetSorting { sorting }) {
            self.persist_ui();
        }
    }

    pub fn clear_filters(&self) {
        if self.store.dispatch(AbTestsIntent::ClearFilters) {
            self.persist_ui();
        }
    }

    pub fn clear_error(&self) {
        self.store.dispatch(AbTestsIntent::ClearError);
    }

    // ========== Internals ==========

    /// Begin, simulate the round-trip, then either commit the intent
    /// produced by `op` or record the failure.
    async fn perform<T>(
        &self,
        action: &'static str,
        op: impl FnOnce(&AbTestsState) -> Result<(AbTestsIntent, T), StoreError>,
    ) -> Result<T, StoreError> {
        debug!(action, "A/B test action started");
        self.store.dispatch(AbTestsIntent::Begin);
        self.backend.round_trip().await;

        match self.store.dispatch_with(op) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.fail(action, &err);
                Err(err)
            }
        }
    }

    async fn transition(
        &self,
        id: &str,
        action: &'static str,
        apply: impl FnOnce(&AbTest, DateTime<Utc>) -> Result<AbTest, StoreError>,
    ) -> Result<(), StoreError> {
        let now = self.backend.now();
        let test = self
            .perform(action, |state| {
                let mut next = apply(find(state, id)?, now)?;
                next.updated_at = now;
                Ok((AbTestsIntent::Replaced { test: next.clone() }, next))
            })
            .await?;
        info!(test_id = %test.id, status = %test.status, action, "A/B test status changed");
        Ok(())
    }

    fn fail(&self, action: &'static str, err: &StoreError) {
        let message = err.to_string();
        warn!(action, error = %message, "A/B test action failed");
        self.errors.record(self.backend.now(), SOURCE, message.clone());
        self.store.dispatch(AbTestsIntent::Failed { message });
    }

    fn persist_ui(&self) {
        let Some(kv) = &self.persistence else {
            return;
        };
        let snapshot = self.store.read(|s| PersistedAbTests {
            filters: s.filters.clone(),
            sorting: s.sorting,
            editing_draft: s.editing_draft.clone(),
        });
        if let Err(e) = persist::save(kv.as_ref(), STORAGE_KEY, &snapshot) {
            warn!(error = %e, "Failed to persist A/B test view state");
            self.errors.record(self.backend.now(), SOURCE, e.to_string());
        }
    }

    fn new_test(&self, input: CreateAbTestInput) -> AbTest {
        let now = self.backend.now();
        AbTest {
            id: self.backend.mint_id("test"),
            campaign_name: format!("Campaign {}", input.campaign_id),
            variants: self.mint_variants(input.variants, &[]),
            name: input.name,
            description: input.description,
            campaign_id: input.campaign_id,
            channel: input.channel,
            status: AbTestStatus::Draft,
            target_metric: input.target_metric,
            start_date: None,
            end_date: None,
            duration_days: input.duration_days,
            sample_size: input.sample_size,
            winner: None,
            created_by: self.backend.current_user().to_string(),
            created_at: now,
            updated_at: now,
            metrics: None,
            tags: input.tags,
        }
    }

    fn apply_update(&self, current: &AbTest, input: UpdateAbTestInput) -> AbTest {
        let mut next = current.clone();
        if let Some(name) = input.name {
            next.name = name;
        }
        if let Some(description) = input.description {
            next.description = Some(description);
        }
        if let Some(campaign_id) = input.campaign_id {
            next.campaign_name = format!("Campaign {}", campaign_id);
            next.campaign_id = campaign_id;
        }
        if let Some(channel) = input.channel {
            next.channel = channel;
        }
        if let Some(variants) = input.variants {
            next.variants = self.mint_variants(variants, &current.variants);
        }
        if let Some(metric) = input.target_metric {
            next.target_metric = metric;
        }
        if let Some(days) = input.duration_days {
            next.duration_days = Some(days);
        }
        if let Some(size) = input.sample_size {
            next.sample_size = Some(size);
        }
        if let Some(tags) = input.tags {
            next.tags = tags;
        }
        next.updated_at = self.backend.now();
        next
    }

    /// Reuse the id of the variant at the same position, mint one otherwise.
    fn mint_variants(
        &self,
        inputs: Vec<VariantInput>,
        existing: &[Variant],
    ) -> Vec<Variant> {
        inputs
            .into_iter()
            .enumerate()
            .map(|(idx, input)| {
                let id = existing
                    .get(idx)
                    .map(|v| v.id.clone())
                    .unwrap_or_else(|| self.backend.mint_id("variant"));
                input.into_variant(id)
            })
            .collect()
    }
}

fn find<'a>(state: &'a AbTestsState, id: &str) -> Result<&'a AbTest, StoreError> {
    state.test(id).ok_or_else(|| StoreError::NotFound {
        kind: KIND,
        id: id.to_string(),
    })
}

fn require(test: &AbTest, allowed: &[AbTestStatus], action: &'static str) -> Result<(), StoreError> {
    if allowed.contains(&test.status) {
        Ok(())
    } else {
        Err(invalid_transition(test, action))
    }
}

fn invalid_transition(test: &AbTest, action: &'static str) -> StoreError {
    StoreError::InvalidTransition {
        id: test.id.clone(),
        from: test.status.to_string(),
        action,
    }
}

fn bulk_error(completed: usize, id: &str, source: StoreError) -> StoreError {
    StoreError::Bulk {
        completed,
        failed_id: id.to_string(),
        source: Box::new(source),
    }
}
