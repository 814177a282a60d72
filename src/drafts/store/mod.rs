//! Drafts store: the draft list, selection, filters, editor buffers and
//! the autosave queue.

mod intent;
mod reducer;
mod state;

pub use intent::DraftsIntent;
pub use reducer::DraftsReducer;
pub use state::DraftsState;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::helpers::{apply_updates, merge_draft};
use super::types::{
    BulkAction, BulkFailure, BulkOutcome, CreateDraftPayload, Draft, DraftCampaign,
    DraftFiltersPatch, DraftOwner, DraftStats, DraftStatus, UpdateDraftPayload,
};
use super::validation::{validate_create_draft, validate_draft_for_publish, validate_update_draft};
use crate::backend::MockBackend;
use crate::config::Config;
use crate::error::{ErrorRegistry, StoreError};
use crate::mvi::Store;
use crate::persist::{self, KeyValueStore};

pub const STORAGE_KEY: &str = "drafts-storage";

const SOURCE: &str = "drafts";
const KIND: &str = "Draft";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedDrafts {
    #[serde(default)]
    editing_drafts: BTreeMap<String, Draft>,
    #[serde(default)]
    last_autosave: BTreeMap<String, DateTime<Utc>>,
}

pub struct DraftsStore {
    store: Store<DraftsReducer>,
    backend: MockBackend,
    errors: ErrorRegistry,
    persistence: Option<Arc<dyn KeyValueStore>>,
}

impl DraftsStore {
    pub fn new(backend: MockBackend, drafts: Vec<Draft>) -> Self {
        let mut initial = DraftsState {
            drafts,
            ..DraftsState::default()
        };
        let total = initial.drafts.len();
        initial.pagination.recount(total);
        Self {
            store: Store::new(initial),
            backend,
            errors: ErrorRegistry::default(),
            persistence: None,
        }
    }

    pub fn seeded(backend: MockBackend) -> Self {
        let drafts = super::seed::sample_drafts(backend.now());
        Self::new(backend, drafts)
    }

    pub fn configured(self, config: &Config) -> Self {
        self.store.dispatch(DraftsIntent::SetPageSize {
            page_size: config.defaults.page_size,
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

    pub fn with_persistence(mut self, kv: Arc<dyn KeyValueStore>) -> Result<Self, StoreError> {
        if let Some(saved) = persist::load::<PersistedDrafts>(kv.as_ref(), STORAGE_KEY)? {
            debug!(editing = saved.editing_drafts.len(), "Restoring persisted draft editors");
            self.store.dispatch(DraftsIntent::Hydrate {
                editing_drafts: saved.editing_drafts,
                last_autosave: saved.last_autosave,
            });
        }
        self.persistence = Some(kv);
        Ok(self)
    }

    pub fn state(&self) -> DraftsState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<DraftsState> {
        self.store.subscribe()
    }

    pub fn errors(&self) -> &ErrorRegistry {
        &self.errors
    }

    pub fn get_draft_by_id(&self, id: &str) -> Option<Draft> {
        self.store.read(|s| s.draft(id).cloned())
    }

    pub fn visible_drafts(&self) -> Vec<Draft> {
        self.store.read(DraftsState::visible_drafts)
    }

    // ========== CRUD ==========

    pub async fn fetch_drafts(&self, params: DraftFiltersPatch) -> Result<(), StoreError> {
        self.perform("fetch drafts", |state| {
            let filters = state.filters.merged(params);
            Ok((DraftsIntent::Loaded { filters }, ()))
        })
        .await
    }

    /// New draft at version 1, owned by the current user.
    pub async fn create_draft(&self, payload: CreateDraftPayload) -> Result<Draft, StoreError> {
        let draft = self
            .perform("create draft", |_| {
                let errors = validate_create_draft(&payload);
                if !errors.is_empty() {
                    return Err(StoreError::validation(errors));
                }
                let draft = self.new_draft(payload);
                Ok((DraftsIntent::Created { draft: draft.clone() }, draft))
            })
            .await?;
        info!(draft_id = %draft.id, channel = %draft.channel, "Draft created");
        Ok(draft)
    }

    pub async fn update_draft(
        &self,
        id: &str,
        payload: UpdateDraftPayload,
    ) -> Result<Draft, StoreError> {
        let now = self.backend.now();
        let draft = self
            .perform("update draft", |state| {
                let current = find(state, id)?;
                let errors = validate_update_draft(&payload);
                if !errors.is_empty() {
                    return Err(StoreError::validation(errors));
                }
                let mut draft = merge_draft(current, payload, now);
                draft.last_edited_by = self.backend.current_user().to_string();
                Ok((DraftsIntent::Replaced { draft: draft.clone() }, draft))
            })
            .await?;
        debug!(draft_id = %draft.id, version = draft.version, "Draft updated");
        Ok(draft)
    }

    /// Copy of a draft titled `<title> (Copy)`.
    pub async fn duplicate_draft(&self, id: &str) -> Result<Draft, StoreError> {
        let source = self.store.read(|s| find(s, id).cloned());
        let source = match source {
            Ok(draft) => draft,
            Err(err) => {
                self.fail("duplicate draft", &err);
                return Err(err);
            }
        };
        let mut payload = CreateDraftPayload::new(
            format!("{} (Copy)", source.title),
            source.body,
            source.channel,
        );
        payload.objective = source.objective;
        payload.tone = source.tone;
        payload.headline = source.headline;
        payload.cta = source.cta;
        payload.target_audience = source.target_audience;
        payload.key_message = source.key_message;
        payload.tags = source.tags;
        payload.campaign_id = source.campaign.map(|c| c.id);
        payload.scheduled_for = source.scheduled_for.map(|at| at.to_rfc3339());
        self.create_draft(payload).await
    }

    /// Publish a draft; published drafts leave the list.
    pub async fn publish_draft(&self, id: &str) -> Result<(), StoreError> {
        self.perform("publish draft", |state| {
            let draft = find(state, id)?;
            if draft.status == DraftStatus::Scheduled {
                return Err(StoreError::InvalidTransition {
                    id: draft.id.clone(),
                    from: draft.status.to_string(),
                    action: "publish",
                });
            }
            let errors = validate_draft_for_publish(draft);
            if !errors.is_empty() {
                return Err(StoreError::validation(errors));
            }
            Ok((DraftsIntent::Removed { id: draft.id.clone() }, ()))
        })
        .await?;
        info!(draft_id = %id, "Draft published");
        Ok(())
    }

    pub async fn delete_draft(&self, id: &str) -> Result<(), StoreError> {
        self.perform("delete draft", |state| {
            let draft = find(state, id)?;
            Ok((DraftsIntent::Removed { id: draft.id.clone() }, ()))
        })
        .await?;
        info!(draft_id = %id, "Draft deleted");
        Ok(())
    }

    /// Run `action` on every id and report each result.
    ///
    /// A failing item does not stop the others. `Archive` is refused up
    /// front.
    pub async fn bulk_action(
        &self,
        ids: &[String],
        action: BulkAction,
    ) -> Result<BulkOutcome, StoreError> {
        if action == BulkAction::Archive {
            let err = StoreError::Unsupported(action.as_str().to_string());
            self.fail("bulk action", &err);
            return Err(err);
        }

        let mut outcome = BulkOutcome::default();
        for id in ids {
            match self.bulk_item(id, action).await {
                Ok(()) => outcome.succeeded.push(id.clone()),
                Err(err) => outcome.failed.push(BulkFailure {
                    id: id.clone(),
                    message: err.to_string(),
                }),
            }
        }
        info!(
            action = action.as_str(),
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "Bulk draft action finished"
        );
        Ok(outcome)
    }

    async fn bulk_item(&self, id: &str, action: BulkAction) -> Result<(), StoreError> {
        match action {
            BulkAction::Delete => self.delete_draft(id).await,
            BulkAction::Publish => self.publish_draft(id).await,
            BulkAction::Duplicate => self.duplicate_draft(id).await.map(|_| ()),
            BulkAction::Archive => Err(StoreError::Unsupported(action.as_str().to_string())),
        }
    }

    // ========== Selection & filters ==========

    pub fn set_selected(&self, ids: Vec<String>) {
        self.store.dispatch(DraftsIntent::SetSelected { ids });
    }

    pub fn toggle_selection(&self, id: &str) {
        self.store.dispatch(DraftsIntent::ToggleSelection { id: id.to_string() });
    }

    pub fn select_all(&self) {
        self.store.dispatch(DraftsIntent::SelectAll);
    }

    pub fn clear_selection(&self) {
        self.store.dispatch(DraftsIntent::ClearSelection);
    }

    /// Merge `patch` into the filters and go back to page 1.
    pub fn set_filters(&self, patch: DraftFiltersPatch) {
        self.store.dispatch(DraftsIntent::SetFilters { patch });
    }

    pub fn clear_filters(&self) {
        self.store.dispatch(DraftsIntent::ClearFilters);
    }

    pub fn set_page(&self, page: usize) {
        self.store.dispatch(DraftsIntent::SetPage { page });
    }

    pub fn set_page_size(&self, page_size: usize) {
        self.store.dispatch(DraftsIntent::SetPageSize { page_size });
    }

    pub fn clear_error(&self) {
        self.store.dispatch(DraftsIntent::ClearError);
    }

    // ========== Editing & autosave ==========

    pub fn start_editing(&self, draft: Draft) {
        if self.store.dispatch(DraftsIntent::StartEditing { draft }) {
            self.persist_ui();
        }
    }

    /// Apply `updates` to the editor buffer of `id` and queue it for autosave.
    pub fn update_editing_draft(
        &self,
        id: &str,
        updates: UpdateDraftPayload,
    ) -> Result<(), StoreError> {
        let now = self.backend.now();
        self.store.dispatch_with(|s| {
            let Some(buffer) = s.editing_drafts.get(id).cloned() else {
                return Err(StoreError::NotFound {
                    kind: "Editor buffer",
                    id: id.to_string(),
                });
            };
            let mut draft = apply_updates(buffer, updates);
            draft.updated_at = now;
            Ok((DraftsIntent::EditingChanged { draft }, ()))
        })?;
        self.persist_ui();
        Ok(())
    }

    pub fn clear_editing_draft(&self, id: &str) {
        if self.store.dispatch(DraftsIntent::ClearEditing { id: id.to_string() }) {
            self.persist_ui();
        }
    }

    pub fn editing_draft(&self, id: &str) -> Option<Draft> {
        self.store.read(|s| s.editing_drafts.get(id).cloned())
    }

    /// Mark the buffer of `draft` as auto-saved and drop it from the queue.
    pub fn autosave_draft(&self, draft: Draft) {
        let at = self.backend.now();
        self.store.dispatch(DraftsIntent::Autosaved { draft, at });
        self.persist_ui();
    }

    /// Save every queued editor buffer, one at a time.
    ///
    /// Stops at the first failure. Returns how many buffers were saved.
    pub async fn process_autosave_queue(&self) -> Result<usize, StoreError> {
        let pending: Vec<Draft> = self.store.read(|s| {
            s.autosave_queue
                .iter()
                .filter_map(|id| s.editing_drafts.get(id).cloned())
                .collect()
        });

        let mut saved = 0;
        for buffer in pending {
            let stored = self
                .update_draft(&buffer.id, UpdateDraftPayload::from(&buffer))
                .await?;
            self.autosave_draft(stored);
            saved += 1;
        }
        if saved > 0 {
            debug!(saved, "Autosave queue flushed");
        }
        Ok(saved)
    }

    // ========== Stats ==========

    pub async fn fetch_stats(&self) -> Result<DraftStats, StoreError> {
        let week_ago = self.backend.now() - Duration::days(7);
        self.perform("fetch stats", |state| {
            let mut stats = DraftStats {
                total: state.drafts.len(),
                ..DraftStats::default()
            };
            for draft in &state.drafts {
                *stats.by_channel.entry(draft.channel).or_insert(0) += 1;
                if draft.created_at >= week_ago {
                    stats.last_7_days += 1;
                }
                if draft.status == DraftStatus::AutoSaved {
                    stats.auto_saved += 1;
                }
            }
            Ok((DraftsIntent::StatsLoaded { stats: stats.clone() }, stats))
        })
        .await
    }

    /// Drop every draft and all view state.
    pub fn reset(&self) {
        self.store.dispatch(DraftsIntent::Reset);
        self.persist_ui();
    }

    // ========== Internals ==========

    async fn perform<T>(
        &self,
        action: &'static str,
        op: impl FnOnce(&DraftsState) -> Result<(DraftsIntent, T), StoreError>,
    ) -> Result<T, StoreError> {
        debug!(action, "Draft action started");
        self.store.dispatch(DraftsIntent::Begin);
        self.backend.round_trip().await;

        match self.store.dispatch_with(op) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.fail(action, &err);
                Err(err)
            }
        }
    }

    fn fail(&self, action: &'static str, err: &StoreError) {
        let message = err.to_string();
        warn!(action, error = %message, "Draft action failed");
        self.errors.record(self.backend.now(), SOURCE, message.clone());
        self.store.dispatch(DraftsIntent::Failed { message });
    }

    fn persist_ui(&self) {
        let Some(kv) = &self.persistence else {
            return;
        };
        let snapshot = self.store.read(|s| PersistedDrafts {
            editing_drafts: s.editing_drafts.clone(),
            last_autosave: s.last_autosave.clone(),
        });
        if let Err(e) = persist::save(kv.as_ref(), STORAGE_KEY, &snapshot) {
            warn!(error = %e, "Failed to persist draft editors");
            self.errors.record(self.backend.now(), SOURCE, e.to_string());
        }
    }

    fn new_draft(&self, payload: CreateDraftPayload) -> Draft {
        let now = self.backend.now();
        let user = self.backend.current_user().to_string();
        let scheduled_for = payload
            .scheduled_for
            .as_deref()
            .and_then(|at| DateTime::parse_from_rfc3339(at).ok())
            .map(|at| at.with_timezone(&Utc));
        Draft {
            id: self.backend.mint_id("draft"),
            title: payload.title,
            body: payload.body,
            channel: payload.channel,
            objective: payload.objective,
            tone: payload.tone,
            headline: payload.headline,
            cta: payload.cta,
            target_audience: payload.target_audience,
            key_message: payload.key_message,
            status: DraftStatus::Draft,
            tags: payload.tags,
            media: Vec::new(),
            owner: DraftOwner {
                id: user.clone(),
                name: user.clone(),
            },
            campaign: payload.campaign_id.map(|id| DraftCampaign {
                name: format!("Campaign {}", id),
                id,
            }),
            scheduled_for,
            created_at: now,
            updated_at: now,
            last_edited_at: now,
            last_edited_by: user,
            auto_saved_at: None,
            version: 1,
        }
    }
}

fn find<'a>(state: &'a DraftsState, id: &str) -> Result<&'a Draft, StoreError> {
    state.draft(id).ok_or_else(|| StoreError::NotFound {
        kind: KIND,
        id: id.to_string(),
    })
}
