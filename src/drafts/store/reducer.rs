use crate::drafts::types::{DraftFilters, DraftPagination, DraftStatus};
use crate::mvi::Reducer;

use super::intent::DraftsIntent;
use super::state::DraftsState;

pub struct DraftsReducer;

impl Reducer for DraftsReducer {
    type State = DraftsState;
    type Intent = DraftsIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            DraftsIntent::Begin => {
                state.is_loading = true;
                state.error = None;
            }
            DraftsIntent::Failed { message } => {
                state.is_loading = false;
                state.error = Some(message);
            }
            DraftsIntent::Loaded { filters } => {
                state.filters = filters;
                state.is_loading = false;
            }
            DraftsIntent::Created { draft } => {
                state.drafts.insert(0, draft);
                state.is_loading = false;
            }
            DraftsIntent::Replaced { draft } => {
                if let Some(slot) = state.drafts.iter_mut().find(|d| d.id == draft.id) {
                    *slot = draft;
                }
                state.is_loading = false;
            }
            DraftsIntent::Removed { id } => {
                state.drafts.retain(|d| d.id != id);
                state.selected_ids.retain(|s| *s != id);
                state.is_loading = false;
            }
            DraftsIntent::SetSelected { ids } => state.selected_ids = ids,
            DraftsIntent::ToggleSelection { id } => {
                if let Some(pos) = state.selected_ids.iter().position(|s| *s == id) {
                    state.selected_ids.remove(pos);
                } else {
                    state.selected_ids.push(id);
                }
            }
            DraftsIntent::SelectAll => {
                state.selected_ids = state.drafts.iter().map(|d| d.id.clone()).collect();
            }
            DraftsIntent::ClearSelection => state.selected_ids.clear(),
            DraftsIntent::SetFilters { patch } => {
                state.filters = state.filters.merged(patch);
                state.pagination.page = 1;
            }
            DraftsIntent::ClearFilters => {
                state.filters = DraftFilters::default();
                state.pagination.page = 1;
            }
            DraftsIntent::StartEditing { draft } => {
                state.editing_drafts.insert(draft.id.clone(), draft);
            }
            DraftsIntent::EditingChanged { draft } => {
                state.autosave_queue.insert(draft.id.clone());
                state.editing_drafts.insert(draft.id.clone(), draft);
            }
            DraftsIntent::ClearEditing { id } => {
                state.editing_drafts.remove(&id);
                state.autosave_queue.remove(&id);
            }
            DraftsIntent::Autosaved { mut draft, at } => {
                draft.status = DraftStatus::AutoSaved;
                draft.auto_saved_at = Some(at);
                state.autosave_queue.remove(&draft.id);
                state.last_autosave.insert(draft.id.clone(), at);
                state.editing_drafts.insert(draft.id.clone(), draft);
            }
            DraftsIntent::StatsLoaded { stats } => {
                state.stats = Some(stats);
                state.is_loading = false;
            }
            DraftsIntent::SetPage { page } => state.pagination.page = page.max(1),
            DraftsIntent::SetPageSize { page_size } => {
                state.pagination.page_size = page_size.max(1);
                state.pagination.page = 1;
            }
            DraftsIntent::ClearError => state.error = None,
            DraftsIntent::Reset => {
                let page_size = state.pagination.page_size;
                state = DraftsState::default();
                state.pagination = DraftPagination {
                    page_size,
                    ..DraftPagination::default()
                };
            }
            DraftsIntent::Hydrate {
                editing_drafts,
                last_autosave,
            } => {
                state.editing_drafts = editing_drafts;
                state.last_autosave = last_autosave;
            }
        }
        let total = state.filtered_count();
        state.pagination.recount(total);
        state
    }
}
