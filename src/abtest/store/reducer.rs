use crate::abtest::types::{AbTestFilters, Pagination};
use crate::mvi::Reducer;

use super::intent::AbTestsIntent;
use super::state::AbTestsState;

pub struct AbTestsReducer;

impl Reducer for AbTestsReducer {
    type State = AbTestsState;
    type Intent = AbTestsIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            AbTestsIntent::Begin => {
                state.is_loading = true;
                state.error = None;
            }
            AbTestsIntent::Failed { message } => {
                state.is_loading = false;
                state.error = Some(message);
            }
            AbTestsIntent::Loaded { filters } => {
                state.filters = filters;
                state.is_loading = false;
            }
            AbTestsIntent::Created { test } => {
                state.tests.insert(0, test);
                state.is_loading = false;
            }
            AbTestsIntent::Replaced { test } => {
                if let Some(slot) = state.tests.iter_mut().find(|t| t.id == test.id) {
                    *slot = test;
                }
                state.is_loading = false;
            }
            AbTestsIntent::Deleted { id } => {
                state.tests.retain(|t| t.id != id);
                state.selected_ids.retain(|s| *s != id);
                state.is_loading = false;
            }
            AbTestsIntent::SetSelected { ids } => state.selected_ids = ids,
            AbTestsIntent::ToggleSelection { id } => {
                if let Some(pos) = state.selected_ids.iter().position(|s| *s == id) {
                    state.selected_ids.remove(pos);
                } else {
                    state.selected_ids.push(id);
                }
            }
            AbTestsIntent::SelectAll => {
                state.selected_ids = state.tests.iter().map(|t| t.id.clone()).collect();
            }
            AbTestsIntent::ClearSelection => state.selected_ids.clear(),
            AbTestsIntent::SetEditingDraft { draft } => state.editing_draft = draft,
            AbTestsIntent::SetFilters { patch } => {
                state.filters = state.filters.merged(patch);
                state.pagination.page = 1;
            }
            AbTestsIntent::SetPagination { patch } => {
                if let Some(page) = patch.page {
                    state.pagination.page = page.max(1);
                }
                if let Some(size) = patch.page_size {
                    state.pagination.page_size = size.max(1);
                }
            }
            AbTestsIntent::SetSorting { sorting } => state.sorting = sorting,
            AbTestsIntent::ClearFilters => {
                state.filters = AbTestFilters::default();
                state.pagination = Pagination {
                    page: 1,
                    page_size: state.pagination.page_size,
                    total: 0,
                };
            }
            AbTestsIntent::ClearError => state.error = None,
            AbTestsIntent::Hydrate {
                filters,
                sorting,
                editing_draft,
            } => {
                state.filters = filters;
                state.sorting = sorting;
                state.editing_draft = editing_draft;
            }
        }
        state.pagination.total = state.filtered_count();
        state
    }
}
