use crate::abtest::types::{AbTest, AbTestFilters, AbTestFiltersPatch, PaginationPatch, Sorting};
use crate::mvi::Intent;

use super::state::EditingDraft;

#[derive(Debug, Clone)]
pub enum AbTestsIntent {
    /// An async action started.
    Begin,
    /// An async action failed; the message is shown to the user.
    Failed { message: String },
    Loaded { filters: AbTestFilters },
    Created { test: AbTest },
    /// Replace the test with the same id (update or lifecycle change).
    Replaced { test: AbTest },
    Deleted { id: String },
    SetSelected { ids: Vec<String> },
    ToggleSelection { id: String },
    SelectAll,
    ClearSelection,
    SetEditingDraft { draft: Option<EditingDraft> },
    SetFilters { patch: AbTestFiltersPatch },
    SetPagination { patch: PaginationPatch },
    SetSorting { sorting: Sorting },
    ClearFilters,
    ClearError,
    /// Restore the persisted UI subset.
    Hydrate {
        filters: AbTestFilters,
        sorting: Sorting,
        editing_draft: Option<EditingDraft>,
    },
}

impl Intent for AbTestsIntent {}
