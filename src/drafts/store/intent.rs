use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::drafts::types::{Draft, DraftFilters, DraftFiltersPatch, DraftStats};
use crate::mvi::Intent;

#[derive(Debug, Clone)]
pub enum DraftsIntent {
    Begin,
    Failed { message: String },
    Loaded { filters: DraftFilters },
    Created { draft: Draft },
    Replaced { draft: Draft },
    /// Deleted or published; either way it leaves the list.
    Removed { id: String },
    SetSelected { ids: Vec<String> },
    ToggleSelection { id: String },
    SelectAll,
    ClearSelection,
    SetFilters { patch: DraftFiltersPatch },
    ClearFilters,
    StartEditing { draft: Draft },
    /// Editor buffer changed; queue it for autosave.
    EditingChanged { draft: Draft },
    ClearEditing { id: String },
    Autosaved { draft: Draft, at: DateTime<Utc> },
    StatsLoaded { stats: DraftStats },
    SetPage { page: usize },
    SetPageSize { page_size: usize },
    ClearError,
    Reset,
    Hydrate {
        editing_drafts: BTreeMap<String, Draft>,
        last_autosave: BTreeMap<String, DateTime<Utc>>,
    },
}

impl Intent for DraftsIntent {}
