use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::drafts::types::{Draft, DraftFilters, DraftPagination, DraftStats};
use crate::mvi::StoreState;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftsState {
    pub drafts: Vec<Draft>,
    /// Open editor buffers keyed by draft id.
    pub editing_drafts: BTreeMap<String, Draft>,
    pub selected_ids: Vec<String>,
    pub filters: DraftFilters,
    pub pagination: DraftPagination,
    pub stats: Option<DraftStats>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Ids with edits waiting to be autosaved.
    pub autosave_queue: BTreeSet<String>,
    pub last_autosave: BTreeMap<String, DateTime<Utc>>,
}

impl StoreState for DraftsState {}

impl DraftsState {
    pub fn draft(&self, id: &str) -> Option<&Draft> {
        self.drafts.iter().find(|d| d.id == id)
    }

    pub fn filtered_count(&self) -> usize {
        self.drafts.iter().filter(|d| self.filters.matches(d)).count()
    }

    /// Filtered drafts on the current page, in collection order.
    pub fn visible_drafts(&self) -> Vec<Draft> {
        let rows: Vec<&Draft> = self
            .drafts
            .iter()
            .filter(|d| self.filters.matches(d))
            .collect();
        rows[self.pagination.window(rows.len())]
            .iter()
            .map(|d| (*d).clone())
            .collect()
    }
}
