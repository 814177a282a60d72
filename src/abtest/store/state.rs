use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::abtest::types::{
    AbTest, AbTestFilters, CreateAbTestInput, Pagination, SortField, SortOrder, Sorting,
};
use crate::mvi::StoreState;

/// In-progress editor buffer. `id` is `None` while creating a new test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditingDraft {
    pub id: Option<String>,
    pub input: CreateAbTestInput,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AbTestsState {
    pub tests: Vec<AbTest>,
    pub selected_ids: Vec<String>,
    pub editing_draft: Option<EditingDraft>,
    pub filters: AbTestFilters,
    pub pagination: Pagination,
    pub sorting: Sorting,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl StoreState for AbTestsState {}

impl AbTestsState {
    pub fn test(&self, id: &str) -> Option<&AbTest> {
        self.tests.iter().find(|t| t.id == id)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|s| s == id)
    }

    /// Tests passing the current filters, in collection order.
    pub fn filtered(&self) -> Vec<&AbTest> {
        self.tests.iter().filter(|t| self.filters.matches(t)).collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.tests.iter().filter(|t| self.filters.matches(t)).count()
    }

    /// Filtered, sorted and paginated tests for the list view.
    pub fn visible_tests(&self) -> Vec<AbTest> {
        let mut rows = self.filtered();
        rows.sort_by(|a, b| {
            let ord = compare(a, b, self.sorting.field);
            match self.sorting.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        rows[self.pagination.window(rows.len())]
            .iter()
            .map(|t| (*t).clone())
            .collect()
    }
}

/// Best click-through rate among a test's variants, 0 without metrics.
pub fn performance(test: &AbTest) -> f64 {
    test.metrics
        .iter()
        .flatten()
        .map(|m| m.ctr)
        .fold(0.0, f64::max)
}

fn compare(a: &AbTest, b: &AbTest, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::StartDate => a.start_date.cmp(&b.start_date),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::Performance => performance(a).total_cmp(&performance(b)),
    }
}
