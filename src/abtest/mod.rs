//! A/B testing: domain types, the significance engine, the traffic
//! splitter, validation rules, JSON export and the feature store.

pub mod export;
pub mod seed;
pub mod splitter;
pub mod stats;
pub mod store;
pub mod types;
pub mod validation;

pub use export::{export_tests, import_tests, ExportBundle};
pub use stats::{
    calculate_required_sample_size, calculate_significance, calculate_test_progress,
    determine_winner, format_metric_value, has_reached_significance, Significance,
};
pub use store::{AbTestsState, AbTestsStore, EditingDraft};
pub use types::{
    AbTest, AbTestFilters, AbTestFiltersPatch, AbTestStatus, Channel, CreateAbTestInput,
    Creative, MetricType, Pagination, PaginationPatch, SortField, SortOrder, Sorting,
    UpdateAbTestInput, Variant, VariantInput, VariantMetrics, WinnerAnalysis,
};
