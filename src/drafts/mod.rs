//! Campaign drafts: unpublished channel content awaiting review or
//! scheduling.

pub mod helpers;
pub mod seed;
pub mod store;
pub mod types;
pub mod validation;

pub use store::{DraftsState, DraftsStore};
pub use types::{
    BulkAction, BulkFailure, BulkOutcome, CreateDraftPayload, Draft, DraftCampaign,
    DraftChannel, DraftFilters, DraftFiltersPatch, DraftMedia, DraftOwner, DraftPagination,
    DraftStats, DraftStatus, MediaKind, UpdateDraftPayload,
};
