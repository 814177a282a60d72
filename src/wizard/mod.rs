//! Multi-step campaign creation wizard.

pub mod audience;
pub mod export;
pub mod store;
pub mod types;
pub mod utm;
pub mod validation;

pub use audience::{estimate_reach, import_csv, reach_quality, ReachQuality};
pub use export::{campaign_file_name, export_campaign, CampaignSummary};
pub use store::{WizardIntent, WizardReducer, WizardState, WizardStore, STORAGE_KEY};
pub use types::*;
pub use utm::utm_url;
pub use validation::{can_publish, step_statuses, validate_step, validate_wizard};
