use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::mvi::StoreState;
use crate::wizard::types::{CampaignData, WizardStep};

/// Credits granted to a fresh wizard for AI text generation.
pub const DEFAULT_AI_CREDITS: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pub data: CampaignData,
    /// Last known validity of each step form.
    pub step_validation: BTreeMap<WizardStep, bool>,
    /// Index into [`WizardStep::ALL`].
    pub current_step: usize,
    pub completed_steps: Vec<WizardStep>,
    pub ai_credits: u32,
    pub is_generating: bool,
    pub generation_error: Option<String>,
    pub last_saved: Option<DateTime<Utc>>,
    pub is_publishing: bool,
    /// 0 to 100 while publishing.
    pub publishing_progress: f64,
    pub error: Option<String>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            data: CampaignData::default(),
            step_validation: BTreeMap::new(),
            current_step: 0,
            completed_steps: Vec::new(),
            ai_credits: DEFAULT_AI_CREDITS,
            is_generating: false,
            generation_error: None,
            last_saved: None,
            is_publishing: false,
            publishing_progress: 0.0,
            error: None,
        }
    }
}

impl StoreState for WizardState {}

impl WizardState {
    pub fn step(&self) -> WizardStep {
        WizardStep::from_index(self.current_step).unwrap_or(WizardStep::Template)
    }

    pub fn is_step_completed(&self, step: WizardStep) -> bool {
        self.completed_steps.contains(&step)
    }
}
