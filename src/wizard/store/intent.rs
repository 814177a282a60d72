use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::mvi::Intent;
use crate::wizard::types::{
    Audience, BasicInfo, CampaignData, Creatives, CsvImport, Planning, TemplateData, Tracking,
    ValidationStep, WizardStep,
};

#[derive(Debug, Clone)]
pub enum WizardIntent {
    SetTemplate { template: TemplateData },
    SetBasicInfo { info: BasicInfo },
    SetCreatives { creatives: Creatives },
    SetAudience { audience: Audience },
    SetPlanning { planning: Planning },
    SetTracking { tracking: Tracking },
    SetValidation { validation: ValidationStep },
    /// Attach an imported contact list and its reach to the audience step.
    CsvImported { import: CsvImport, reach: u64 },
    GoToStep { index: usize },
    CompleteStep { step: WizardStep },
    SetStepValidation { step: WizardStep, valid: bool },
    SetAiCredits { credits: u32 },
    UseAiCredits { amount: u32 },
    SetGenerating { generating: bool },
    SetGenerationError { error: Option<String> },
    /// Ignored while a publish is already running.
    PublishStarted,
    PublishProgress { progress: f64 },
    PublishFinished,
    /// Records the error only. An in-flight publish keeps running.
    Failed { message: String },
    Saved { at: DateTime<Utc> },
    ClearError,
    Reset,
    Hydrate {
        data: CampaignData,
        step_validation: BTreeMap<WizardStep, bool>,
        current_step: usize,
        completed_steps: Vec<WizardStep>,
        ai_credits: u32,
        last_saved: Option<DateTime<Utc>>,
    },
}

impl Intent for WizardIntent {}
