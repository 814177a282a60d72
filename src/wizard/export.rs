//! Campaign summary export.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::types::{
    Audience, BasicInfo, CampaignData, Creatives, Planning, TemplateData, Tracking,
    ValidationStep, WizardStep,
};
use crate::abtest::ExportBundle;
use crate::error::ExportError;

/// Everything the wizard knows about the campaign being built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub template: Option<TemplateData>,
    pub basic_info: Option<BasicInfo>,
    pub creatives: Option<Creatives>,
    pub audience: Option<Audience>,
    pub planning: Option<Planning>,
    pub tracking: Option<Tracking>,
    pub validation: Option<ValidationStep>,
    pub step_validation: BTreeMap<WizardStep, bool>,
    pub current_step: usize,
    pub completed_steps: Vec<WizardStep>,
}

impl CampaignSummary {
    pub fn new(
        data: CampaignData,
        step_validation: BTreeMap<WizardStep, bool>,
        current_step: usize,
        completed_steps: Vec<WizardStep>,
    ) -> Self {
        Self {
            template: data.template,
            basic_info: data.basic_info,
            creatives: data.creatives,
            audience: data.audience,
            planning: data.planning,
            tracking: data.tracking,
            validation: data.validation,
            step_validation,
            current_step,
            completed_steps,
        }
    }

    pub fn campaign_name(&self) -> Option<&str> {
        self.basic_info
            .as_ref()
            .map(|b| b.name.trim())
            .filter(|name| !name.is_empty())
    }
}

/// `campagne-<name>-<YYYY-MM-DD>.json`, `sans-nom` when unnamed.
pub fn campaign_file_name(name: Option<&str>, date: NaiveDate) -> String {
    let name: String = name
        .unwrap_or("sans-nom")
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    format!("campagne-{}-{}.json", name, date.format("%Y-%m-%d"))
}

pub fn export_campaign(
    summary: &CampaignSummary,
    date: NaiveDate,
) -> Result<ExportBundle, ExportError> {
    Ok(ExportBundle {
        file_name: campaign_file_name(summary.campaign_name(), date),
        contents: serde_json::to_string_pretty(summary)?,
    })
}
