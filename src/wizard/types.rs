//! Campaign wizard form data, one closed struct per step.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Awareness,
    Traffic,
    Engagement,
    Leads,
    Conversions,
    Sales,
    AppInstalls,
    VideoViews,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Professional,
    Friendly,
    Casual,
    Urgent,
    Inspirational,
    Humorous,
    Educational,
    Formal,
    Conversational,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    Promotion,
    Newsletter,
    LeadGeneration,
    Retention,
    Event,
    ProductLaunch,
    Seasonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignChannel {
    Email,
    Sms,
    Whatsapp,
    Facebook,
    Instagram,
    GoogleAds,
    Linkedin,
    Twitter,
    Youtube,
    Tiktok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "MGA")]
    Mga,
}

/// Wizard steps in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Template,
    BasicInfo,
    Creatives,
    Audience,
    Planning,
    Tracking,
    Validation,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        WizardStep::Template,
        WizardStep::BasicInfo,
        WizardStep::Creatives,
        WizardStep::Audience,
        WizardStep::Planning,
        WizardStep::Tracking,
        WizardStep::Validation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::BasicInfo => "basic_info",
            Self::Creatives => "creatives",
            Self::Audience => "audience",
            Self::Planning => "planning",
            Self::Tracking => "tracking",
            Self::Validation => "validation",
        }
    }

    /// Zero-based position in [`WizardStep::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Template picked on the first step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateData {
    pub id: String,
    pub name: String,
    pub category: String,
    pub objective: Objective,
    pub channels: Vec<CampaignChannel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub objective: Objective,
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    pub channels: Vec<CampaignChannel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MediaType,
    pub url: String,
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creatives {
    pub headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub media_files: Vec<MediaFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_prompt: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Age,
    Location,
    Interests,
    Behavior,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    Contains,
    In,
    Between,
    GreaterThan,
    LessThan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(f64),
    Text(String),
    Numbers(Vec<f64>),
    Texts(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceFilter {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FilterKind,
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

/// Result of a contact-list import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvImport {
    pub file_name: String,
    pub headers: Vec<String>,
    pub row_count: u64,
    pub valid_rows: u64,
    /// First rows, one value per header.
    #[serde(default)]
    pub preview: Vec<Vec<String>>,
}

impl CsvImport {
    pub fn invalid_rows(&self) -> u64 {
        self.row_count.saturating_sub(self.valid_rows)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audience {
    pub selected_segments: Vec<String>,
    #[serde(default)]
    pub custom_filters: Vec<AudienceFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_import: Option<CsvImport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_reach: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planning {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub budget: f64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub is_daily_budget: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_reach: Option<u64>,
}

fn default_timezone() -> String {
    "Europe/Paris".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UtmParameters {
    pub source: String,
    pub medium: String,
    pub campaign: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestedElementKind {
    Headline,
    Description,
    CtaButton,
    Image,
    Video,
    Price,
    Offer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestedElement {
    #[serde(rename = "type")]
    pub kind: TestedElementKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A/B variant configured inside the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardVariant {
    pub id: String,
    pub name: String,
    pub percentage: f64,
    #[serde(default)]
    pub is_control: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub elements: Vec<TestedElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_outcome: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tracking {
    #[serde(rename = "utmParameters")]
    pub utm: UtmParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_url: Option<String>,
    #[serde(default)]
    pub ab_test_enabled: bool,
    #[serde(default)]
    pub ab_test_variants: Vec<WizardVariant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub visuals_approved: bool,
    pub budget_validated: bool,
    pub audience_confirmed: bool,
    pub tracking_setup: bool,
    pub legal_compliance: bool,
}

impl Checklist {
    pub fn is_complete(&self) -> bool {
        self.visuals_approved
            && self.budget_validated
            && self.audience_confirmed
            && self.tracking_setup
            && self.legal_compliance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishMode {
    #[default]
    Draft,
    Schedule,
    Publish,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStep {
    pub checklist: Checklist,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub publish_mode: PublishMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Per-step overview entry shown before publishing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepStatus {
    pub step: WizardStep,
    pub valid: bool,
    /// Labels of the required items still missing.
    pub missing: Vec<&'static str>,
}

/// Everything entered so far. A step is `None` until its form is submitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignData {
    #[serde(default)]
    pub template: Option<TemplateData>,
    #[serde(default)]
    pub basic_info: Option<BasicInfo>,
    #[serde(default)]
    pub creatives: Option<Creatives>,
    #[serde(default)]
    pub audience: Option<Audience>,
    #[serde(default)]
    pub planning: Option<Planning>,
    #[serde(default)]
    pub tracking: Option<Tracking>,
    #[serde(default)]
    pub validation: Option<ValidationStep>,
}
