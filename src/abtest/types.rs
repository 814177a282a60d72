//! A/B test domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbTestStatus {
    Draft,
    Running,
    Paused,
    Completed,
    Archived,
}

impl AbTestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for AbTestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Sms,
    Push,
    Web,
    Social,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Ctr,
    Conversions,
    Cpa,
    Ltv,
    Engagement,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ctr => "ctr",
            Self::Conversions => "conversions",
            Self::Cpa => "cpa",
            Self::Ltv => "ltv",
            Self::Engagement => "engagement",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ctr => "Click-Through Rate",
            Self::Conversions => "Conversion Rate",
            Self::Cpa => "Cost Per Acquisition",
            Self::Ltv => "Lifetime Value",
            Self::Engagement => "Engagement Rate",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ctr" => Ok(Self::Ctr),
            "conversions" => Ok(Self::Conversions),
            "cpa" => Ok(Self::Cpa),
            "ltv" => Ok(Self::Ltv),
            "engagement" => Ok(Self::Engagement),
            other => Err(format!("unknown metric '{}'", other)),
        }
    }
}

/// Creative payload of a variant. Each kind carries only the field it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Creative {
    Image { url: String },
    Video { url: String },
    Text { content: String },
}

/// Variant fields as entered in the editor, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    pub name: String,
    pub traffic_percentage: f64,
    pub creative: Creative,
    pub headline: String,
    pub cta: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VariantInput {
    pub fn into_variant(self, id: String) -> Variant {
        Variant {
            id,
            name: self.name,
            traffic_percentage: self.traffic_percentage,
            creative: self.creative,
            headline: self.headline,
            cta: self.cta,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    pub name: String,
    pub traffic_percentage: f64,
    pub creative: Creative,
    pub headline: String,
    pub cta: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Variant> for VariantInput {
    fn from(v: &Variant) -> Self {
        Self {
            name: v.name.clone(),
            traffic_percentage: v.traffic_percentage,
            creative: v.creative.clone(),
            headline: v.headline.clone(),
            cta: v.cta.clone(),
            description: v.description.clone(),
        }
    }
}

/// Aggregated counters for one variant. Rates are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantMetrics {
    pub variant_id: String,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub ctr: f64,
    pub conversion_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ltv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl VariantMetrics {
    /// Build metrics from raw counters, deriving `ctr` and `conversion_rate`.
    pub fn from_counts(
        variant_id: impl Into<String>,
        impressions: u64,
        clicks: u64,
        conversions: u64,
    ) -> Self {
        Self {
            variant_id: variant_id.into(),
            impressions,
            clicks,
            conversions,
            ctr: percentage(clicks, impressions),
            conversion_rate: percentage(conversions, clicks),
            cpa: None,
            ltv: None,
            engagement: None,
            confidence: None,
        }
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbTest {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub campaign_id: String,
    pub campaign_name: String,
    pub channel: Channel,
    pub status: AbTestStatus,
    pub variants: Vec<Variant>,
    pub target_metric: MetricType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// Planned duration in days.
    #[serde(default, rename = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<u64>,
    /// Id of the declared winning variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<VariantMetrics>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl AbTest {
    pub fn variant(&self, variant_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    /// Fields of this test in editor form.
    pub fn to_input(&self) -> CreateAbTestInput {
        CreateAbTestInput {
            name: self.name.clone(),
            description: self.description.clone(),
            campaign_id: self.campaign_id.clone(),
            channel: self.channel,
            variants: self.variants.iter().map(VariantInput::from).collect(),
            target_metric: self.target_metric,
            duration_days: self.duration_days,
            sample_size: self.sample_size,
            tags: self.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAbTestInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub campaign_id: String,
    pub channel: Channel,
    pub variants: Vec<VariantInput>,
    pub target_metric: MetricType,
    #[serde(default, rename = "duration")]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub sample_size: Option<u64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAbTestInput {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub campaign_id: Option<String>,
    pub channel: Option<Channel>,
    pub variants: Option<Vec<VariantInput>>,
    pub target_metric: Option<MetricType>,
    #[serde(rename = "duration")]
    pub duration_days: Option<u32>,
    pub sample_size: Option<u64>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbTestFilters {
    pub search: String,
    pub status: Vec<AbTestStatus>,
    pub channels: Vec<Channel>,
    pub date_range: Option<DateRange>,
    pub campaigns: Vec<String>,
    pub owners: Vec<String>,
    pub tags: Vec<String>,
}

/// Partial filter update merged into the current filters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AbTestFiltersPatch {
    pub search: Option<String>,
    pub status: Option<Vec<AbTestStatus>>,
    pub channels: Option<Vec<Channel>>,
    pub date_range: Option<Option<DateRange>>,
    pub campaigns: Option<Vec<String>>,
    pub owners: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

impl AbTestFilters {
    pub fn merged(&self, patch: AbTestFiltersPatch) -> Self {
        Self {
            search: patch.search.unwrap_or_else(|| self.search.clone()),
            status: patch.status.unwrap_or_else(|| self.status.clone()),
            channels: patch.channels.unwrap_or_else(|| self.channels.clone()),
            date_range: patch.date_range.unwrap_or_else(|| self.date_range.clone()),
            campaigns: patch.campaigns.unwrap_or_else(|| self.campaigns.clone()),
            owners: patch.owners.unwrap_or_else(|| self.owners.clone()),
            tags: patch.tags.unwrap_or_else(|| self.tags.clone()),
        }
    }

    pub fn matches(&self, test: &AbTest) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            if !test.name.to_lowercase().contains(&needle)
                && !test.campaign_name.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if !self.status.is_empty() && !self.status.contains(&test.status) {
            return false;
        }
        if !self.channels.is_empty() && !self.channels.contains(&test.channel) {
            return false;
        }
        if let Some(range) = &self.date_range {
            if !range.contains(test.created_at) {
                return false;
            }
        }
        if !self.campaigns.is_empty() && !self.campaigns.contains(&test.campaign_id) {
            return false;
        }
        if !self.owners.is_empty() && !self.owners.contains(&test.created_by) {
            return false;
        }
        if !self.tags.is_empty() && !test.tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page index.
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            total: 0,
        }
    }
}

impl Pagination {
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.total.div_ceil(self.page_size)
        }
    }

    /// Index range of the current page within a list of `len` items.
    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.page.saturating_sub(1).saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaginationPatch {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    CreatedAt,
    StartDate,
    Status,
    Performance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorting {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for Sorting {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

/// Result of comparing the best variant against the control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerAnalysis {
    pub winner_id: String,
    pub confidence: f64,
    pub improvement: f64,
    pub significant: bool,
    pub reason: String,
}
