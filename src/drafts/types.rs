//! Draft domain types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wizard::types::{Objective, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DraftStatus {
    Draft,
    InReview,
    Approved,
    Rejected,
    AutoSaved,
    Scheduled,
}

impl DraftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InReview => "in-review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::AutoSaved => "auto-saved",
            Self::Scheduled => "scheduled",
        }
    }
}

impl fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DraftChannel {
    Facebook,
    Instagram,
    Linkedin,
    Twitter,
    GoogleAds,
    Email,
}

impl DraftChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
            Self::GoogleAds => "google-ads",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for DraftChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Document,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftMedia {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub name: String,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOwner {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftCampaign {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub id: String,
    pub title: String,
    pub body: String,
    pub channel: DraftChannel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<Objective>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_message: Option<String>,
    pub status: DraftStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub media: Vec<DraftMedia>,
    pub owner: DraftOwner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<DraftCampaign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_edited_at: DateTime<Utc>,
    pub last_edited_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_saved_at: Option<DateTime<Utc>>,
    pub version: u32,
}

/// Fields accepted when creating a draft.
///
/// `scheduled_for` is kept as the raw RFC 3339 string until validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDraftPayload {
    pub title: String,
    pub body: String,
    pub channel: DraftChannel,
    #[serde(default)]
    pub objective: Option<Objective>,
    #[serde(default)]
    pub tone: Option<Tone>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub cta: Option<String>,
    #[serde(default)]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub key_message: Option<String>,
}

impl CreateDraftPayload {
    pub fn new(title: impl Into<String>, body: impl Into<String>, channel: DraftChannel) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            channel,
            objective: None,
            tone: None,
            headline: None,
            cta: None,
            campaign_id: None,
            tags: Vec::new(),
            scheduled_for: None,
            target_audience: None,
            key_message: None,
        }
    }
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDraftPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub channel: Option<DraftChannel>,
    pub objective: Option<Objective>,
    pub tone: Option<Tone>,
    pub headline: Option<String>,
    pub cta: Option<String>,
    pub target_audience: Option<String>,
    pub key_message: Option<String>,
    pub status: Option<DraftStatus>,
    pub tags: Option<Vec<String>>,
    pub media: Option<Vec<DraftMedia>>,
    pub campaign: Option<DraftCampaign>,
    pub scheduled_for: Option<String>,
}

impl From<&Draft> for UpdateDraftPayload {
    /// Every editable field of `draft`, as a full update.
    fn from(draft: &Draft) -> Self {
        Self {
            title: Some(draft.title.clone()),
            body: Some(draft.body.clone()),
            channel: Some(draft.channel),
            objective: draft.objective,
            tone: draft.tone,
            headline: draft.headline.clone(),
            cta: draft.cta.clone(),
            target_audience: draft.target_audience.clone(),
            key_message: draft.key_message.clone(),
            status: Some(draft.status),
            tags: Some(draft.tags.clone()),
            media: Some(draft.media.clone()),
            campaign: draft.campaign.clone(),
            scheduled_for: draft.scheduled_for.map(|at| at.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftFilters {
    pub search: String,
    pub channels: Vec<DraftChannel>,
    pub status: Vec<DraftStatus>,
    /// Owner ids.
    pub owners: Vec<String>,
    pub tags: Vec<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftFiltersPatch {
    pub search: Option<String>,
    pub channels: Option<Vec<DraftChannel>>,
    pub status: Option<Vec<DraftStatus>>,
    pub owners: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub date_from: Option<Option<DateTime<Utc>>>,
    pub date_to: Option<Option<DateTime<Utc>>>,
}

impl DraftFilters {
    pub fn merged(&self, patch: DraftFiltersPatch) -> Self {
        Self {
            search: patch.search.unwrap_or_else(|| self.search.clone()),
            channels: patch.channels.unwrap_or_else(|| self.channels.clone()),
            status: patch.status.unwrap_or_else(|| self.status.clone()),
            owners: patch.owners.unwrap_or_else(|| self.owners.clone()),
            tags: patch.tags.unwrap_or_else(|| self.tags.clone()),
            date_from: patch.date_from.unwrap_or(self.date_from),
            date_to: patch.date_to.unwrap_or(self.date_to),
        }
    }

    /// Search covers title and body, case-insensitively.
    pub fn matches(&self, draft: &Draft) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            if !draft.title.to_lowercase().contains(&needle)
                && !draft.body.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if !self.channels.is_empty() && !self.channels.contains(&draft.channel) {
            return false;
        }
        if !self.status.is_empty() && !self.status.contains(&draft.status) {
            return false;
        }
        if !self.owners.is_empty() && !self.owners.contains(&draft.owner.id) {
            return false;
        }
        if !self.tags.is_empty() && !draft.tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }
        if self.date_from.is_some_and(|from| draft.created_at < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| draft.created_at > to) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPagination {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl Default for DraftPagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
            total: 0,
            total_pages: 0,
        }
    }
}

impl DraftPagination {
    /// Set `total` and derive `total_pages` from it.
    pub fn recount(&mut self, total: usize) {
        self.total = total;
        self.total_pages = if self.page_size == 0 {
            0
        } else {
            total.div_ceil(self.page_size)
        };
    }

    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.page.saturating_sub(1).saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftStats {
    pub total: usize,
    pub by_channel: BTreeMap<DraftChannel, usize>,
    pub last_7_days: usize,
    pub auto_saved: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Delete,
    Publish,
    Duplicate,
    Archive,
}

impl BulkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Publish => "publish",
            Self::Duplicate => "duplicate",
            Self::Archive => "archive",
        }
    }
}

/// One item that failed inside a bulk action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    pub id: String,
    pub message: String,
}

/// Per-item result of a bulk action. Every item is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BulkOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
