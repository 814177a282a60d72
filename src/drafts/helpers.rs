//! Merge, diff and display helpers for drafts.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::types::{Draft, DraftMedia, DraftStatus, UpdateDraftPayload};

/// Apply `updates` to `existing`, bump the version and stamp edit times.
///
/// `scheduled_for` values that do not parse as RFC 3339 are ignored; callers
/// validate the payload first.
pub fn merge_draft(existing: &Draft, updates: UpdateDraftPayload, now: DateTime<Utc>) -> Draft {
    let mut draft = apply_updates(existing.clone(), updates);
    draft.updated_at = now;
    draft.last_edited_at = now;
    draft.version = existing.version + 1;
    draft
}

/// Field-by-field overwrite without touching version or timestamps.
pub(crate) fn apply_updates(mut draft: Draft, updates: UpdateDraftPayload) -> Draft {
    if let Some(title) = updates.title {
        draft.title = title;
    }
    if let Some(body) = updates.body {
        draft.body = body;
    }
    if let Some(channel) = updates.channel {
        draft.channel = channel;
    }
    if updates.objective.is_some() {
        draft.objective = updates.objective;
    }
    if updates.tone.is_some() {
        draft.tone = updates.tone;
    }
    if updates.headline.is_some() {
        draft.headline = updates.headline;
    }
    if updates.cta.is_some() {
        draft.cta = updates.cta;
    }
    if updates.target_audience.is_some() {
        draft.target_audience = updates.target_audience;
    }
    if updates.key_message.is_some() {
        draft.key_message = updates.key_message;
    }
    if let Some(status) = updates.status {
        draft.status = status;
    }
    if let Some(tags) = updates.tags {
        draft.tags = tags;
    }
    if let Some(media) = updates.media {
        draft.media = media;
    }
    if updates.campaign.is_some() {
        draft.campaign = updates.campaign;
    }
    if let Some(at) = updates.scheduled_for {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&at) {
            draft.scheduled_for = Some(parsed.with_timezone(&Utc));
        }
    }
    draft
}

/// Whether the user-editable content differs (title, body, channel, tags, schedule).
pub fn has_unsaved_changes(original: &Draft, modified: &Draft) -> bool {
    original.title != modified.title
        || original.body != modified.body
        || original.channel != modified.channel
        || original.tags != modified.tags
        || original.scheduled_for != modified.scheduled_for
}

/// One-line description, e.g. `facebook post for Spring Sale with 2 media`.
pub fn draft_summary(draft: &Draft) -> String {
    let mut parts = vec![format!("{} post", draft.channel)];
    if let Some(campaign) = &draft.campaign {
        parts.push(format!("for {}", campaign.name));
    }
    if !draft.media.is_empty() {
        parts.push(format!("with {} media", draft.media.len()));
    }
    if let Some(at) = draft.scheduled_for {
        parts.push(format!("scheduled for {}", at.format("%Y-%m-%d")));
    }
    parts.join(" ")
}

/// Names (camelCase, as serialized) of the fields whose values differ.
pub fn diff_fields(original: &Draft, updated: &Draft) -> Vec<String> {
    let (Ok(Value::Object(before)), Ok(Value::Object(after))) =
        (serde_json::to_value(original), serde_json::to_value(updated))
    else {
        return Vec::new();
    };

    let mut changed: Vec<String> = after
        .iter()
        .filter(|(key, value)| before.get(key.as_str()) != Some(*value))
        .map(|(key, _)| key.clone())
        .collect();
    changed.extend(
        before
            .keys()
            .filter(|key| !after.contains_key(key.as_str()))
            .cloned(),
    );
    changed.sort();
    changed
}

/// Sum of known media sizes in bytes.
pub fn total_media_size(media: &[DraftMedia]) -> u64 {
    media.iter().filter_map(|m| m.size).sum()
}

/// Human-readable byte count, e.g. `1.5 MB`.
pub fn format_media_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Default title for a new draft, e.g. `email Draft 3 - Jun 1`.
pub fn generate_draft_title(channel: &str, index: usize, now: DateTime<Utc>) -> String {
    format!("{} Draft {} - {}", channel, index, now.format("%b %-d"))
}

pub fn can_publish_draft(draft: &Draft) -> bool {
    !draft.title.trim().is_empty()
        && draft.body.trim().chars().count() >= 10
        && draft.status != DraftStatus::Scheduled
}

/// Strip markup tags and truncate to `max_len` characters with an ellipsis.
pub fn sanitize_draft_content(content: &str, max_len: usize) -> String {
    let mut text = String::with_capacity(content.len());
    let mut in_tag = false;
    for c in content.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    let text = text.trim();
    if text.chars().count() > max_len {
        let cut: String = text.chars().take(max_len).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

/// `Just now`, `5m ago`, `3h ago`, `2d ago`, then a short date.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now - then;
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        then.format("%b %-d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafts::types::{DraftCampaign, DraftChannel, DraftOwner, MediaKind};
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, h, m, 0).unwrap()
    }

    fn draft() -> Draft {
        Draft {
            id: "draft-1".into(),
            title: "Summer teaser".into(),
            body: "Something warm is coming.".into(),
            channel: DraftChannel::Instagram,
            objective: None,
            tone: None,
            headline: None,
            cta: None,
            target_audience: None,
            key_message: None,
            status: DraftStatus::Draft,
            tags: vec!["summer".into()],
            media: Vec::new(),
            owner: DraftOwner {
                id: "user-1".into(),
                name: "Current User".into(),
            },
            campaign: None,
            scheduled_for: None,
            created_at: at(8, 0),
            updated_at: at(8, 0),
            last_edited_at: at(8, 0),
            last_edited_by: "Current User".into(),
            auto_saved_at: None,
            version: 1,
        }
    }

    #[test]
    fn merge_bumps_version_and_stamps() {
        let updated = merge_draft(
            &draft(),
            UpdateDraftPayload {
                title: Some("Summer is here".into()),
                scheduled_for: Some("2024-06-21T08:00:00Z".into()),
                ..Default::default()
            },
            at(9, 30),
        );
        assert_eq!(updated.title, "Summer is here");
        assert_eq!(updated.version, 2);
        assert_eq!(updated.updated_at, at(9, 30));
        assert_eq!(updated.last_edited_at, at(9, 30));
        assert_eq!(
            updated.scheduled_for,
            Some(Utc.with_ymd_and_hms(2024, 6, 21, 8, 0, 0).unwrap())
        );
        assert_eq!(updated.created_at, at(8, 0));
    }

    #[test]
    fn unsaved_changes_ignore_metadata() {
        let original = draft();
        let mut modified = original.clone();
        modified.version = 7;
        modified.updated_at = at(12, 0);
        assert!(!has_unsaved_changes(&original, &modified));

        modified.tags.push("teaser".into());
        assert!(has_unsaved_changes(&original, &modified));
    }

    #[test]
    fn summary_mentions_campaign_media_and_schedule() {
        let mut d = draft();
        d.campaign = Some(DraftCampaign {
            id: "c1".into(),
            name: "Summer Sale".into(),
        });
        d.media.push(DraftMedia {
            id: "m1".into(),
            kind: MediaKind::Image,
            url: "https://cdn.example.com/a.png".into(),
            thumbnail: None,
            name: "a.png".into(),
            size: Some(2048),
            mime_type: None,
        });
        d.scheduled_for = Some(Utc.with_ymd_and_hms(2024, 6, 21, 8, 0, 0).unwrap());
        assert_eq!(
            draft_summary(&d),
            "instagram post for Summer Sale with 1 media scheduled for 2024-06-21"
        );
        assert_eq!(total_media_size(&d.media), 2048);
    }

    #[test]
    fn diff_lists_changed_fields() {
        let original = draft();
        let mut updated = original.clone();
        updated.body = "New body".into();
        updated.headline = Some("Hot".into());
        assert_eq!(diff_fields(&original, &updated), vec!["body", "headline"]);
        assert!(diff_fields(&original, &original).is_empty());
    }

    #[test]
    fn media_sizes_format_like_a_file_browser() {
        assert_eq!(format_media_size(0), "0 Bytes");
        assert_eq!(format_media_size(512), "512 Bytes");
        assert_eq!(format_media_size(1536), "1.5 KB");
        assert_eq!(format_media_size(5 * 1024 * 1024), "5 MB");
    }

    #[test]
    fn publishable_needs_content_and_not_scheduled() {
        let mut d = draft();
        assert!(can_publish_draft(&d));
        d.status = DraftStatus::Scheduled;
        assert!(!can_publish_draft(&d));
        d.status = DraftStatus::Draft;
        d.body = "   short   ".into();
        assert!(!can_publish_draft(&d));
    }

    #[test]
    fn sanitize_strips_tags_and_truncates() {
        assert_eq!(sanitize_draft_content("<p>Hello <b>world</b></p>", 150), "Hello world");
        assert_eq!(sanitize_draft_content("abcdefgh", 5), "abcde...");
    }

    #[test]
    fn relative_time_buckets() {
        let now = at(12, 0);
        assert_eq!(relative_time(now - Duration::seconds(30), now), "Just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_time(now - Duration::days(2), now), "2d ago");
        assert_eq!(relative_time(now - Duration::days(9), now), "Jun 1");
    }

    #[test]
    fn generated_title_includes_channel_and_date() {
        assert_eq!(generate_draft_title("email", 3, at(9, 0)), "email Draft 3 - Jun 10");
    }
}
