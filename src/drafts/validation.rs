//! Field checks for draft payloads.

use chrono::DateTime;
use uuid::Uuid;

use super::types::{CreateDraftPayload, Draft, DraftMedia, DraftStatus, UpdateDraftPayload};
use crate::error::ValidationError;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_BODY_LEN: usize = 5000;
/// Minimum body length (characters) before a draft can be published.
pub const MIN_PUBLISH_BODY_LEN: usize = 10;

pub fn validate_create_draft(payload: &CreateDraftPayload) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_title(&payload.title, "Title is required", &mut errors);
    check_body(&payload.body, "Body content is required", &mut errors);

    if let Some(id) = &payload.campaign_id {
        if Uuid::parse_str(id).is_err() {
            errors.push(ValidationError::new("campaignId", "Invalid campaign id"));
        }
    }
    if let Some(at) = &payload.scheduled_for {
        check_datetime(at, &mut errors);
    }
    errors
}

/// Only fields present in the payload are checked.
pub fn validate_update_draft(payload: &UpdateDraftPayload) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Some(title) = &payload.title {
        check_title(title, "Title is required", &mut errors);
    }
    if let Some(body) = &payload.body {
        check_body(body, "Body content is required", &mut errors);
    }
    if let Some(media) = &payload.media {
        for (i, item) in media.iter().enumerate() {
            check_media(item, i, &mut errors);
        }
    }
    if let Some(at) = &payload.scheduled_for {
        check_datetime(at, &mut errors);
    }
    if let Some(status) = payload.status {
        if !matches!(
            status,
            DraftStatus::Draft | DraftStatus::AutoSaved | DraftStatus::Scheduled
        ) {
            errors.push(ValidationError::new(
                "status",
                format!("Status '{}' cannot be set on a draft", status),
            ));
        }
    }
    errors
}

pub fn validate_draft_for_publish(draft: &Draft) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if draft.title.is_empty() {
        errors.push(ValidationError::new("title", "Title required for publishing"));
    }
    if draft.body.chars().count() < MIN_PUBLISH_BODY_LEN {
        errors.push(ValidationError::new(
            "body",
            "Body must have at least 10 characters",
        ));
    }
    for (i, item) in draft.media.iter().enumerate() {
        check_media(item, i, &mut errors);
    }
    errors
}

fn check_title(title: &str, required: &str, errors: &mut Vec<ValidationError>) {
    let len = title.chars().count();
    if len == 0 {
        errors.push(ValidationError::new("title", required));
    } else if len > MAX_TITLE_LEN {
        errors.push(ValidationError::new("title", "Title too long"));
    }
}

fn check_body(body: &str, required: &str, errors: &mut Vec<ValidationError>) {
    let len = body.chars().count();
    if len == 0 {
        errors.push(ValidationError::new("body", required));
    } else if len > MAX_BODY_LEN {
        errors.push(ValidationError::new("body", "Content too long"));
    }
}

fn check_datetime(value: &str, errors: &mut Vec<ValidationError>) {
    if DateTime::parse_from_rfc3339(value).is_err() {
        errors.push(ValidationError::new("scheduledFor", "Invalid datetime"));
    }
}

fn check_media(item: &DraftMedia, index: usize, errors: &mut Vec<ValidationError>) {
    if !is_absolute_url(&item.url) {
        errors.push(ValidationError::new(
            format!("media.{}.url", index),
            "Invalid url",
        ));
    }
    if let Some(thumb) = &item.thumbnail {
        if !is_absolute_url(thumb) {
            errors.push(ValidationError::new(
                format!("media.{}.thumbnail", index),
                "Invalid url",
            ));
        }
    }
    if item.size.map_or(true, |s| s == 0) {
        errors.push(ValidationError::new(
            format!("media.{}.size", index),
            "Size must be positive",
        ));
    }
    if item.name.is_empty() {
        errors.push(ValidationError::new(
            format!("media.{}.name", index),
            "Name is required",
        ));
    }
}

/// `http://` or `https://` followed by a host.
pub fn is_absolute_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(rest) => rest
            .split(['/', '?', '#'])
            .next()
            .is_some_and(|host| !host.is_empty() && !host.contains(char::is_whitespace)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drafts::types::{DraftChannel, MediaKind};

    fn media(url: &str, size: Option<u64>) -> DraftMedia {
        DraftMedia {
            id: "m1".into(),
            kind: MediaKind::Image,
            url: url.into(),
            thumbnail: None,
            name: "hero.png".into(),
            size,
            mime_type: Some("image/png".into()),
        }
    }

    #[test]
    fn create_requires_title_and_body() {
        let errors = validate_create_draft(&CreateDraftPayload::new("", "", DraftChannel::Email));
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "body"]);
        assert_eq!(errors[0].message, "Title is required");
    }

    #[test]
    fn create_checks_campaign_uuid_and_schedule() {
        let mut payload = CreateDraftPayload::new("Launch", "Body", DraftChannel::Linkedin);
        payload.campaign_id = Some("camp-1".into());
        payload.scheduled_for = Some("tomorrow".into());
        let fields: Vec<_> = validate_create_draft(&payload)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["campaignId", "scheduledFor"]);

        payload.campaign_id = Some("6f1c1c2e-8a4b-4d53-9d6e-3f0c5d1b2a77".into());
        payload.scheduled_for = Some("2024-06-01T09:00:00Z".into());
        assert!(validate_create_draft(&payload).is_empty());
    }

    #[test]
    fn long_title_is_rejected() {
        let payload = CreateDraftPayload::new("x".repeat(201), "Body", DraftChannel::Email);
        assert_eq!(validate_create_draft(&payload)[0].message, "Title too long");
    }

    #[test]
    fn update_checks_only_present_fields() {
        assert!(validate_update_draft(&UpdateDraftPayload::default()).is_empty());

        let payload = UpdateDraftPayload {
            status: Some(DraftStatus::Approved),
            media: Some(vec![media("ftp://files/a.png", Some(10)), media("https://cdn.io/b.png", None)]),
            ..Default::default()
        };
        let fields: Vec<_> = validate_update_draft(&payload)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["media.0.url", "media.1.size", "status"]);
    }

    #[test]
    fn url_check() {
        assert!(is_absolute_url("https://cdn.example.com/a.png"));
        assert!(is_absolute_url("http://localhost"));
        assert!(!is_absolute_url("https://"));
        assert!(!is_absolute_url("/relative/path.png"));
    }
}
