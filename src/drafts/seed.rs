//! Sample drafts standing in for a backend.

use chrono::{DateTime, Duration, Utc};

use super::types::{
    Draft, DraftCampaign, DraftChannel, DraftMedia, DraftOwner, DraftStatus, MediaKind,
};

struct Sample {
    id: &'static str,
    title: &'static str,
    body: &'static str,
    channel: DraftChannel,
    status: DraftStatus,
    tags: &'static [&'static str],
    owner: (&'static str, &'static str),
    age_days: i64,
}

const SAMPLES: &[Sample] = &[
    Sample {
        id: "draft-1",
        title: "Spring Sale Announcement - Facebook",
        body: "Our biggest spring sale is here! Up to 40% off on the whole collection.",
        channel: DraftChannel::Facebook,
        status: DraftStatus::Draft,
        tags: &["spring", "sale"],
        owner: ("user-1", "Marie Martin"),
        age_days: 2,
    },
    Sample {
        id: "draft-2",
        title: "Product Launch Teaser",
        body: "Something new is coming next week. Stay tuned!",
        channel: DraftChannel::Instagram,
        status: DraftStatus::AutoSaved,
        tags: &["launch"],
        owner: ("user-2", "Jean Dupont"),
        age_days: 1,
    },
    Sample {
        id: "draft-3",
        title: "LinkedIn Company Update",
        body: "We are proud to welcome 25 new colleagues to our Lyon office this quarter.",
        channel: DraftChannel::Linkedin,
        status: DraftStatus::Draft,
        tags: &["corporate"],
        owner: ("user-1", "Marie Martin"),
        age_days: 5,
    },
    Sample {
        id: "draft-4",
        title: "Google Ads - Holiday Campaign",
        body: "Gift ideas for everyone on your list. Free delivery until December 20.",
        channel: DraftChannel::GoogleAds,
        status: DraftStatus::Scheduled,
        tags: &["holiday", "sale"],
        owner: ("user-3", "Pierre Bernard"),
        age_days: 12,
    },
    Sample {
        id: "draft-5",
        title: "Email Newsletter - October",
        body: "This month: new arrivals, a customer story and our autumn lookbook.",
        channel: DraftChannel::Email,
        status: DraftStatus::Draft,
        tags: &["newsletter"],
        owner: ("user-2", "Jean Dupont"),
        age_days: 20,
    },
];

pub fn sample_drafts(now: DateTime<Utc>) -> Vec<Draft> {
    SAMPLES
        .iter()
        .map(|s| {
            let created = now - Duration::days(s.age_days);
            let edited = created + Duration::hours(3);
            Draft {
                id: s.id.to_string(),
                title: s.title.to_string(),
                body: s.body.to_string(),
                channel: s.channel,
                objective: None,
                tone: None,
                headline: None,
                cta: None,
                target_audience: None,
                key_message: None,
                status: s.status,
                tags: s.tags.iter().map(|t| t.to_string()).collect(),
                media: sample_media(s.channel),
                owner: DraftOwner {
                    id: s.owner.0.to_string(),
                    name: s.owner.1.to_string(),
                },
                campaign: (s.status == DraftStatus::Scheduled).then(|| DraftCampaign {
                    id: "c7d5a9e2-4b1f-4e8a-9f3c-2d6b8a1e5f40".to_string(),
                    name: "Holiday Season".to_string(),
                }),
                scheduled_for: (s.status == DraftStatus::Scheduled)
                    .then(|| now + Duration::days(7)),
                created_at: created,
                updated_at: edited,
                last_edited_at: edited,
                last_edited_by: s.owner.1.to_string(),
                auto_saved_at: (s.status == DraftStatus::AutoSaved).then_some(edited),
                version: 1,
            }
        })
        .collect()
}

fn sample_media(channel: DraftChannel) -> Vec<DraftMedia> {
    match channel {
        DraftChannel::Facebook | DraftChannel::Instagram => vec![DraftMedia {
            id: format!("media-{}", channel),
            kind: MediaKind::Image,
            url: format!("https://cdn.example.com/{}/hero.jpg", channel),
            thumbnail: None,
            name: "hero.jpg".to_string(),
            size: Some(245_760),
            mime_type: Some("image/jpeg".to_string()),
        }],
        _ => Vec::new(),
    }
}
