//! In-memory sample data standing in for a backend.

use chrono::{DateTime, Duration, Utc};

use super::types::{
    AbTest, AbTestStatus, Channel, Creative, MetricType, Variant, VariantMetrics,
};

fn variant(id: &str, name: &str, pct: f64, headline: &str, cta: &str, creative: Creative) -> Variant {
    Variant {
        id: id.to_string(),
        name: name.to_string(),
        traffic_percentage: pct,
        creative,
        headline: headline.to_string(),
        cta: cta.to_string(),
        description: None,
    }
}

/// A handful of tests covering every lifecycle state except archived.
pub fn sample_tests(now: DateTime<Utc>) -> Vec<AbTest> {
    vec![
        AbTest {
            id: "test-1".to_string(),
            name: "Spring newsletter subject line".to_string(),
            description: Some("Urgency vs. curiosity in the subject line".to_string()),
            campaign_id: "camp-1".to_string(),
            campaign_name: "Spring Sale 2024".to_string(),
            channel: Channel::Email,
            status: AbTestStatus::Running,
            variants: vec![
                variant(
                    "variant-1a",
                    "Control",
                    50.0,
                    "Spring sale starts now",
                    "Shop now",
                    Creative::Text {
                        content: "Our spring collection is here.".to_string(),
                    },
                ),
                variant(
                    "variant-1b",
                    "Curiosity",
                    50.0,
                    "Something new is blooming",
                    "Discover",
                    Creative::Text {
                        content: "Guess what just arrived?".to_string(),
                    },
                ),
            ],
            target_metric: MetricType::Ctr,
            start_date: Some(now - Duration::days(6)),
            end_date: None,
            duration_days: Some(14),
            sample_size: Some(20_000),
            winner: None,
            created_by: "marie.martin".to_string(),
            created_at: now - Duration::days(8),
            updated_at: now - Duration::days(6),
            metrics: Some(vec![
                VariantMetrics::from_counts("variant-1a", 10_000, 250, 25),
                VariantMetrics::from_counts("variant-1b", 10_000, 300, 35),
            ]),
            tags: vec!["email".to_string(), "seasonal".to_string()],
        },
        AbTest {
            id: "test-2".to_string(),
            name: "Landing hero image".to_string(),
            description: None,
            campaign_id: "camp-2".to_string(),
            campaign_name: "Product Launch".to_string(),
            channel: Channel::Web,
            status: AbTestStatus::Draft,
            variants: vec![
                variant(
                    "variant-2a",
                    "Lifestyle",
                    50.0,
                    "Meet the new X1",
                    "Pre-order",
                    Creative::Image {
                        url: "https://cdn.example.com/x1-lifestyle.jpg".to_string(),
                    },
                ),
                variant(
                    "variant-2b",
                    "Product shot",
                    50.0,
                    "Meet the new X1",
                    "Pre-order",
                    Creative::Image {
                        url: "https://cdn.example.com/x1-studio.jpg".to_string(),
                    },
                ),
            ],
            target_metric: MetricType::Conversions,
            start_date: None,
            end_date: None,
            duration_days: Some(21),
            sample_size: Some(5_000),
            winner: None,
            created_by: "jean.dupont".to_string(),
            created_at: now - Duration::days(2),
            updated_at: now - Duration::days(1),
            metrics: None,
            tags: vec!["launch".to_string()],
        },
        AbTest {
            id: "test-3".to_string(),
            name: "Push reminder timing".to_string(),
            description: None,
            campaign_id: "camp-3".to_string(),
            campaign_name: "Retention Q2".to_string(),
            channel: Channel::Push,
            status: AbTestStatus::Completed,
            variants: vec![
                variant(
                    "variant-3a",
                    "Morning",
                    34.0,
                    "Your cart misses you",
                    "Open app",
                    Creative::Text {
                        content: "Items are waiting.".to_string(),
                    },
                ),
                variant(
                    "variant-3b",
                    "Lunch",
                    33.0,
                    "Your cart misses you",
                    "Open app",
                    Creative::Text {
                        content: "Items are waiting.".to_string(),
                    },
                ),
                variant(
                    "variant-3c",
                    "Evening",
                    33.0,
                    "Your cart misses you",
                    "Open app",
                    Creative::Text {
                        content: "Items are waiting.".to_string(),
                    },
                ),
            ],
            target_metric: MetricType::Ctr,
            start_date: Some(now - Duration::days(40)),
            end_date: Some(now - Duration::days(26)),
            duration_days: Some(14),
            sample_size: Some(30_000),
            winner: Some("variant-3c".to_string()),
            created_by: "pierre.bernard".to_string(),
            created_at: now - Duration::days(45),
            updated_at: now - Duration::days(26),
            metrics: Some(vec![
                VariantMetrics::from_counts("variant-3a", 12_000, 360, 40),
                VariantMetrics::from_counts("variant-3b", 11_800, 380, 41),
                VariantMetrics::from_counts("variant-3c", 11_900, 476, 60),
            ]),
            tags: vec!["push".to_string()],
        },
        AbTest {
            id: "test-4".to_string(),
            name: "Social carousel CTA".to_string(),
            description: None,
            campaign_id: "camp-1".to_string(),
            campaign_name: "Spring Sale 2024".to_string(),
            channel: Channel::Social,
            status: AbTestStatus::Paused,
            variants: vec![
                variant(
                    "variant-4a",
                    "Shop now",
                    60.0,
                    "Fresh looks for spring",
                    "Shop now",
                    Creative::Video {
                        url: "https://cdn.example.com/spring.mp4".to_string(),
                    },
                ),
                variant(
                    "variant-4b",
                    "Learn more",
                    40.0,
                    "Fresh looks for spring",
                    "Learn more",
                    Creative::Video {
                        url: "https://cdn.example.com/spring.mp4".to_string(),
                    },
                ),
            ],
            target_metric: MetricType::Engagement,
            start_date: Some(now - Duration::days(10)),
            end_date: None,
            duration_days: Some(30),
            sample_size: None,
            winner: None,
            created_by: "marie.martin".to_string(),
            created_at: now - Duration::days(12),
            updated_at: now - Duration::days(3),
            metrics: None,
            tags: vec!["social".to_string(), "seasonal".to_string()],
        },
    ]
}
