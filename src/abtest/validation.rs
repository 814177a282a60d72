//! Business-rule checks for A/B tests.
//!
//! All checks return data; nothing here fails.

use chrono::{DateTime, Utc};

use super::splitter::SPLIT_TOLERANCE;
use super::types::{AbTest, AbTestStatus, CreateAbTestInput, Creative, VariantInput};
use crate::error::{summarize, ValidationError};

pub const MIN_VARIANTS: usize = 2;
pub const MAX_VARIANTS: usize = 10;
pub const MAX_NAME_LEN: usize = 100;
pub const MIN_DURATION_DAYS: u32 = 1;
pub const MAX_DURATION_DAYS: u32 = 90;
pub const MIN_SAMPLE_SIZE: u64 = 100;

/// Traffic percentages must cover at least two variants and sum to 100.
pub fn validate_traffic_split(percentages: &[f64]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if percentages.len() < MIN_VARIANTS {
        errors.push(ValidationError::new(
            "variants",
            "At least 2 variants are required for A/B testing",
        ));
        return errors;
    }

    let total: f64 = percentages.iter().sum();
    if (total - 100.0).abs() > SPLIT_TOLERANCE {
        errors.push(ValidationError::new(
            "trafficSplit",
            format!("Traffic split must equal 100% (current: {:.1}%)", total),
        ));
    }

    for (idx, p) in percentages.iter().enumerate() {
        if !(0.0..=100.0).contains(p) {
            errors.push(ValidationError::new(
                format!("variants[{}].trafficPercentage", idx),
                "Traffic percentage must be between 0-100%",
            ));
        }
    }

    errors
}

pub fn validate_variant(variant: &VariantInput, index: usize) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let field = |name: &str| format!("variants[{}].{}", index, name);

    if variant.name.trim().is_empty() {
        errors.push(ValidationError::new(field("name"), "Variant name is required"));
    }
    if variant.headline.trim().is_empty() {
        errors.push(ValidationError::new(field("headline"), "Headline is required"));
    }
    if variant.cta.trim().is_empty() {
        errors.push(ValidationError::new(field("cta"), "Call-to-action is required"));
    }

    let creative_error = match &variant.creative {
        Creative::Image { url } if url.trim().is_empty() => {
            Some("Image URL is required for image creatives")
        }
        Creative::Video { url } if url.trim().is_empty() => {
            Some("Video URL is required for video creatives")
        }
        Creative::Text { content } if content.trim().is_empty() => {
            Some("Text content is required for text creatives")
        }
        _ => None,
    };
    if let Some(message) = creative_error {
        errors.push(ValidationError::new(field("creative"), message));
    }

    errors
}

pub fn validate_ab_test(input: &CreateAbTestInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if input.name.trim().is_empty() {
        errors.push(ValidationError::new("name", "Test name is required"));
    }
    if input.name.chars().count() > MAX_NAME_LEN {
        errors.push(ValidationError::new(
            "name",
            "Test name must be less than 100 characters",
        ));
    }
    if input.campaign_id.trim().is_empty() {
        errors.push(ValidationError::new("campaignId", "Campaign is required"));
    }

    if input.variants.len() < MIN_VARIANTS {
        errors.push(ValidationError::new("variants", "At least 2 variants are required"));
    }
    if input.variants.len() > MAX_VARIANTS {
        errors.push(ValidationError::new("variants", "Maximum 10 variants allowed"));
    }

    for (idx, variant) in input.variants.iter().enumerate() {
        errors.extend(validate_variant(variant, idx));
    }

    let percentages: Vec<f64> = input.variants.iter().map(|v| v.traffic_percentage).collect();
    errors.extend(validate_traffic_split(&percentages));

    if let Some(days) = input.duration_days {
        if days < MIN_DURATION_DAYS {
            errors.push(ValidationError::new(
                "duration",
                "Test duration must be at least 1 day",
            ));
        }
        if days > MAX_DURATION_DAYS {
            errors.push(ValidationError::new(
                "duration",
                "Test duration cannot exceed 90 days",
            ));
        }
    }

    if let Some(size) = input.sample_size {
        if size < MIN_SAMPLE_SIZE {
            errors.push(ValidationError::new(
                "sampleSize",
                "Sample size must be at least 100",
            ));
        }
    }

    errors
}

/// Outcome of an action gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Allowed,
    Blocked(String),
}

impl Gate {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Gate::Allowed)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Gate::Allowed => None,
            Gate::Blocked(reason) => Some(reason),
        }
    }
}

/// A test starts only from draft and only with a clean validation.
pub fn can_start_test(test: &AbTest) -> Gate {
    if test.status != AbTestStatus::Draft {
        return Gate::Blocked("Test must be in draft status to start".to_string());
    }
    let errors = validate_ab_test(&test.to_input());
    if !errors.is_empty() {
        return Gate::Blocked(format!("Validation errors: {}", summarize(&errors)));
    }
    Gate::Allowed
}

pub fn can_stop_test(test: &AbTest) -> Gate {
    match test.status {
        AbTestStatus::Running | AbTestStatus::Paused => Gate::Allowed,
        _ => Gate::Blocked("Only running or paused tests can be stopped".to_string()),
    }
}

/// Every variant has at least `min_size` impressions. No metrics means no.
pub fn has_minimum_sample_size(test: &AbTest, min_size: u64) -> bool {
    match &test.metrics {
        Some(metrics) if !metrics.is_empty() => metrics.iter().all(|m| m.impressions >= min_size),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub issues: Vec<String>,
}

/// Overrun factor over the planned duration before a running test is flagged.
const OVERRUN_FACTOR: f64 = 1.5;
/// Relative deviation from mean impressions that counts as unbalanced.
const MAX_IMPRESSION_DEVIATION: f64 = 0.2;
const STALE_PAUSE_DAYS: f64 = 14.0;

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 86_400_000.0
}

/// Operational health: one issue is a warning, two or more an error.
pub fn test_health_status(test: &AbTest, now: DateTime<Utc>) -> HealthReport {
    let mut issues = Vec::new();

    if test.status == AbTestStatus::Running {
        if let (Some(start), Some(days)) = (test.start_date, test.duration_days) {
            if days_between(start, now) > f64::from(days) * OVERRUN_FACTOR {
                issues.push("Test is running longer than planned duration".to_string());
            }
        }
    }

    if let Some(metrics) = test.metrics.as_deref().filter(|m| !m.is_empty()) {
        let mean = metrics.iter().map(|m| m.impressions as f64).sum::<f64>() / metrics.len() as f64;
        if mean > 0.0 {
            let max_deviation = metrics
                .iter()
                .map(|m| (m.impressions as f64 - mean).abs() / mean)
                .fold(0.0, f64::max);
            if max_deviation > MAX_IMPRESSION_DEVIATION {
                issues.push("Uneven traffic distribution detected".to_string());
            }
        }
    }

    if test.status == AbTestStatus::Paused && days_between(test.updated_at, now) > STALE_PAUSE_DAYS {
        issues.push("Test has been paused for over 2 weeks".to_string());
    }

    let status = match issues.len() {
        0 => HealthStatus::Healthy,
        1 => HealthStatus::Warning,
        _ => HealthStatus::Error,
    };
    HealthReport { status, issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abtest::types::{Channel, MetricType};

    fn variant(name: &str, pct: f64) -> VariantInput {
        VariantInput {
            name: name.to_string(),
            traffic_percentage: pct,
            creative: Creative::Text {
                content: "Spring sale".to_string(),
            },
            headline: "Save 20%".to_string(),
            cta: "Shop now".to_string(),
            description: None,
        }
    }

    fn input(variants: Vec<VariantInput>) -> CreateAbTestInput {
        CreateAbTestInput {
            name: "Subject line test".to_string(),
            description: None,
            campaign_id: "camp-1".to_string(),
            channel: Channel::Email,
            variants,
            target_metric: MetricType::Ctr,
            duration_days: Some(14),
            sample_size: Some(1000),
            tags: vec![],
        }
    }

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn valid_fifty_fifty_has_no_errors() {
        let errors = validate_ab_test(&input(vec![variant("A", 50.0), variant("B", 50.0)]));
        assert!(errors.is_empty(), "{:?}", errors);
    }

    #[test]
    fn single_variant_flags_variants() {
        let errors = validate_ab_test(&input(vec![variant("A", 100.0)]));
        assert!(fields(&errors).contains(&"variants"));
    }

    #[test]
    fn ninety_percent_flags_traffic_split() {
        let errors = validate_ab_test(&input(vec![variant("A", 50.0), variant("B", 40.0)]));
        assert_eq!(fields(&errors), vec!["trafficSplit"]);
        assert_eq!(
            errors[0].message,
            "Traffic split must equal 100% (current: 90.0%)"
        );
    }

    #[test]
    fn eleven_variants_is_too_many() {
        let variants = (0..11).map(|i| variant(&format!("V{}", i), 100.0 / 11.0)).collect();
        let errors = validate_ab_test(&input(variants));
        assert!(errors.iter().any(|e| e.message == "Maximum 10 variants allowed"));
    }

    #[test]
    fn creative_requires_its_payload() {
        let mut v = variant("A", 50.0);
        v.creative = Creative::Image { url: " ".into() };
        let errors = validate_variant(&v, 3);
        assert_eq!(fields(&errors), vec!["variants[3].creative"]);

        v.creative = Creative::Video { url: "https://cdn.example.com/v.mp4".into() };
        assert!(validate_variant(&v, 3).is_empty());
    }

    #[test]
    fn blank_text_fields_are_reported() {
        let mut v = variant("", 50.0);
        v.headline = "  ".into();
        v.cta = String::new();
        let errors = validate_variant(&v, 0);
        assert_eq!(
            fields(&errors),
            vec!["variants[0].name", "variants[0].headline", "variants[0].cta"]
        );
    }

    #[test]
    fn duration_and_sample_bounds() {
        let mut i = input(vec![variant("A", 50.0), variant("B", 50.0)]);
        i.duration_days = Some(0);
        i.sample_size = Some(99);
        let errors = validate_ab_test(&i);
        assert_eq!(fields(&errors), vec!["duration", "sampleSize"]);

        i.duration_days = Some(91);
        i.sample_size = None;
        let errors = validate_ab_test(&i);
        assert_eq!(errors[0].message, "Test duration cannot exceed 90 days");
    }

    #[test]
    fn long_name_is_rejected() {
        let mut i = input(vec![variant("A", 50.0), variant("B", 50.0)]);
        i.name = "x".repeat(101);
        assert_eq!(fields(&validate_ab_test(&i)), vec!["name"]);
    }

    #[test]
    fn negative_percentage_is_reported_per_variant() {
        let errors = validate_traffic_split(&[120.0, -20.0]);
        assert_eq!(fields(&errors), vec!["variants[0].trafficPercentage", "variants[1].trafficPercentage"]);
    }
}
