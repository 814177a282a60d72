//! Per-step and cross-step checks for the campaign wizard.

use super::types::{
    Audience, BasicInfo, CampaignData, Creatives, Planning, PublishMode, StepStatus, Tracking,
    ValidationStep, WizardStep,
};
use crate::abtest::splitter::SPLIT_TOLERANCE;
use crate::drafts::validation::is_absolute_url;
use crate::error::ValidationError;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_HEADLINE_LEN: usize = 100;
pub const MAX_CAPTION_LEN: usize = 500;

pub fn validate_basic_info(info: &BasicInfo) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let name_len = info.name.trim().chars().count();
    if name_len == 0 {
        errors.push(ValidationError::new("name", "Campaign name is required"));
    } else if info.name.chars().count() > MAX_NAME_LEN {
        errors.push(ValidationError::new("name", "Campaign name is too long"));
    }
    if info
        .description
        .as_ref()
        .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LEN)
    {
        errors.push(ValidationError::new("description", "Description is too long"));
    }
    if info.channels.is_empty() {
        errors.push(ValidationError::new(
            "channels",
            "At least one channel must be selected",
        ));
    }
    errors
}

pub fn validate_creatives(creatives: &Creatives) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let len = creatives.headline.trim().chars().count();
    if len == 0 {
        errors.push(ValidationError::new("headline", "Headline is required"));
    } else if creatives.headline.chars().count() > MAX_HEADLINE_LEN {
        errors.push(ValidationError::new("headline", "Headline is too long"));
    }
    if creatives
        .caption
        .as_ref()
        .is_some_and(|c| c.chars().count() > MAX_CAPTION_LEN)
    {
        errors.push(ValidationError::new("caption", "Caption is too long"));
    }
    if creatives.media_files.is_empty() {
        errors.push(ValidationError::new(
            "mediaFiles",
            "At least one media file is required",
        ));
    }
    for (i, file) in creatives.media_files.iter().enumerate() {
        if !is_absolute_url(&file.url) {
            errors.push(ValidationError::new(
                format!("mediaFiles.{}.url", i),
                "Invalid url",
            ));
        }
        if file.size == 0 {
            errors.push(ValidationError::new(
                format!("mediaFiles.{}.size", i),
                "Size must be positive",
            ));
        }
    }
    errors
}

pub fn validate_audience(audience: &Audience) -> Vec<ValidationError> {
    if audience.selected_segments.is_empty() {
        vec![ValidationError::new(
            "selectedSegments",
            "At least one segment must be selected",
        )]
    } else {
        Vec::new()
    }
}

pub fn validate_planning(planning: &Planning) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if planning.start_date >= planning.end_date {
        errors.push(ValidationError::new(
            "endDate",
            "Start date must be before end date",
        ));
    }
    if !(planning.budget.is_finite() && planning.budget > 0.0) {
        errors.push(ValidationError::new("budget", "Budget must be positive"));
    }
    errors
}

pub fn validate_tracking(tracking: &Tracking) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let utm = &tracking.utm;
    for (field, value, message) in [
        ("utmParameters.source", &utm.source, "UTM source is required"),
        ("utmParameters.medium", &utm.medium, "UTM medium is required"),
        ("utmParameters.campaign", &utm.campaign, "UTM campaign is required"),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, message));
        }
    }

    if !tracking.ab_test_enabled {
        return errors;
    }
    for (i, variant) in tracking.ab_test_variants.iter().enumerate() {
        if variant.name.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("abTestVariants.{}.name", i),
                "Variant name is required",
            ));
        }
        if !(0.0..=100.0).contains(&variant.percentage) {
            errors.push(ValidationError::new(
                format!("abTestVariants.{}.percentage", i),
                "Percentage must be between 0 and 100",
            ));
        }
        if variant.elements.is_empty() {
            errors.push(ValidationError::new(
                format!("abTestVariants.{}.elements", i),
                "At least one element must be tested",
            ));
        }
        if variant.elements.iter().any(|e| e.value.trim().is_empty()) {
            errors.push(ValidationError::new(
                format!("abTestVariants.{}.elements", i),
                "Element value is required",
            ));
        }
    }
    if !tracking.ab_test_variants.is_empty() {
        let total: f64 = tracking.ab_test_variants.iter().map(|v| v.percentage).sum();
        if (total - 100.0).abs() > SPLIT_TOLERANCE {
            errors.push(ValidationError::new(
                "abTestVariants",
                "Variant percentages must total 100%",
            ));
        }
    }
    errors
}

pub fn validate_validation_step(step: &ValidationStep) -> Vec<ValidationError> {
    if step.publish_mode == PublishMode::Schedule && step.scheduled_at.is_none() {
        vec![ValidationError::new(
            "scheduledAt",
            "A date is required for a scheduled publication",
        )]
    } else {
        Vec::new()
    }
}

fn camel(step: WizardStep) -> &'static str {
    match step {
        WizardStep::Template => "template",
        WizardStep::BasicInfo => "basicInfo",
        WizardStep::Creatives => "creatives",
        WizardStep::Audience => "audience",
        WizardStep::Planning => "planning",
        WizardStep::Tracking => "tracking",
        WizardStep::Validation => "validation",
    }
}

/// Errors of one step. Missing data fails every step except the template,
/// which is optional.
pub fn validate_step(step: WizardStep, data: &CampaignData) -> Vec<ValidationError> {
    fn check<T>(value: Option<&T>, f: fn(&T) -> Vec<ValidationError>) -> Option<Vec<ValidationError>> {
        value.map(f)
    }

    let result = match step {
        WizardStep::Template => return Vec::new(),
        WizardStep::BasicInfo => check(data.basic_info.as_ref(), validate_basic_info),
        WizardStep::Creatives => check(data.creatives.as_ref(), validate_creatives),
        WizardStep::Audience => check(data.audience.as_ref(), validate_audience),
        WizardStep::Planning => check(data.planning.as_ref(), validate_planning),
        WizardStep::Tracking => check(data.tracking.as_ref(), validate_tracking),
        WizardStep::Validation => check(data.validation.as_ref(), validate_validation_step),
    };
    result.unwrap_or_else(|| vec![ValidationError::new(camel(step), "Step is incomplete")])
}

/// Every step plus the checks spanning several steps. Fields are prefixed
/// with the step, e.g. `basicInfo.name`.
pub fn validate_wizard(data: &CampaignData) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for step in WizardStep::ALL {
        for err in validate_step(step, data) {
            let field = if err.field == camel(step) {
                err.field
            } else {
                format!("{}.{}", camel(step), err.field)
            };
            errors.push(ValidationError::new(field, err.message));
        }
    }

    if let (Some(planned), Some(available)) = (
        data.planning.as_ref().and_then(|p| p.estimated_reach),
        data.audience.as_ref().and_then(|a| a.estimated_reach),
    ) {
        if planned > available {
            errors.push(ValidationError::new(
                "planning.estimatedReach",
                "Planned reach exceeds the audience size",
            ));
        }
    }
    if let Some(tracking) = &data.tracking {
        if tracking.ab_test_enabled && tracking.ab_test_variants.len() < 2 {
            errors.push(ValidationError::new(
                "tracking.abTestVariants",
                "An A/B test needs at least 2 variants",
            ));
        }
    }
    errors
}

/// Completion overview of every step.
pub fn step_statuses(data: &CampaignData) -> Vec<StepStatus> {
    WizardStep::ALL
        .iter()
        .map(|&step| {
            let missing = missing_items(step, data);
            StepStatus {
                step,
                valid: missing.is_empty(),
                missing,
            }
        })
        .collect()
}

fn missing_items(step: WizardStep, data: &CampaignData) -> Vec<&'static str> {
    let mut missing = Vec::new();
    match step {
        WizardStep::Template => {
            if data.template.is_none() {
                missing.push("template");
            }
        }
        WizardStep::BasicInfo => {
            if data.basic_info.as_ref().map_or(true, |b| b.name.trim().is_empty()) {
                missing.push("campaign name");
            }
        }
        WizardStep::Creatives => {
            if data.creatives.as_ref().map_or(true, |c| c.media_files.is_empty()) {
                missing.push("media files");
            }
        }
        WizardStep::Audience => {
            if data
                .audience
                .as_ref()
                .map_or(true, |a| a.selected_segments.is_empty())
            {
                missing.push("segments");
            }
        }
        WizardStep::Planning => {
            if data.planning.as_ref().map_or(true, |p| p.budget <= 0.0) {
                missing.push("budget");
            }
        }
        WizardStep::Tracking => {
            if data
                .tracking
                .as_ref()
                .map_or(true, |t| t.utm.source.trim().is_empty())
            {
                missing.push("utm source");
            }
        }
        WizardStep::Validation => match &data.validation {
            None => missing.push("publish settings"),
            Some(v) => {
                if !v.checklist.is_complete() {
                    missing.push("checklist");
                }
                if !validate_validation_step(v).is_empty() {
                    missing.push("schedule date");
                }
            }
        },
    }
    missing
}

/// Steps that gate publishing: basic info through tracking.
pub fn can_publish(data: &CampaignData) -> bool {
    step_statuses(data)
        .iter()
        .filter(|s| !matches!(s.step, WizardStep::Template | WizardStep::Validation))
        .all(|s| s.valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::types::{
        CampaignChannel, CampaignType, Currency, MediaFile, MediaType, Objective,
        TestedElement, TestedElementKind, UtmParameters, WizardVariant,
    };
    use chrono::NaiveDate;

    fn basic_info() -> BasicInfo {
        BasicInfo {
            name: "Spring Sale".into(),
            description: None,
            objective: Objective::Sales,
            campaign_type: CampaignType::Promotion,
            channels: vec![CampaignChannel::Email],
        }
    }

    fn planning(start: u32, end: u32, budget: f64) -> Planning {
        Planning {
            start_date: NaiveDate::from_ymd_opt(2024, 3, start).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, end).unwrap(),
            timezone: "Europe/Paris".into(),
            budget,
            currency: Currency::Eur,
            is_daily_budget: false,
            estimated_reach: None,
        }
    }

    fn variant(pct: f64) -> WizardVariant {
        WizardVariant {
            id: format!("v-{}", pct),
            name: "Variant".into(),
            percentage: pct,
            is_control: false,
            description: None,
            elements: vec![TestedElement {
                kind: TestedElementKind::Headline,
                value: "Save 20%".into(),
                description: None,
            }],
            expected_outcome: None,
        }
    }

    fn tracking(enabled: bool, split: &[f64]) -> Tracking {
        Tracking {
            utm: UtmParameters {
                source: "newsletter".into(),
                medium: "email".into(),
                campaign: "spring".into(),
                term: None,
                content: None,
            },
            generated_url: None,
            ab_test_enabled: enabled,
            ab_test_variants: split.iter().map(|&p| variant(p)).collect(),
        }
    }

    #[test]
    fn basic_info_rules() {
        assert!(validate_basic_info(&basic_info()).is_empty());

        let mut info = basic_info();
        info.name = "  ".into();
        info.channels.clear();
        let fields: Vec<_> = validate_basic_info(&info).into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["name", "channels"]);

        info.name = "x".repeat(101);
        assert_eq!(validate_basic_info(&info)[0].message, "Campaign name is too long");
    }

    #[test]
    fn creatives_need_media_with_valid_url() {
        let mut creatives = Creatives {
            headline: "Spring is here".into(),
            caption: None,
            media_files: Vec::new(),
            call_to_action: None,
            ai_prompt: None,
        };
        assert_eq!(validate_creatives(&creatives)[0].field, "mediaFiles");

        creatives.media_files.push(MediaFile {
            id: "m1".into(),
            kind: MediaType::Image,
            url: "not-a-url".into(),
            name: "hero.png".into(),
            size: 0,
            preview: None,
        });
        let fields: Vec<_> = validate_creatives(&creatives).into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["mediaFiles.0.url", "mediaFiles.0.size"]);
    }

    #[test]
    fn planning_dates_and_budget() {
        assert!(validate_planning(&planning(1, 31, 500.0)).is_empty());
        let fields: Vec<_> = validate_planning(&planning(10, 10, 0.0))
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["endDate", "budget"]);
    }

    #[test]
    fn tracking_split_only_checked_when_enabled() {
        assert!(validate_tracking(&tracking(false, &[30.0, 30.0])).is_empty());
        assert!(validate_tracking(&tracking(true, &[50.0, 50.0])).is_empty());
        assert!(validate_tracking(&tracking(true, &[33.33, 33.33, 33.34])).is_empty());

        let errors = validate_tracking(&tracking(true, &[60.0, 30.0]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "abTestVariants");
    }

    #[test]
    fn utm_fields_are_required() {
        let mut t = tracking(false, &[]);
        t.utm.medium.clear();
        assert_eq!(validate_tracking(&t)[0].field, "utmParameters.medium");
    }

    #[test]
    fn schedule_mode_needs_a_date() {
        let step = ValidationStep {
            publish_mode: PublishMode::Schedule,
            ..ValidationStep::default()
        };
        assert_eq!(validate_validation_step(&step)[0].field, "scheduledAt");
        assert!(validate_validation_step(&ValidationStep::default()).is_empty());
    }

    #[test]
    fn empty_wizard_reports_each_required_step() {
        let errors = validate_wizard(&CampaignData::default());
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["basicInfo", "creatives", "audience", "planning", "tracking", "validation"]
        );
    }

    #[test]
    fn cross_step_checks() {
        let data = CampaignData {
            planning: Some(Planning {
                estimated_reach: Some(50_000),
                ..planning(1, 31, 500.0)
            }),
            audience: Some(Audience {
                selected_segments: vec!["families".into()],
                custom_filters: Vec::new(),
                csv_import: None,
                estimated_reach: Some(18_000),
            }),
            tracking: Some(tracking(true, &[100.0])),
            ..CampaignData::default()
        };
        let fields: Vec<_> = validate_wizard(&data).into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"planning.estimatedReach".to_string()));
        assert!(fields.contains(&"tracking.abTestVariants".to_string()));
    }

    #[test]
    fn statuses_follow_step_order() {
        let data = CampaignData {
            basic_info: Some(basic_info()),
            planning: Some(planning(1, 31, 500.0)),
            ..CampaignData::default()
        };
        let statuses = step_statuses(&data);
        let steps: Vec<_> = statuses.iter().map(|s| s.step).collect();
        assert_eq!(steps, WizardStep::ALL.to_vec());
        assert!(statuses[1].valid);
        assert_eq!(statuses[2].missing, vec!["media files"]);
        assert!(statuses[4].valid);
        assert!(!can_publish(&data));
    }
}
