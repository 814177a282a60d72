//! Significance testing and winner determination.
//!
//! Every function here is total: degenerate input (zero trials, zero
//! standard error, fewer than two variants) yields a neutral result
//! instead of NaN or a panic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{AbTest, MetricType, VariantMetrics, WinnerAnalysis};

/// |z| at or above this is significant (two-tailed, ~95%).
pub const SIGNIFICANCE_Z: f64 = 1.96;

/// Default confidence required before a winner is declared.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 95.0;

/// Default impressions each variant needs before significance is reported.
pub const DEFAULT_MIN_SAMPLE_SIZE: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Significance {
    pub significant: bool,
    pub confidence: f64,
    pub z_score: f64,
}

impl Significance {
    pub const NONE: Significance = Significance {
        significant: false,
        confidence: 0.0,
        z_score: 0.0,
    };
}

/// Two-proportion z-score with pooled standard error.
///
/// `None` when either sample is empty or the standard error is zero.
fn z_score(p1: f64, n1: f64, p2: f64, n2: f64) -> Option<f64> {
    if !(n1 > 0.0 && n2 > 0.0) {
        return None;
    }
    let pooled = (p1 * n1 + p2 * n2) / (n1 + n2);
    let se = (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();
    if !se.is_finite() || se <= 0.0 {
        return None;
    }
    let z = (p1 - p2) / se;
    z.is_finite().then_some(z)
}

/// Approximate confidence (percent) from a z-score via fixed breakpoints.
pub fn z_score_to_confidence(z: f64) -> f64 {
    let abs_z = z.abs();
    if abs_z >= 2.58 {
        99.0
    } else if abs_z >= 1.96 {
        95.0
    } else if abs_z >= 1.65 {
        90.0
    } else if abs_z >= 1.28 {
        80.0
    } else {
        (50.0 + abs_z * 15.0).min(75.0)
    }
}

/// (successes rate, trials) for a proportion metric.
fn proportion(m: &VariantMetrics, metric: MetricType) -> Option<(f64, f64)> {
    let ratio = |num: u64, den: u64| {
        if den == 0 {
            0.0
        } else {
            num as f64 / den as f64
        }
    };
    match metric {
        MetricType::Ctr => Some((ratio(m.clicks, m.impressions), m.impressions as f64)),
        MetricType::Conversions => Some((ratio(m.conversions, m.clicks), m.clicks as f64)),
        MetricType::Engagement => Some((
            m.engagement.unwrap_or(0.0) / 100.0,
            m.impressions as f64,
        )),
        MetricType::Cpa | MetricType::Ltv => None,
    }
}

/// Compare two variants on a proportion metric.
///
/// `cpa` and `ltv` are not proportions and always report no significance.
pub fn calculate_significance(
    a: &VariantMetrics,
    b: &VariantMetrics,
    metric: MetricType,
) -> Significance {
    let (Some((p1, n1)), Some((p2, n2))) = (proportion(a, metric), proportion(b, metric)) else {
        return Significance::NONE;
    };
    let Some(z) = z_score(p1, n1, p2, n2) else {
        return Significance::NONE;
    };
    Significance {
        significant: z.abs() >= SIGNIFICANCE_Z,
        confidence: z_score_to_confidence(z),
        z_score: z,
    }
}

/// Comparable value of a metric; higher is always better.
pub fn metric_value(m: &VariantMetrics, metric: MetricType) -> f64 {
    match metric {
        MetricType::Ctr => m.ctr,
        MetricType::Conversions => m.conversion_rate,
        MetricType::Cpa => -m.cpa.unwrap_or(0.0),
        MetricType::Ltv => m.ltv.unwrap_or(0.0),
        MetricType::Engagement => m.engagement.unwrap_or(0.0),
    }
}

/// Pick a winner over the control (first entry).
///
/// Returns `None` when there are fewer than two variants, when the control
/// is leading, or when the leader is not significant at `min_confidence`.
/// Ties go to the earliest variant.
pub fn determine_winner(
    metrics: &[VariantMetrics],
    target: MetricType,
    min_confidence: f64,
) -> Option<WinnerAnalysis> {
    if metrics.len() < 2 {
        return None;
    }

    let control = &metrics[0];
    let mut best = control;
    let mut best_value = metric_value(control, target);
    for candidate in &metrics[1..] {
        let value = metric_value(candidate, target);
        if value > best_value {
            best = candidate;
            best_value = value;
        }
    }

    if std::ptr::eq(best, control) {
        return None;
    }

    let significance = calculate_significance(best, control, target);
    if !significance.significant || significance.confidence < min_confidence {
        return None;
    }

    let control_value = metric_value(control, target);
    let improvement = if control_value == 0.0 {
        0.0
    } else {
        (best_value - control_value) / control_value.abs() * 100.0
    };

    Some(WinnerAnalysis {
        winner_id: best.variant_id.clone(),
        confidence: significance.confidence,
        improvement,
        significant: true,
        reason: format!(
            "{:.1}% improvement in {} with {}% confidence",
            improvement, target, significance.confidence
        ),
    })
}

/// Every variant has `min_sample_size` impressions and a winner is significant.
pub fn has_reached_significance(
    metrics: &[VariantMetrics],
    target: MetricType,
    min_sample_size: u64,
) -> bool {
    if metrics.len() < 2 {
        return false;
    }
    if metrics.iter().any(|m| m.impressions < min_sample_size) {
        return false;
    }
    determine_winner(metrics, target, DEFAULT_MIN_CONFIDENCE).is_some_and(|w| w.significant)
}

fn z_alpha(confidence: u32) -> f64 {
    match confidence {
        95 => 1.96,
        90 => 1.65,
        _ => 2.58,
    }
}

fn z_beta(power: u32) -> f64 {
    match power {
        80 => 0.84,
        90 => 1.28,
        _ => 0.52,
    }
}

/// Per-variant sample size to detect a relative lift of `mde_percent`.
///
/// Unknown confidence levels use the 99% quantile and unknown power levels
/// use 0.52. Returns 0 when the effect is zero or the inputs are not finite.
pub fn calculate_required_sample_size(
    baseline_rate: f64,
    mde_percent: f64,
    confidence: u32,
    power: u32,
) -> u64 {
    let p1 = baseline_rate;
    let p2 = baseline_rate * (1.0 + mde_percent / 100.0);
    let numerator = (z_alpha(confidence) + z_beta(power)).powi(2) * (p1 * (1.0 - p1) + p2 * (1.0 - p2));
    let denominator = (p2 - p1).powi(2);
    let size = numerator / denominator;
    if !size.is_finite() || size <= 0.0 {
        return 0;
    }
    size.ceil() as u64
}

/// Progress in percent, capped at 100.
///
/// With an end date the larger of sample progress and elapsed-time
/// progress wins; without one only the sample counts.
pub fn calculate_test_progress(
    current_sample: u64,
    target_sample: u64,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> f64 {
    let sample_progress = if target_sample == 0 {
        0.0
    } else {
        current_sample as f64 / target_sample as f64 * 100.0
    };

    let progress = match end {
        Some(end) => {
            let total = (end - start).num_milliseconds();
            let time_progress = if total <= 0 {
                100.0
            } else {
                (now - start).num_milliseconds() as f64 / total as f64 * 100.0
            };
            sample_progress.max(time_progress)
        }
        None => sample_progress,
    };

    progress.clamp(0.0, 100.0)
}

/// Render a metric value for display.
pub fn format_metric_value(value: f64, metric: MetricType) -> String {
    match metric {
        MetricType::Ctr | MetricType::Conversions => format!("{:.2}%", value),
        MetricType::Cpa => format!("${:.2}", value),
        MetricType::Ltv => format!("${:.0}", value),
        MetricType::Engagement => format!("{:.1}%", value),
    }
}

impl AbTest {
    /// Winner analysis on this test's own metrics and target metric.
    pub fn analyze(&self, min_confidence: f64) -> Option<WinnerAnalysis> {
        let metrics = self.metrics.as_deref()?;
        determine_winner(metrics, self.target_metric, min_confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn scenario() -> Vec<VariantMetrics> {
        vec![
            VariantMetrics::from_counts("control", 10_000, 250, 25),
            VariantMetrics::from_counts("variant-b", 10_000, 300, 35),
        ]
    }

    #[test]
    fn scenario_ctr_is_significant_at_95() {
        let m = scenario();
        let sig = calculate_significance(&m[1], &m[0], MetricType::Ctr);
        assert!(sig.z_score > 2.1 && sig.z_score < 2.2, "z = {}", sig.z_score);
        assert!(sig.significant);
        assert_eq!(sig.confidence, 95.0);
    }

    #[test]
    fn scenario_winner_is_challenger() {
        let winner = determine_winner(&scenario(), MetricType::Ctr, 95.0).unwrap();
        assert_eq!(winner.winner_id, "variant-b");
        assert!(winner.significant);
        assert!((winner.improvement - 20.0).abs() < 1e-9);
        assert_eq!(winner.reason, "20.0% improvement in ctr with 95% confidence");
    }

    #[test]
    fn stricter_threshold_rejects_scenario() {
        assert!(determine_winner(&scenario(), MetricType::Ctr, 99.0).is_none());
    }

    #[test]
    fn control_leading_yields_no_winner() {
        let m = vec![
            VariantMetrics::from_counts("control", 10_000, 400, 40),
            VariantMetrics::from_counts("b", 10_000, 300, 30),
            VariantMetrics::from_counts("c", 10_000, 100, 10),
        ];
        assert!(determine_winner(&m, MetricType::Ctr, 0.0).is_none());
    }

    #[test]
    fn tie_with_control_keeps_control() {
        let m = vec![
            VariantMetrics::from_counts("control", 10_000, 300, 30),
            VariantMetrics::from_counts("b", 10_000, 300, 30),
        ];
        assert!(determine_winner(&m, MetricType::Ctr, 0.0).is_none());
    }

    #[test]
    fn first_of_tied_challengers_wins() {
        let m = vec![
            VariantMetrics::from_counts("control", 10_000, 100, 10),
            VariantMetrics::from_counts("b", 10_000, 300, 30),
            VariantMetrics::from_counts("c", 10_000, 300, 30),
        ];
        let winner = determine_winner(&m, MetricType::Ctr, 95.0).unwrap();
        assert_eq!(winner.winner_id, "b");
    }

    #[test]
    fn single_variant_has_no_winner() {
        let m = vec![VariantMetrics::from_counts("control", 10_000, 300, 30)];
        assert!(determine_winner(&m, MetricType::Ctr, 0.0).is_none());
        assert!(determine_winner(&[], MetricType::Ctr, 0.0).is_none());
    }

    #[test]
    fn zero_standard_error_is_not_significant() {
        let zeros = VariantMetrics::from_counts("a", 1000, 0, 0);
        let also_zeros = VariantMetrics::from_counts("b", 1000, 0, 0);
        assert_eq!(
            calculate_significance(&zeros, &also_zeros, MetricType::Ctr),
            Significance::NONE
        );

        let all = VariantMetrics::from_counts("a", 1000, 1000, 0);
        let also_all = VariantMetrics::from_counts("b", 1000, 1000, 0);
        assert_eq!(
            calculate_significance(&all, &also_all, MetricType::Ctr),
            Significance::NONE
        );
    }

    #[test]
    fn zero_trials_is_not_significant() {
        let empty = VariantMetrics::from_counts("a", 0, 0, 0);
        let full = VariantMetrics::from_counts("b", 1000, 100, 10);
        let sig = calculate_significance(&empty, &full, MetricType::Ctr);
        assert_eq!(sig, Significance::NONE);
        let sig = calculate_significance(&empty, &full, MetricType::Conversions);
        assert_eq!(sig, Significance::NONE);
    }

    #[test]
    fn non_proportion_metrics_are_never_significant() {
        let m = scenario();
        assert_eq!(calculate_significance(&m[0], &m[1], MetricType::Cpa), Significance::NONE);
        assert_eq!(calculate_significance(&m[0], &m[1], MetricType::Ltv), Significance::NONE);
    }

    #[test]
    fn significance_threshold_matches_z() {
        for (c1, c2, n) in [(250u64, 300u64, 10_000u64), (100, 120, 5_000), (40, 80, 2_000), (500, 505, 10_000)] {
            let a = VariantMetrics::from_counts("a", n, c1, 0);
            let b = VariantMetrics::from_counts("b", n, c2, 0);
            let sig = calculate_significance(&b, &a, MetricType::Ctr);
            assert_eq!(sig.significant, sig.z_score.abs() >= SIGNIFICANCE_Z);
        }
    }

    #[test]
    fn confidence_breakpoints() {
        assert_eq!(z_score_to_confidence(3.0), 99.0);
        assert_eq!(z_score_to_confidence(-2.0), 95.0);
        assert_eq!(z_score_to_confidence(1.7), 90.0);
        assert_eq!(z_score_to_confidence(1.3), 80.0);
        assert_eq!(z_score_to_confidence(0.0), 50.0);
        assert_eq!(z_score_to_confidence(1.0), 65.0);
    }

    #[test]
    fn cpa_prefers_lower_cost() {
        let mut control = VariantMetrics::from_counts("control", 1000, 100, 10);
        control.cpa = Some(20.0);
        let mut cheap = VariantMetrics::from_counts("cheap", 1000, 100, 10);
        cheap.cpa = Some(10.0);
        assert!(metric_value(&cheap, MetricType::Cpa) > metric_value(&control, MetricType::Cpa));
    }

    #[test]
    fn reached_significance_requires_samples() {
        assert!(has_reached_significance(&scenario(), MetricType::Ctr, 1000));
        assert!(!has_reached_significance(&scenario(), MetricType::Ctr, 20_000));
    }

    #[test]
    fn sample_size_for_common_inputs() {
        // 5% baseline, 20% relative lift, 95% / 80%
        let n = calculate_required_sample_size(0.05, 20.0, 95, 80);
        assert_eq!(n, 8146);
        assert!(calculate_required_sample_size(0.05, 20.0, 99, 90) > n);
        assert_eq!(calculate_required_sample_size(0.05, 0.0, 95, 80), 0);
        assert_eq!(calculate_required_sample_size(0.0, 20.0, 95, 80), 0);
    }

    #[test]
    fn progress_uses_larger_of_sample_and_time() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let end = start + Duration::days(10);
        let now = start + Duration::days(5);

        assert_eq!(calculate_test_progress(100, 1000, start, Some(end), now), 50.0);
        assert_eq!(calculate_test_progress(800, 1000, start, Some(end), now), 80.0);
        assert_eq!(calculate_test_progress(250, 1000, start, None, now), 25.0);
        assert_eq!(calculate_test_progress(5000, 1000, start, None, now), 100.0);
        assert_eq!(
            calculate_test_progress(0, 1000, start, Some(end), end + Duration::days(3)),
            100.0
        );
        assert_eq!(calculate_test_progress(10, 0, start, None, now), 0.0);
    }

    #[test]
    fn formats_metric_values() {
        assert_eq!(format_metric_value(2.5, MetricType::Ctr), "2.50%");
        assert_eq!(format_metric_value(12.0, MetricType::Cpa), "$12.00");
        assert_eq!(format_metric_value(120.4, MetricType::Ltv), "$120");
        assert_eq!(format_metric_value(45.0, MetricType::Engagement), "45.0%");
    }
}
