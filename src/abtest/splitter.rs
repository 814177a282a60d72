//! Traffic splitter: keeps variant percentages summing to 100 while one
//! of them is edited.
//!
//! Editing variant `i` moves the difference onto the other variants in
//! proportion to their current share. Floating-point drift is tolerated
//! within [`SPLIT_TOLERANCE`] and never silently renormalised.

use super::types::Variant;

/// Allowed distance between the total and 100.
pub const SPLIT_TOLERANCE: f64 = 0.01;

pub fn total(percentages: &[f64]) -> f64 {
    percentages.iter().sum()
}

/// `true` when the percentages sum to 100 within tolerance.
pub fn is_valid_split(percentages: &[f64]) -> bool {
    (total(percentages) - 100.0).abs() < SPLIT_TOLERANCE
}

/// Set `percentages[index]` to `value` and rebalance the others.
///
/// `value` is clamped to [0, 100]. When the other variants currently hold
/// no traffic at all, the difference is spread evenly across them.
/// Out-of-range indices leave the slice untouched.
pub fn set_percentage(percentages: &mut [f64], index: usize, value: f64) {
    if index >= percentages.len() || value.is_nan() {
        return;
    }
    let value = value.clamp(0.0, 100.0);
    let delta = value - percentages[index];
    percentages[index] = value;

    let others = percentages.len() - 1;
    if others == 0 || delta == 0.0 {
        return;
    }

    let other_total: f64 = percentages
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, p)| *p)
        .sum();

    for (i, p) in percentages.iter_mut().enumerate() {
        if i == index {
            continue;
        }
        let adjustment = if other_total > 0.0 {
            -delta * (*p / other_total)
        } else {
            -delta / others as f64
        };
        *p = (*p + adjustment).clamp(0.0, 100.0);
    }
}

/// `n` equal shares of 100.
pub fn equal_split(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![100.0 / n as f64; n]
}

/// Apply [`set_percentage`] to a variant list.
pub fn set_variant_percentage(variants: &mut [Variant], index: usize, value: f64) {
    let mut percentages: Vec<f64> = variants.iter().map(|v| v.traffic_percentage).collect();
    set_percentage(&mut percentages, index, value);
    for (variant, p) in variants.iter_mut().zip(percentages) {
        variant.traffic_percentage = p;
    }
}

/// Reset every variant to an equal share.
pub fn apply_equal_split(variants: &mut [Variant]) {
    let shares = equal_split(variants.len());
    for (variant, share) in variants.iter_mut().zip(shares) {
        variant.traffic_percentage = share;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rounded_total(p: &[f64]) -> f64 {
        (total(p) * 100.0).round() / 100.0
    }

    #[test]
    fn edit_rebalances_proportionally() {
        let mut p = vec![50.0, 30.0, 20.0];
        set_percentage(&mut p, 0, 70.0);
        assert!((p[0] - 70.0).abs() < 1e-9);
        assert!((p[1] - 18.0).abs() < 1e-9);
        assert!((p[2] - 12.0).abs() < 1e-9);
        assert!(is_valid_split(&p));
    }

    #[test]
    fn edit_sequence_keeps_total_at_100() {
        let mut p = equal_split(3);
        let edits = [
            (0, 80.0),
            (1, 5.5),
            (2, 100.0),
            (0, 0.0),
            (1, 33.3),
            (2, 12.75),
            (0, 99.99),
            (1, 0.01),
        ];
        for (index, value) in edits {
            set_percentage(&mut p, index, value);
            assert!(
                (rounded_total(&p) - 100.0).abs() <= SPLIT_TOLERANCE,
                "total {} after setting {} to {}",
                total(&p),
                index,
                value
            );
            assert!(p.iter().all(|v| (0.0..=100.0).contains(v)));
        }
    }

    #[test]
    fn lowering_a_full_variant_feeds_empty_ones() {
        let mut p = vec![100.0, 0.0, 0.0];
        set_percentage(&mut p, 0, 40.0);
        assert_eq!(p, vec![40.0, 30.0, 30.0]);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut p = vec![50.0, 50.0];
        set_percentage(&mut p, 1, 150.0);
        assert_eq!(p, vec![0.0, 100.0]);
        set_percentage(&mut p, 5, 10.0);
        assert_eq!(p, vec![0.0, 100.0]);
    }

    #[test]
    fn equal_split_sums_to_100() {
        for n in 1..=10 {
            let p = equal_split(n);
            assert_eq!(p.len(), n);
            assert!(p.iter().all(|v| *v == 100.0 / n as f64));
            assert!((total(&p) - 100.0).abs() < 1e-9);
        }
        assert!(equal_split(0).is_empty());
    }

    #[test]
    fn validity_tolerance() {
        assert!(is_valid_split(&[33.333, 33.333, 33.334]));
        assert!(!is_valid_split(&[50.0, 40.0]));
    }
}
