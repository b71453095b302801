//! Effect-size measures: Cohen's d and Cliff's delta

use crate::stats::descriptive::{mean, sorted_copy, variance};
use serde::{Deserialize, Serialize};

/// Both samples must exceed this size before Cliff's delta switches to the
/// sorted O(n log n) algorithm
pub const CLIFFS_DELTA_SORTED_THRESHOLD: usize = 500;

/// Conventional magnitude bands for |d|
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectMagnitude {
    Negligible,
    Small,
    Medium,
    Large,
}

impl std::fmt::Display for EffectMagnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EffectMagnitude::Negligible => "negligible",
            EffectMagnitude::Small => "small",
            EffectMagnitude::Medium => "medium",
            EffectMagnitude::Large => "large",
        };
        f.write_str(label)
    }
}

/// Effect size of one comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSize {
    pub cohens_d: f64,
    pub magnitude: EffectMagnitude,
    /// Dominance statistic in [-1, 1]
    pub cliffs_delta: f64,
}

impl EffectSize {
    /// Compute both measures for `sample1` relative to `sample2`
    pub fn between(sample1: &[f64], sample2: &[f64]) -> Self {
        let d = cohens_d(sample1, sample2);
        Self {
            cohens_d: d,
            magnitude: interpret_effect_size(d),
            cliffs_delta: cliffs_delta(sample1, sample2),
        }
    }
}

/// Standardized mean difference `(mean1 - mean2) / pooled_sd`
///
/// Returns 0 when the pooled standard deviation is zero or undefined.
pub fn cohens_d(sample1: &[f64], sample2: &[f64]) -> f64 {
    let (n1, n2) = (sample1.len() as f64, sample2.len() as f64);
    let df = n1 + n2 - 2.0;
    if df <= 0.0 {
        return 0.0;
    }

    let pooled_sd =
        (((n1 - 1.0) * variance(sample1, 1) + (n2 - 1.0) * variance(sample2, 1)) / df).sqrt();
    if pooled_sd == 0.0 || !pooled_sd.is_finite() {
        return 0.0;
    }
    (mean(sample1) - mean(sample2)) / pooled_sd
}

/// Magnitude band for a Cohen's d value
pub fn interpret_effect_size(d: f64) -> EffectMagnitude {
    let d = d.abs();
    if d < 0.2 {
        EffectMagnitude::Negligible
    } else if d < 0.5 {
        EffectMagnitude::Small
    } else if d < 0.8 {
        EffectMagnitude::Medium
    } else {
        EffectMagnitude::Large
    }
}

/// Cliff's delta: `P(X > Y) - P(X < Y)` over all pairs
///
/// Dispatches to [`cliffs_delta_sorted`] when both samples are larger than
/// [`CLIFFS_DELTA_SORTED_THRESHOLD`], otherwise to [`cliffs_delta_pairwise`].
pub fn cliffs_delta(sample1: &[f64], sample2: &[f64]) -> f64 {
    if sample1.len() > CLIFFS_DELTA_SORTED_THRESHOLD
        && sample2.len() > CLIFFS_DELTA_SORTED_THRESHOLD
    {
        cliffs_delta_sorted(sample1, sample2)
    } else {
        cliffs_delta_pairwise(sample1, sample2)
    }
}

/// O(n·m) Cliff's delta over the full cross product
pub fn cliffs_delta_pairwise(sample1: &[f64], sample2: &[f64]) -> f64 {
    if sample1.is_empty() || sample2.is_empty() {
        return 0.0;
    }

    let mut dominance: i64 = 0;
    for &x in sample1 {
        for &y in sample2 {
            if x > y {
                dominance += 1;
            } else if x < y {
                dominance -= 1;
            }
        }
    }
    dominance as f64 / (sample1.len() as f64 * sample2.len() as f64)
}

/// O((n + m) log m) Cliff's delta
///
/// Sorts `sample2` once and, for every `x` in `sample1`, counts the smaller
/// and larger elements with two binary partitions.
pub fn cliffs_delta_sorted(sample1: &[f64], sample2: &[f64]) -> f64 {
    if sample1.is_empty() || sample2.is_empty() {
        return 0.0;
    }

    let sorted = sorted_copy(sample2);
    let m = sorted.len();
    let mut dominance: i64 = 0;
    for &x in sample1 {
        let below = sorted.partition_point(|&y| y < x);
        let not_above = sorted.partition_point(|&y| y <= x);
        dominance += below as i64 - (m - not_above) as i64;
    }
    dominance as f64 / (sample1.len() as f64 * m as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::rng::RandomState;
    use crate::stats::test_support::normal_sample;

    #[test]
    fn test_cohens_d_known_value() {
        // means 2 and 4, both variances 1 -> d = -2
        let d = cohens_d(&[1.0, 2.0, 3.0], &[3.0, 4.0, 5.0]);
        assert!((d + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_cohens_d_zero_spread() {
        assert_eq!(cohens_d(&[1.0, 1.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cohens_d(&[1.0], &[2.0]), 0.0);
        assert_eq!(cohens_d(&[], &[]), 0.0);
    }

    #[test]
    fn test_interpret_thresholds() {
        assert_eq!(interpret_effect_size(0.0), EffectMagnitude::Negligible);
        assert_eq!(interpret_effect_size(0.19), EffectMagnitude::Negligible);
        assert_eq!(interpret_effect_size(0.2), EffectMagnitude::Small);
        assert_eq!(interpret_effect_size(-0.5), EffectMagnitude::Medium);
        assert_eq!(interpret_effect_size(0.79), EffectMagnitude::Medium);
        assert_eq!(interpret_effect_size(0.8), EffectMagnitude::Large);
        assert_eq!(interpret_effect_size(-3.0), EffectMagnitude::Large);
    }

    #[test]
    fn test_cliffs_delta_complete_separation() {
        let low = [0.8, 0.82, 0.79, 0.81, 0.80];
        let high = [0.95, 0.94, 0.96, 0.93, 0.97];
        assert_eq!(cliffs_delta(&high, &low), 1.0);
        assert_eq!(cliffs_delta(&low, &high), -1.0);
    }

    #[test]
    fn test_cliffs_delta_ties_count_zero() {
        assert_eq!(cliffs_delta(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
        // pairs: (1,2) <, (2,2) =, (3,2) >
        assert_eq!(cliffs_delta(&[1.0, 2.0, 3.0], &[2.0]), 0.0);
        assert_eq!(cliffs_delta(&[], &[1.0]), 0.0);
    }

    #[test]
    fn test_sorted_and_pairwise_agree_small() {
        let a = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let b = [2.0, 7.0, 1.0, 8.0, 2.0, 8.0];
        assert!((cliffs_delta_pairwise(&a, &b) - cliffs_delta_sorted(&a, &b)).abs() < 1e-12);
    }

    #[test]
    fn test_sorted_and_pairwise_agree_large() {
        let mut rng = RandomState::new(2024);
        let control = normal_sample(&mut rng, 1000, 0.0);
        let treatment = normal_sample(&mut rng, 1000, 0.3);

        let pairwise = cliffs_delta_pairwise(&treatment, &control);
        let sorted = cliffs_delta_sorted(&treatment, &control);
        assert!((pairwise - sorted).abs() < 1e-9);
        assert_eq!(cliffs_delta(&treatment, &control), sorted);
        assert!(sorted > 0.0);
    }

    #[test]
    fn test_effect_size_between() {
        let effect = EffectSize::between(
            &[0.95, 0.94, 0.96, 0.93, 0.97],
            &[0.8, 0.82, 0.79, 0.81, 0.80],
        );
        assert!(effect.cohens_d > 2.0);
        assert_eq!(effect.magnitude, EffectMagnitude::Large);
        assert_eq!(effect.cliffs_delta, 1.0);
    }

    #[test]
    fn test_magnitude_serializes_lowercase() {
        let json = serde_json::to_string(&EffectMagnitude::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        assert_eq!(EffectMagnitude::Small.to_string(), "small");
    }
}
