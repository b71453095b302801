//! Percentile bootstrap confidence interval for a difference in means
//!
//! CPU-bound: `iterations × (n1 + n2)` draws. Callers embedding the engine in
//! an event loop should run bootstrap comparisons on a worker thread.

use crate::error::{check_confidence_level, Result, StatsError};
use crate::stats::descriptive::{mean, ConfidenceInterval};
use crate::stats::rng::RandomState;

/// Default number of bootstrap resamples
pub const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 10_000;

/// Bootstrap CI for `mean(sample2) - mean(sample1)`
///
/// Each iteration resamples `sample1` and then `sample2` with replacement
/// (sizes preserved). The bounds are the `alpha/2` and `1 - alpha/2`
/// empirical quantiles of the sorted differences. The same generator state
/// and inputs always produce bit-identical bounds.
///
/// If either sample is empty the interval collapses onto the point estimate.
///
/// # Example
/// ```
/// use evalcompare::stats::{bootstrap_ci, RandomState};
///
/// let control = [0.8, 0.82, 0.79, 0.81, 0.80];
/// let treatment = [0.95, 0.94, 0.96, 0.93, 0.97];
/// let ci = bootstrap_ci(&control, &treatment, 0.95, 2_000, &mut RandomState::new(1)).unwrap();
/// assert!(ci.lower > 0.0);
/// ```
pub fn bootstrap_ci(
    sample1: &[f64],
    sample2: &[f64],
    confidence_level: f64,
    iterations: usize,
    rng: &mut RandomState,
) -> Result<ConfidenceInterval> {
    check_confidence_level(confidence_level)?;
    if iterations == 0 {
        return Err(StatsError::InvalidIterations(iterations));
    }

    if sample1.is_empty() || sample2.is_empty() {
        let point = mean(sample2) - mean(sample1);
        return Ok(ConfidenceInterval::point(point, confidence_level));
    }

    let mut diffs: Vec<f64> = (0..iterations)
        .map(|_| {
            let boot1 = resampled_mean(sample1, rng);
            let boot2 = resampled_mean(sample2, rng);
            boot2 - boot1
        })
        .collect();
    diffs.sort_by(f64::total_cmp);

    let alpha = 1.0 - confidence_level;
    let lower_idx = ((alpha / 2.0) * iterations as f64).floor() as usize;
    let upper_idx = ((1.0 - alpha / 2.0) * iterations as f64).floor() as usize;
    let last = iterations - 1;

    Ok(ConfidenceInterval {
        lower: diffs[lower_idx.min(last)],
        upper: diffs[upper_idx.min(last)],
        level: confidence_level,
    })
}

/// Mean of one resample-with-replacement, without materializing it
fn resampled_mean(sample: &[f64], rng: &mut RandomState) -> f64 {
    let n = sample.len();
    let sum: f64 = (0..n).map(|_| sample[rng.next_index(n)]).sum();
    sum / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_support::normal_sample;

    #[test]
    fn test_same_seed_bit_identical() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 6.5];

        let first = bootstrap_ci(&a, &b, 0.95, 1_000, &mut RandomState::new(7)).unwrap();
        let second = bootstrap_ci(&a, &b, 0.95, 1_000, &mut RandomState::new(7)).unwrap();
        assert_eq!(first.lower.to_bits(), second.lower.to_bits());
        assert_eq!(first.upper.to_bits(), second.upper.to_bits());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 6.5];

        let first = bootstrap_ci(&a, &b, 0.95, 1_000, &mut RandomState::new(1)).unwrap();
        let second = bootstrap_ci(&a, &b, 0.95, 1_000, &mut RandomState::new(2)).unwrap();
        assert!(first != second);
    }

    #[test]
    fn test_interval_is_ordered() {
        let a = [1.0, 5.0, 2.0, 8.0];
        let b = [3.0, 1.0, 9.0, 4.0];
        let ci = bootstrap_ci(&a, &b, 0.9, 500, &mut RandomState::new(3)).unwrap();
        assert!(ci.lower <= ci.upper);
        assert_eq!(ci.level, 0.9);
    }

    #[test]
    fn test_separated_samples_exclude_zero() {
        let mut rng = RandomState::new(123);
        let control = normal_sample(&mut rng, 30, 0.0);
        let treatment = normal_sample(&mut rng, 30, 0.5);
        let observed = mean(&treatment) - mean(&control);

        let ci = bootstrap_ci(&control, &treatment, 0.95, 10_000, &mut rng).unwrap();
        assert!(ci.contains(observed));
        assert!(ci.lower > 0.0, "ci={ci:?} observed={observed}");
    }

    #[test]
    fn test_constant_samples_give_point_interval() {
        let ci = bootstrap_ci(&[2.0; 4], &[3.0; 6], 0.95, 200, &mut RandomState::new(5)).unwrap();
        assert_eq!(ci.lower, 1.0);
        assert_eq!(ci.upper, 1.0);
    }

    #[test]
    fn test_empty_sample_collapses_to_point() {
        let ci = bootstrap_ci(&[], &[1.0, 3.0], 0.95, 100, &mut RandomState::new(5)).unwrap();
        assert_eq!(ci, ConfidenceInterval::point(2.0, 0.95));
    }

    #[test]
    fn test_rejects_invalid_confidence_level() {
        let mut rng = RandomState::new(1);
        assert_eq!(
            bootstrap_ci(&[1.0], &[2.0], 1.0, 100, &mut rng),
            Err(StatsError::InvalidConfidenceLevel(1.0))
        );
        assert!(bootstrap_ci(&[1.0], &[2.0], 0.0, 100, &mut rng).is_err());
        assert!(bootstrap_ci(&[1.0], &[2.0], -0.5, 100, &mut rng).is_err());
    }

    #[test]
    fn test_rejects_zero_iterations() {
        assert_eq!(
            bootstrap_ci(&[1.0], &[2.0], 0.95, 0, &mut RandomState::new(1)),
            Err(StatsError::InvalidIterations(0))
        );
    }

    #[test]
    fn test_single_iteration() {
        let ci = bootstrap_ci(&[1.0, 2.0], &[3.0, 4.0], 0.95, 1, &mut RandomState::new(1)).unwrap();
        assert_eq!(ci.lower, ci.upper);
    }
}
