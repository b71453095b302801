//! Two-sample hypothesis tests
//!
//! Every test returns `statistic = 0, p_value = 1` when either sample has
//! fewer than two observations or the standard error vanishes. Swapping the
//! samples negates the statistic and leaves the p-value unchanged.

use crate::stats::descriptive::{mean, variance};
use crate::stats::distributions::{normal_cdf, t_cdf};
use serde::{Deserialize, Serialize};

/// Outcome of a two-sample test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// t statistic for the t-tests, signed z-score for Mann-Whitney
    pub statistic: f64,
    /// Two-tailed p-value in [0, 1]
    pub p_value: f64,
    /// Degrees of freedom (0 for rank tests and degenerate inputs)
    pub degrees_of_freedom: f64,
}

impl TestResult {
    /// Neutral result used for degenerate inputs
    pub const NO_SIGNAL: TestResult = TestResult {
        statistic: 0.0,
        p_value: 1.0,
        degrees_of_freedom: 0.0,
    };
}

/// Student's two-sample t-test assuming equal variances
///
/// The statistic is `(mean1 - mean2) / se` with the pooled standard error.
///
/// # Example
/// ```
/// use evalcompare::stats::student_t_test;
///
/// let result = student_t_test(&[1.0, 2.0, 3.0], &[7.0, 8.0, 9.0]);
/// assert!(result.statistic < 0.0);
/// assert!(result.p_value < 0.01);
/// ```
pub fn student_t_test(sample1: &[f64], sample2: &[f64]) -> TestResult {
    let (n1, n2) = (sample1.len(), sample2.len());
    if n1 < 2 || n2 < 2 {
        return TestResult::NO_SIGNAL;
    }

    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let df = n1f + n2f - 2.0;
    let pooled_var =
        ((n1f - 1.0) * variance(sample1, 1) + (n2f - 1.0) * variance(sample2, 1)) / df;
    let se = (pooled_var * (1.0 / n1f + 1.0 / n2f)).sqrt();
    if se == 0.0 || !se.is_finite() {
        return TestResult::NO_SIGNAL;
    }

    let t = (mean(sample1) - mean(sample2)) / se;
    TestResult {
        statistic: t,
        p_value: two_tailed_t(t, df),
        degrees_of_freedom: df,
    }
}

/// Welch's t-test (unequal variances, Welch–Satterthwaite df)
pub fn welch_t_test(sample1: &[f64], sample2: &[f64]) -> TestResult {
    let (n1, n2) = (sample1.len(), sample2.len());
    if n1 < 2 || n2 < 2 {
        return TestResult::NO_SIGNAL;
    }

    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let a = variance(sample1, 1) / n1f;
    let b = variance(sample2, 1) / n2f;
    let se = (a + b).sqrt();
    if se == 0.0 || !se.is_finite() {
        return TestResult::NO_SIGNAL;
    }

    let df = welch_degrees_of_freedom(a, b, n1f, n2f);
    let t = (mean(sample1) - mean(sample2)) / se;
    TestResult {
        statistic: t,
        p_value: two_tailed_t(t, df),
        degrees_of_freedom: df,
    }
}

/// Welch–Satterthwaite df from the per-sample squared standard errors
pub(crate) fn welch_degrees_of_freedom(a: f64, b: f64, n1: f64, n2: f64) -> f64 {
    (a + b).powi(2) / (a.powi(2) / (n1 - 1.0) + b.powi(2) / (n2 - 1.0))
}

/// Mann-Whitney U test with the normal approximation
///
/// Ties receive the average of the ranks they span and `σ_U` carries the
/// usual tie correction. The statistic is the signed z-score of `U1`
/// (positive when `sample1` tends to be larger).
pub fn mann_whitney_u(sample1: &[f64], sample2: &[f64]) -> TestResult {
    let (n1, n2) = (sample1.len(), sample2.len());
    if n1 < 2 || n2 < 2 {
        return TestResult::NO_SIGNAL;
    }

    let mut pooled: Vec<(f64, bool)> = sample1
        .iter()
        .map(|&v| (v, true))
        .chain(sample2.iter().map(|&v| (v, false)))
        .collect();
    pooled.sort_by(|x, y| x.0.total_cmp(&y.0));

    let n = pooled.len();
    let mut rank_sum1 = 0.0;
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && pooled[j].0 == pooled[i].0 {
            j += 1;
        }
        // positions i..j share the mid-rank of ranks i+1..=j
        let mid_rank = (i + 1 + j) as f64 / 2.0;
        let from_first = pooled[i..j].iter().filter(|(_, first)| *first).count();
        rank_sum1 += mid_rank * from_first as f64;

        let tied = (j - i) as f64;
        tie_term += tied.powi(3) - tied;
        i = j;
    }

    let (n1f, n2f, nf) = (n1 as f64, n2 as f64, n as f64);
    let u1 = rank_sum1 - n1f * (n1f + 1.0) / 2.0;
    let mu = n1f * n2f / 2.0;
    let sigma_sq = n1f * n2f / 12.0 * ((nf + 1.0) - tie_term / (nf * (nf - 1.0)));
    if sigma_sq <= 0.0 {
        return TestResult::NO_SIGNAL;
    }

    let z = (u1 - mu) / sigma_sq.sqrt();
    TestResult {
        statistic: z,
        p_value: (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0),
        degrees_of_freedom: 0.0,
    }
}

fn two_tailed_t(t: f64, df: f64) -> f64 {
    (2.0 * (1.0 - t_cdf(t.abs(), df))).clamp(0.0, 1.0)
}
