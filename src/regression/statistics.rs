// Per-metric comparison: one hypothesis test, effect sizes and a difference
// interval combined into a single verdict.
//
// All tests are run as (treatment, control), so positive statistics, effect
// sizes and differences mean the treatment scored higher.

use crate::error::{check_alpha, check_confidence_level, Result, StatsError};
use crate::stats::hypothesis::welch_degrees_of_freedom;
use crate::stats::{
    bootstrap_ci, mann_whitney_u, mean, student_t_test, t_quantile, variance, welch_t_test,
    with_default_rng, ConfidenceInterval, EffectSize, RandomState, TestResult,
    DEFAULT_BOOTSTRAP_ITERATIONS,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Hypothesis test selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    /// Student's t-test (pooled variance)
    TTest,
    /// Welch's t-test (unequal variances)
    #[default]
    Welch,
    /// Mann-Whitney U (rank-based)
    MannWhitney,
    /// Welch p-value with a bootstrap difference interval
    Bootstrap,
}

impl TestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestKind::TTest => "ttest",
            TestKind::Welch => "welch",
            TestKind::MannWhitney => "mannwhitney",
            TestKind::Bootstrap => "bootstrap",
        }
    }
}

impl std::fmt::Display for TestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestKind {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ttest" | "t-test" | "student" => Ok(TestKind::TTest),
            "welch" => Ok(TestKind::Welch),
            "mannwhitney" | "mann-whitney" => Ok(TestKind::MannWhitney),
            "bootstrap" => Ok(TestKind::Bootstrap),
            _ => Err(StatsError::UnknownTest(s.to_string())),
        }
    }
}

/// Options for [`compare_metric`]
#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    pub test: TestKind,
    pub alpha: f64,
    pub confidence_level: f64,
    pub bootstrap_iterations: usize,
    /// Bootstrap seed; `None` draws from the process-wide default generator
    pub seed: Option<u32>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            test: TestKind::Welch,
            alpha: 0.05,
            confidence_level: 0.95,
            bootstrap_iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            seed: None,
        }
    }
}

impl CompareOptions {
    pub fn with_test(test: TestKind) -> Self {
        Self {
            test,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        check_alpha(self.alpha)?;
        check_confidence_level(self.confidence_level)?;
        if self.test == TestKind::Bootstrap && self.bootstrap_iterations == 0 {
            return Err(StatsError::InvalidIterations(0));
        }
        Ok(())
    }
}

/// Significance of one comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSignificance {
    pub p_value: f64,
    pub is_significant: bool,
    pub alpha: f64,
    pub test_used: TestKind,
    pub test_statistic: f64,
}

/// Full verdict for one metric between a control and a treatment sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: String,
    pub control_mean: f64,
    pub treatment_mean: f64,
    pub control_count: usize,
    pub treatment_count: usize,
    /// `treatment_mean - control_mean`
    pub absolute_diff: f64,
    /// `absolute_diff / control_mean * 100`, or 0 when the control mean is 0
    pub relative_diff: f64,
    pub significance: StatisticalSignificance,
    pub effect_size: EffectSize,
    /// Interval for `treatment_mean - control_mean`
    pub confidence_interval: ConfidenceInterval,
}

/// Compare `treatment` against `control` for one metric
///
/// Bootstrap mode resamples with `options.seed` when given, otherwise with the
/// process-wide default generator.
///
/// # Example
/// ```
/// use evalcompare::regression::{compare_metric, CompareOptions};
///
/// let control = [0.8, 0.82, 0.79, 0.81, 0.80];
/// let treatment = [0.95, 0.94, 0.96, 0.93, 0.97];
/// let options = CompareOptions::default();
/// let result = compare_metric("accuracy", &control, &treatment, &options).unwrap();
/// assert!(result.significance.is_significant);
/// assert_eq!(result.effect_size.cliffs_delta, 1.0);
/// ```
pub fn compare_metric(
    name: &str,
    control: &[f64],
    treatment: &[f64],
    options: &CompareOptions,
) -> Result<MetricComparison> {
    match (options.seed, options.test) {
        (Some(seed), _) => {
            compare_metric_with_rng(name, control, treatment, options, &mut RandomState::new(seed))
        }
        (None, TestKind::Bootstrap) => {
            with_default_rng(|rng| compare_metric_with_rng(name, control, treatment, options, rng))
        }
        // Only the bootstrap consumes randomness.
        (None, _) => compare_metric_with_rng(
            name,
            control,
            treatment,
            options,
            &mut RandomState::default(),
        ),
    }
}

/// [`compare_metric`] with an explicit generator for bootstrap resampling
pub fn compare_metric_with_rng(
    name: &str,
    control: &[f64],
    treatment: &[f64],
    options: &CompareOptions,
    rng: &mut RandomState,
) -> Result<MetricComparison> {
    options.validate()?;

    let test = run_test(options.test, control, treatment);

    let control_mean = mean(control);
    let treatment_mean = mean(treatment);
    let absolute_diff = treatment_mean - control_mean;
    let relative_diff = if control_mean == 0.0 {
        0.0
    } else {
        absolute_diff / control_mean * 100.0
    };

    let confidence_interval = match options.test {
        // Welch's p-value above, resampled interval here.
        TestKind::Bootstrap => bootstrap_ci(
            control,
            treatment,
            options.confidence_level,
            options.bootstrap_iterations,
            rng,
        )?,
        TestKind::TTest => parametric_diff_ci(control, treatment, options.confidence_level, true),
        TestKind::Welch | TestKind::MannWhitney => {
            parametric_diff_ci(control, treatment, options.confidence_level, false)
        }
    };

    let significance = StatisticalSignificance {
        p_value: test.p_value,
        is_significant: test.p_value < options.alpha,
        alpha: options.alpha,
        test_used: options.test,
        test_statistic: test.statistic,
    };

    tracing::debug!(
        metric = name,
        test = %options.test,
        p_value = test.p_value,
        absolute_diff,
        "metric compared"
    );

    Ok(MetricComparison {
        metric: name.to_string(),
        control_mean,
        treatment_mean,
        control_count: control.len(),
        treatment_count: treatment.len(),
        absolute_diff,
        relative_diff,
        significance,
        effect_size: EffectSize::between(treatment, control),
        confidence_interval,
    })
}

fn run_test(kind: TestKind, control: &[f64], treatment: &[f64]) -> TestResult {
    match kind {
        TestKind::TTest => student_t_test(treatment, control),
        TestKind::Welch | TestKind::Bootstrap => welch_t_test(treatment, control),
        TestKind::MannWhitney => mann_whitney_u(treatment, control),
    }
}

/// Student-t interval for `mean(treatment) - mean(control)`
///
/// Collapses onto the point estimate when either sample has fewer than two
/// values or the standard error is zero.
fn parametric_diff_ci(
    control: &[f64],
    treatment: &[f64],
    confidence_level: f64,
    pooled: bool,
) -> ConfidenceInterval {
    let diff = mean(treatment) - mean(control);
    let (n1, n2) = (treatment.len() as f64, control.len() as f64);
    if n1 < 2.0 || n2 < 2.0 {
        return ConfidenceInterval::point(diff, confidence_level);
    }

    let (v1, v2) = (variance(treatment, 1), variance(control, 1));
    let (se, df) = if pooled {
        let df = n1 + n2 - 2.0;
        let pooled_var = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
        ((pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
    } else {
        let (a, b) = (v1 / n1, v2 / n2);
        ((a + b).sqrt(), welch_degrees_of_freedom(a, b, n1, n2))
    };
    if se == 0.0 || !se.is_finite() {
        return ConfidenceInterval::point(diff, confidence_level);
    }

    let margin = t_quantile(1.0 - (1.0 - confidence_level) / 2.0, df) * se;
    ConfidenceInterval {
        lower: diff - margin,
        upper: diff + margin,
        level: confidence_level,
    }
}
