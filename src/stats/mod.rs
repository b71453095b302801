//! Pure statistical core: descriptive statistics, distribution functions,
//! hypothesis tests, effect sizes, bootstrap intervals and p-value corrections.
//!
//! Everything here is synchronous and stateless apart from the optional
//! process-wide default generator in [`rng`].

pub mod bootstrap;
pub mod correction;
pub mod descriptive;
pub mod distributions;
pub mod effect_size;
pub mod hypothesis;
pub mod rng;

pub use bootstrap::{bootstrap_ci, DEFAULT_BOOTSTRAP_ITERATIONS};
pub use correction::{
    apply_correction, bonferroni_correction, holm_bonferroni_correction, CorrectionMethod,
    CorrectionResult,
};
pub use descriptive::{
    calculate_metric_summary, mean, median, percentile, std_dev, variance, ConfidenceInterval,
    MetricSummary, Percentiles,
};
pub use distributions::{
    erf, gamma, incomplete_beta, log_gamma, normal_cdf, normal_quantile, t_cdf, t_quantile,
};
pub use effect_size::{
    cliffs_delta, cliffs_delta_pairwise, cliffs_delta_sorted, cohens_d, interpret_effect_size,
    EffectMagnitude, EffectSize,
};
pub use hypothesis::{mann_whitney_u, student_t_test, welch_t_test, TestResult};
pub use rng::{set_default_seed, with_default_rng, RandomState};
