// Baseline-vs-candidate regression detection for evaluation runs
//
// A fixed percentage threshold decides whether a case moved enough to matter;
// the hypothesis test, effect sizes and difference interval attached to every
// case say whether the move is distinguishable from trial-to-trial noise.
//
// Layers:
// - config:     thresholds, test selection and correction (TOML-loadable)
// - statistics: compare_metric, one metric between two samples
// - verdict:    compare_runs, every shared (metric, case) pair plus the report

mod config;
mod statistics;
mod verdict;

pub use config::ComparisonConfig;
pub use statistics::{
    compare_metric, compare_metric_with_rng, CompareOptions, MetricComparison,
    StatisticalSignificance, TestKind,
};
pub use verdict::{
    classify_change, compare_runs, compare_runs_with_rng, CaseComparison, CaseVerdict,
    MetricVerdict, RunComparisonReport,
};
