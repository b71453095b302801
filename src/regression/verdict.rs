// Run comparison verdict
//
// Compares every (metric, case) pair shared by a baseline and a candidate run,
// classifies each case against the configured relative threshold and folds the
// results into a single pass/fail report.
//
// Per-metric aggregates compare the per-case means of both runs and carry the
// configured multiple-comparison correction across metrics.

use crate::error::Result;
use crate::regression::config::ComparisonConfig;
use crate::regression::statistics::{
    compare_metric_with_rng, CompareOptions, MetricComparison, TestKind,
};
use crate::scores::{CaseScores, RunRef, RunScores};
use crate::stats::{apply_correction, mean, with_default_rng, CorrectionMethod, RandomState};
use serde::{Deserialize, Serialize};

/// Classification of one case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseVerdict {
    Regression,
    Improvement,
    Unchanged,
}

/// One classified case: `{case, metric, ...MetricComparison}` once serialized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseComparison {
    pub case: String,
    #[serde(flatten)]
    pub comparison: MetricComparison,
}

/// Aggregate comparison of one metric across all shared cases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricVerdict {
    #[serde(flatten)]
    pub comparison: MetricComparison,
    /// p-value after the configured correction across metrics
    pub adjusted_p_value: f64,
    pub significant_after_correction: bool,
}

/// Aggregate report over all shared metrics and cases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunComparisonReport {
    pub baseline: RunRef,
    pub candidate: RunRef,
    /// Mean of the per-case absolute differences (candidate - baseline)
    pub overall_delta: f64,
    /// `true` when no case regressed
    pub passed: bool,
    pub regressions: Vec<CaseComparison>,
    pub improvements: Vec<CaseComparison>,
    pub unchanged: usize,
    /// Relative threshold in percent
    pub threshold: f64,
    pub test: TestKind,
    pub correction: CorrectionMethod,
    pub metrics: Vec<MetricVerdict>,
}

impl RunComparisonReport {
    pub fn compared_cases(&self) -> usize {
        self.regressions.len() + self.improvements.len() + self.unchanged
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        if self.passed {
            report.push_str("✅ NO REGRESSION DETECTED\n\n");
        } else {
            report.push_str(&format!(
                "❌ REGRESSION DETECTED ({} cases)\n\n",
                self.regressions.len()
            ));
        }

        report.push_str(&format!("Baseline:  {}\n", self.baseline));
        report.push_str(&format!("Candidate: {}\n", self.candidate));
        report.push_str(&format!(
            "Test: {}, threshold: {}%, correction: {}\n",
            self.test, self.threshold, self.correction
        ));
        report.push_str(&format!("Overall delta: {:+.4}\n", self.overall_delta));
        report.push_str(&format!(
            "Cases: {} regressed, {} improved, {} unchanged\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged
        ));

        if !self.regressions.is_empty() {
            report.push_str(&format!("\n📉 Regressions ({}):\n", self.regressions.len()));
            for case in &self.regressions {
                report.push_str(&case_line(case));
            }
        }

        if !self.improvements.is_empty() {
            report.push_str(&format!("\n📈 Improvements ({}):\n", self.improvements.len()));
            for case in &self.improvements {
                report.push_str(&case_line(case));
            }
        }

        if !self.metrics.is_empty() {
            report.push_str("\n📊 Metrics:\n");
            for metric in &self.metrics {
                let c = &metric.comparison;
                report.push_str(&format!(
                    "  {} ({:.4} -> {:.4}, {:+.2}%, p={:.4}, adjusted p={:.4}{}, d={:.2} {}, \
                     delta={:.2})\n",
                    c.metric,
                    c.control_mean,
                    c.treatment_mean,
                    c.relative_diff,
                    c.significance.p_value,
                    metric.adjusted_p_value,
                    if metric.significant_after_correction { " *" } else { "" },
                    c.effect_size.cohens_d,
                    c.effect_size.magnitude,
                    c.effect_size.cliffs_delta,
                ));
            }
        }

        report
    }
}

fn case_line(case: &CaseComparison) -> String {
    let c = &case.comparison;
    format!(
        "  {}/{}: {:.4} -> {:.4} ({:+.2}%, p={:.4})\n",
        c.metric,
        case.case,
        c.control_mean,
        c.treatment_mean,
        c.relative_diff,
        c.significance.p_value
    )
}

/// Classify one comparison against the configured threshold
///
/// Direction comes from the absolute difference; its size is taken in percent
/// of `|control_mean|`, so a rise over a negative baseline is still a rise.
/// Against a zero baseline any movement exceeds the threshold. Metrics listed
/// in `lower_is_better` count a decrease as an improvement. A change of
/// exactly zero is always unchanged, so a zero threshold flags any movement.
pub fn classify_change(comparison: &MetricComparison, config: &ComparisonConfig) -> CaseVerdict {
    if config.require_significance && !comparison.significance.is_significant {
        return CaseVerdict::Unchanged;
    }

    let change = if config.is_lower_better(&comparison.metric) {
        -comparison.absolute_diff
    } else {
        comparison.absolute_diff
    };
    if change == 0.0 || change.is_nan() {
        return CaseVerdict::Unchanged;
    }

    let percent = if comparison.control_mean == 0.0 {
        f64::INFINITY
    } else {
        change.abs() / comparison.control_mean.abs() * 100.0
    };

    if percent.is_nan() || percent < config.regression_threshold {
        CaseVerdict::Unchanged
    } else if change < 0.0 {
        CaseVerdict::Regression
    } else {
        CaseVerdict::Improvement
    }
}

/// Compare a candidate run against a baseline run
///
/// Uses `config.seed` for bootstrap resampling when set, otherwise the
/// process-wide default generator.
///
/// # Example
/// ```
/// use evalcompare::regression::{compare_runs, ComparisonConfig};
/// use evalcompare::scores::RunScores;
///
/// let mut baseline = RunScores::new("baseline");
/// baseline.insert("accuracy", "case-1", vec![0.9, 0.91, 0.89]);
///
/// let mut candidate = RunScores::new("candidate");
/// candidate.insert("accuracy", "case-1", vec![0.7, 0.71, 0.69]);
///
/// let report = compare_runs(&baseline, &candidate, &ComparisonConfig::default()).unwrap();
/// assert!(!report.passed);
/// assert_eq!(report.regressions[0].case, "case-1");
/// ```
pub fn compare_runs(
    baseline: &RunScores,
    candidate: &RunScores,
    config: &ComparisonConfig,
) -> Result<RunComparisonReport> {
    match (config.seed, config.test) {
        (Some(seed), _) => {
            compare_runs_with_rng(baseline, candidate, config, &mut RandomState::new(seed))
        }
        (None, TestKind::Bootstrap) => {
            with_default_rng(|rng| compare_runs_with_rng(baseline, candidate, config, rng))
        }
        (None, _) => {
            compare_runs_with_rng(baseline, candidate, config, &mut RandomState::default())
        }
    }
}

/// [`compare_runs`] with an explicit generator shared by every bootstrap
pub fn compare_runs_with_rng(
    baseline: &RunScores,
    candidate: &RunScores,
    config: &ComparisonConfig,
    rng: &mut RandomState,
) -> Result<RunComparisonReport> {
    config.validate()?;
    let options = config.compare_options();

    let mut regressions = Vec::new();
    let mut improvements = Vec::new();
    let mut unchanged = 0;
    let mut deltas = Vec::new();
    let mut metric_comparisons = Vec::new();

    for (metric, baseline_cases) in &baseline.scores {
        let Some(candidate_cases) = candidate.cases(metric) else {
            tracing::warn!(
                metric = %metric,
                candidate = %candidate.id,
                "metric missing from candidate run"
            );
            continue;
        };

        let mut baseline_means = Vec::new();
        let mut candidate_means = Vec::new();

        for (case, baseline_scores) in baseline_cases {
            let Some(candidate_scores) = candidate_cases.get(case) else {
                tracing::warn!(metric = %metric, case = %case, "case missing from candidate run");
                continue;
            };
            if baseline_scores.is_empty() || candidate_scores.is_empty() {
                tracing::warn!(metric = %metric, case = %case, "skipping case with no scores");
                continue;
            }

            let comparison =
                compare_case(metric, baseline_scores, candidate_scores, &options, rng)?;
            baseline_means.push(comparison.control_mean);
            candidate_means.push(comparison.treatment_mean);
            deltas.push(comparison.absolute_diff);

            let verdict = classify_change(&comparison, config);
            tracing::debug!(
                metric = %metric,
                case = %case,
                ?verdict,
                relative_diff = comparison.relative_diff,
                "case classified"
            );

            let entry = CaseComparison {
                case: case.clone(),
                comparison,
            };
            match verdict {
                CaseVerdict::Regression => regressions.push(entry),
                CaseVerdict::Improvement => improvements.push(entry),
                CaseVerdict::Unchanged => unchanged += 1,
            }
        }

        for case in candidate_cases.keys().filter(|c| !baseline_cases.contains_key(*c)) {
            tracing::warn!(metric = %metric, case = %case, "case missing from baseline run");
        }

        if !baseline_means.is_empty() {
            metric_comparisons.push(compare_metric_with_rng(
                metric,
                &baseline_means,
                &candidate_means,
                &options,
                rng,
            )?);
        }
    }

    for metric in candidate.metrics().filter(|m| !baseline.scores.contains_key(*m)) {
        tracing::warn!(
            metric = %metric,
            baseline = %baseline.id,
            "metric missing from baseline run"
        );
    }

    let metrics = correct_metrics(metric_comparisons, config)?;
    let passed = regressions.is_empty();

    tracing::info!(
        baseline = %baseline.id,
        candidate = %candidate.id,
        passed,
        regressions = regressions.len(),
        improvements = improvements.len(),
        unchanged,
        "run comparison complete"
    );

    Ok(RunComparisonReport {
        baseline: baseline.run_ref(),
        candidate: candidate.run_ref(),
        overall_delta: mean(&deltas),
        passed,
        regressions,
        improvements,
        unchanged,
        threshold: config.regression_threshold,
        test: config.test,
        correction: config.correction,
        metrics,
    })
}

fn compare_case(
    metric: &str,
    baseline: &CaseScores,
    candidate: &CaseScores,
    options: &CompareOptions,
    rng: &mut RandomState,
) -> Result<MetricComparison> {
    compare_metric_with_rng(metric, baseline.values(), candidate.values(), options, rng)
}

fn correct_metrics(
    comparisons: Vec<MetricComparison>,
    config: &ComparisonConfig,
) -> Result<Vec<MetricVerdict>> {
    let p_values: Vec<f64> = comparisons
        .iter()
        .map(|c| c.significance.p_value)
        .collect();
    let corrected = apply_correction(config.correction, &p_values, config.alpha)?;

    Ok(comparisons
        .into_iter()
        .zip(corrected.adjusted_p_values)
        .zip(corrected.significant)
        .map(|((comparison, adjusted_p_value), significant_after_correction)| MetricVerdict {
            comparison,
            adjusted_p_value,
            significant_after_correction,
        })
        .collect())
}
