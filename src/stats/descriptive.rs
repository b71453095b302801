//! Descriptive statistics for a single sample
//!
//! Degenerate-input policy: empty samples summarize to zeros and a variance
//! with `len <= ddof` is `0.0`, never NaN.

use crate::error::{check_confidence_level, Result, StatsError};
use crate::stats::distributions::t_quantile;
use serde::{Deserialize, Serialize};

/// Two-sided interval around an estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    /// Confidence level in (0, 1), e.g. 0.95
    pub level: f64,
}

impl ConfidenceInterval {
    /// Interval that collapses onto a single point
    pub fn point(value: f64, level: f64) -> Self {
        Self {
            lower: value,
            upper: value,
            level,
        }
    }

    /// Whether `value` lies inside the closed interval
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Selected percentiles of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Summary of one metric's scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub name: String,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    /// Student-t interval for the mean
    pub confidence_interval: ConfidenceInterval,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentiles: Option<Percentiles>,
}

/// Arithmetic mean (`0.0` for an empty sample)
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Variance with `ddof` delta degrees of freedom (1 = sample variance)
///
/// Returns `0.0` when `values.len() <= ddof`.
pub fn variance(values: &[f64], ddof: usize) -> f64 {
    if values.len() <= ddof {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    ss / (values.len() - ddof) as f64
}

/// Sample standard deviation (ddof = 1)
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values, 1).sqrt()
}

/// Median (`0.0` for an empty sample)
pub fn median(values: &[f64]) -> f64 {
    let sorted = sorted_copy(values);
    percentile_sorted(&sorted, 50.0)
}

/// Percentile `p` in `[0, 100]` with linear interpolation between closest ranks
///
/// # Example
/// ```
/// use evalcompare::stats::percentile;
///
/// let p = percentile(&[1.0, 2.0, 3.0, 4.0, 5.0], 25.0).unwrap();
/// assert_eq!(p, 2.0);
/// assert!(percentile(&[1.0], 120.0).is_err());
/// ```
pub fn percentile(values: &[f64], p: f64) -> Result<f64> {
    check_percentile(p)?;
    let sorted = sorted_copy(values);
    Ok(percentile_sorted(&sorted, p))
}

/// Summarize a metric's scores, sorting once
pub fn calculate_metric_summary(
    name: &str,
    values: &[f64],
    confidence_level: f64,
) -> Result<MetricSummary> {
    check_confidence_level(confidence_level)?;

    let sorted = sorted_copy(values);
    let count = sorted.len();

    if count == 0 {
        return Ok(MetricSummary {
            name: name.to_string(),
            mean: 0.0,
            std_dev: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            count: 0,
            confidence_interval: ConfidenceInterval::point(0.0, confidence_level),
            percentiles: None,
        });
    }

    let m = mean(&sorted);
    let sd = std_dev(&sorted);
    let df = count.saturating_sub(1).max(1) as f64;
    let critical = t_quantile(1.0 - (1.0 - confidence_level) / 2.0, df);
    let margin = critical * sd / (count as f64).sqrt();

    Ok(MetricSummary {
        name: name.to_string(),
        mean: m,
        std_dev: sd,
        median: percentile_sorted(&sorted, 50.0),
        min: sorted[0],
        max: sorted[count - 1],
        count,
        confidence_interval: ConfidenceInterval {
            lower: m - margin,
            upper: m + margin,
            level: confidence_level,
        },
        percentiles: Some(Percentiles {
            p25: percentile_sorted(&sorted, 25.0),
            p50: percentile_sorted(&sorted, 50.0),
            p75: percentile_sorted(&sorted, 75.0),
            p90: percentile_sorted(&sorted, 90.0),
            p95: percentile_sorted(&sorted, 95.0),
            p99: percentile_sorted(&sorted, 99.0),
        }),
    })
}

fn check_percentile(p: f64) -> Result<()> {
    if (0.0..=100.0).contains(&p) {
        Ok(())
    } else {
        Err(StatsError::InvalidPercentile(p))
    }
}

pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Percentile of an already-sorted slice; `p` must be in `[0, 100]`
pub(crate) fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = p / 100.0 * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}
