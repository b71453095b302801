//! Family-wise error-rate corrections for a set of p-values
//!
//! Results are always reported in the caller's original order.

use crate::error::{check_alpha, Result, StatsError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Multiple-comparison correction method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionMethod {
    /// Raw p-values are used as-is
    #[default]
    None,
    Bonferroni,
    Holm,
}

impl CorrectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionMethod::None => "none",
            CorrectionMethod::Bonferroni => "bonferroni",
            CorrectionMethod::Holm => "holm",
        }
    }
}

impl std::fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrectionMethod {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(CorrectionMethod::None),
            "bonferroni" => Ok(CorrectionMethod::Bonferroni),
            "holm" | "holm-bonferroni" => Ok(CorrectionMethod::Holm),
            _ => Err(StatsError::UnknownCorrection(s.to_string())),
        }
    }
}

/// Corrected p-values and decisions, index-aligned with the input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionResult {
    pub method: CorrectionMethod,
    pub alpha: f64,
    /// Threshold the smallest p-value must clear (`alpha / m`)
    pub corrected_alpha: f64,
    pub adjusted_p_values: Vec<f64>,
    pub significant: Vec<bool>,
}

/// Apply `method` to `p_values` at family-wise level `alpha`
pub fn apply_correction(
    method: CorrectionMethod,
    p_values: &[f64],
    alpha: f64,
) -> Result<CorrectionResult> {
    match method {
        CorrectionMethod::None => {
            check_alpha(alpha)?;
            Ok(CorrectionResult {
                method,
                alpha,
                corrected_alpha: alpha,
                adjusted_p_values: p_values.to_vec(),
                significant: p_values.iter().map(|&p| p < alpha).collect(),
            })
        }
        CorrectionMethod::Bonferroni => bonferroni_correction(p_values, alpha),
        CorrectionMethod::Holm => holm_bonferroni_correction(p_values, alpha),
    }
}

/// Bonferroni: `adjusted = min(p·m, 1)`, significant when `p < alpha / m`
///
/// # Example
/// ```
/// use evalcompare::stats::bonferroni_correction;
///
/// let result = bonferroni_correction(&[0.01, 0.02, 0.03], 0.05).unwrap();
/// assert!((result.corrected_alpha - 0.05 / 3.0).abs() < 1e-12);
/// assert_eq!(result.significant, vec![true, false, false]);
/// ```
pub fn bonferroni_correction(p_values: &[f64], alpha: f64) -> Result<CorrectionResult> {
    check_alpha(alpha)?;
    let m = p_values.len().max(1) as f64;
    let corrected_alpha = alpha / m;

    Ok(CorrectionResult {
        method: CorrectionMethod::Bonferroni,
        alpha,
        corrected_alpha,
        adjusted_p_values: p_values.iter().map(|&p| (p * m).min(1.0)).collect(),
        significant: p_values.iter().map(|&p| p < corrected_alpha).collect(),
    })
}

/// Holm-Bonferroni step-down correction
///
/// Walks p-values in ascending order against `alpha / (m - k)`. The first
/// hypothesis that fails stops the walk: every larger p-value is also
/// non-significant. Adjusted p-values are made monotone in sorted order.
pub fn holm_bonferroni_correction(p_values: &[f64], alpha: f64) -> Result<CorrectionResult> {
    check_alpha(alpha)?;
    let m = p_values.len();

    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let mut adjusted = vec![1.0; m];
    let mut significant = vec![false; m];
    let mut running_max: f64 = 0.0;
    let mut rejecting = true;

    for (k, &idx) in order.iter().enumerate() {
        let remaining = (m - k) as f64;
        let p = p_values[idx];

        running_max = running_max.max((p * remaining).min(1.0));
        adjusted[idx] = running_max;

        if rejecting && p < alpha / remaining {
            significant[idx] = true;
        } else {
            rejecting = false;
        }
    }

    Ok(CorrectionResult {
        method: CorrectionMethod::Holm,
        alpha,
        corrected_alpha: alpha / m.max(1) as f64,
        adjusted_p_values: adjusted,
        significant,
    })
}
