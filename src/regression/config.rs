// Configuration for baseline-vs-candidate comparisons
//
// Loaded from evalcompare.toml or built in code; CLI flags override fields.

use crate::error::{check_alpha, check_confidence_level, Result, StatsError};
use crate::regression::statistics::{CompareOptions, TestKind};
use crate::stats::{CorrectionMethod, DEFAULT_BOOTSTRAP_ITERATIONS};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a run comparison
///
/// # Example
/// ```
/// use evalcompare::regression::ComparisonConfig;
///
/// let config = ComparisonConfig::default();
/// assert_eq!(config.alpha, 0.05);
/// assert_eq!(config.regression_threshold, 5.0);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Example TOML
///
/// ```toml
/// test = "mannwhitney"
/// alpha = 0.01
/// regression_threshold = 2.5
/// correction = "holm"
/// seed = 7
/// lower_is_better = ["latency_ms", "cost_usd"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Hypothesis test used for every comparison
    pub test: TestKind,

    /// Significance level for the hypothesis tests
    pub alpha: f64,

    /// Confidence level of the difference intervals, in (0, 1)
    pub confidence_level: f64,

    /// Minimum relative change (percent of the baseline mean) that counts as
    /// a regression or an improvement
    pub regression_threshold: f64,

    /// Correction applied across the per-metric p-values
    pub correction: CorrectionMethod,

    /// Resamples per bootstrap interval
    pub bootstrap_iterations: usize,

    /// Seed for bootstrap resampling; `None` uses the process-wide default
    /// generator
    pub seed: Option<u32>,

    /// Only classify a case as regression/improvement when its test is
    /// significant at `alpha`
    pub require_significance: bool,

    /// Metrics where a decrease is an improvement (latency, cost, ...)
    pub lower_is_better: Vec<String>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            test: TestKind::Welch,
            alpha: 0.05,
            confidence_level: 0.95,
            regression_threshold: 5.0,
            correction: CorrectionMethod::None,
            bootstrap_iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            seed: None,
            require_significance: false,
            lower_is_better: Vec::new(),
        }
    }
}

impl ComparisonConfig {
    /// Fewer false alarms: small threshold but only significant, corrected changes
    pub fn strict() -> Self {
        Self {
            alpha: 0.01,
            regression_threshold: 2.0,
            correction: CorrectionMethod::Holm,
            require_significance: true,
            ..Self::default()
        }
    }

    /// Flags only large moves, at a looser significance level
    pub fn permissive() -> Self {
        Self {
            alpha: 0.10,
            regression_threshold: 10.0,
            ..Self::default()
        }
    }

    /// Load a configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid comparison config in {}", path.display()))
    }

    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        check_alpha(self.alpha)?;
        check_confidence_level(self.confidence_level)?;

        if !self.regression_threshold.is_finite() || self.regression_threshold < 0.0 {
            return Err(StatsError::InvalidThreshold(self.regression_threshold));
        }

        if self.bootstrap_iterations == 0 {
            return Err(StatsError::InvalidIterations(self.bootstrap_iterations));
        }

        Ok(())
    }

    /// Whether a decrease in `metric` is an improvement
    pub fn is_lower_better(&self, metric: &str) -> bool {
        self.lower_is_better.iter().any(|m| m == metric)
    }

    /// Per-metric options derived from this configuration
    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            test: self.test,
            alpha: self.alpha,
            confidence_level: self.confidence_level,
            bootstrap_iterations: self.bootstrap_iterations,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ComparisonConfig::default();
        assert_eq!(config.test, TestKind::Welch);
        assert_eq!(config.alpha, 0.05);
        assert_eq!(config.confidence_level, 0.95);
        assert_eq!(config.bootstrap_iterations, 10_000);
        assert_eq!(config.correction, CorrectionMethod::None);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strict_config() {
        let config = ComparisonConfig::strict();
        assert_eq!(config.alpha, 0.01);
        assert_eq!(config.regression_threshold, 2.0);
        assert_eq!(config.correction, CorrectionMethod::Holm);
        assert!(config.require_significance);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_permissive_config() {
        let config = ComparisonConfig::permissive();
        assert_eq!(config.alpha, 0.10);
        assert_eq!(config.regression_threshold, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_confidence_level() {
        let config = ComparisonConfig {
            confidence_level: 1.5,
            ..ComparisonConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(StatsError::InvalidConfidenceLevel(1.5))
        );
    }

    #[test]
    fn test_invalid_alpha() {
        let config = ComparisonConfig {
            alpha: 0.0,
            ..ComparisonConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_threshold() {
        let config = ComparisonConfig {
            regression_threshold: -1.0,
            ..ComparisonConfig::default()
        };
        assert_eq!(config.validate(), Err(StatsError::InvalidThreshold(-1.0)));

        let config = ComparisonConfig {
            regression_threshold: f64::INFINITY,
            ..ComparisonConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_iterations() {
        let config = ComparisonConfig {
            bootstrap_iterations: 0,
            ..ComparisonConfig::default()
        };
        assert_eq!(config.validate(), Err(StatsError::InvalidIterations(0)));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            test = "mannwhitney"
            alpha = 0.01
            regression_threshold = 2.5
            correction = "holm"
            seed = 7
            lower_is_better = ["latency_ms"]
        "#;

        let config = ComparisonConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.test, TestKind::MannWhitney);
        assert_eq!(config.alpha, 0.01);
        assert_eq!(config.regression_threshold, 2.5);
        assert_eq!(config.correction, CorrectionMethod::Holm);
        assert_eq!(config.seed, Some(7));
        assert!(config.is_lower_better("latency_ms"));
        assert!(!config.is_lower_better("accuracy"));
        // unspecified fields keep their defaults
        assert_eq!(config.confidence_level, 0.95);
    }

    #[test]
    fn test_parse_toml_unknown_test_fails() {
        assert!(ComparisonConfig::from_toml_str(r#"test = "ztest""#).is_err());
        assert!(ComparisonConfig::from_toml_str(r#"correction = "sidak""#).is_err());
    }

    #[test]
    fn test_parse_toml_rejects_invalid_values() {
        let err = ComparisonConfig::from_toml_str("confidence_level = 1.0").unwrap_err();
        assert!(err.to_string().contains("confidence level"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evalcompare.toml");
        std::fs::write(&path, "test = \"bootstrap\"\nbootstrap_iterations = 500\n").unwrap();

        let config = ComparisonConfig::from_file(&path).unwrap();
        assert_eq!(config.test, TestKind::Bootstrap);
        assert_eq!(config.bootstrap_iterations, 500);

        assert!(ComparisonConfig::from_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_compare_options() {
        let config = ComparisonConfig {
            seed: Some(3),
            ..ComparisonConfig::strict()
        };
        let options = config.compare_options();
        assert_eq!(options.alpha, 0.01);
        assert_eq!(options.seed, Some(3));
        assert_eq!(options.test, TestKind::Welch);
    }
}
