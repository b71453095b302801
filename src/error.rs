//! Error types for the statistical comparison engine
//!
//! Only validation failures are errors. Degenerate inputs (tiny samples, zero
//! variance, complete ties) produce documented neutral results instead.

use thiserror::Error;

/// Errors that can occur when validating comparison inputs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("confidence level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),

    #[error("alpha must be in (0, 1), got {0}")]
    InvalidAlpha(f64),

    #[error("percentile must be in [0, 100], got {0}")]
    InvalidPercentile(f64),

    #[error("bootstrap iterations must be >= 1, got {0}")]
    InvalidIterations(usize),

    #[error("regression threshold must be a finite non-negative percentage, got {0}")]
    InvalidThreshold(f64),

    #[error("unknown test '{0}' (expected ttest, welch, mannwhitney or bootstrap)")]
    UnknownTest(String),

    #[error("unknown correction '{0}' (expected none, bonferroni or holm)")]
    UnknownCorrection(String),
}

/// Result type for statistical operations
pub type Result<T> = std::result::Result<T, StatsError>;

/// Reject confidence levels outside the open interval (0, 1)
pub(crate) fn check_confidence_level(level: f64) -> Result<()> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidConfidenceLevel(level))
    }
}

/// Reject significance levels outside the open interval (0, 1)
pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidAlpha(alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_level_bounds_are_exclusive() {
        assert!(check_confidence_level(0.95).is_ok());
        assert_eq!(
            check_confidence_level(0.0),
            Err(StatsError::InvalidConfidenceLevel(0.0))
        );
        assert!(check_confidence_level(1.0).is_err());
        assert!(check_confidence_level(f64::NAN).is_err());
    }

    #[test]
    fn test_alpha_bounds_are_exclusive() {
        assert!(check_alpha(0.05).is_ok());
        assert!(check_alpha(0.0).is_err());
        assert!(check_alpha(1.5).is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = StatsError::UnknownTest("ztest".to_string());
        assert!(err.to_string().contains("ztest"));

        let err = StatsError::InvalidPercentile(101.0);
        assert_eq!(err.to_string(), "percentile must be in [0, 100], got 101");
    }
}
