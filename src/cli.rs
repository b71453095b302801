//! CLI argument parsing for evalcompare

use crate::regression::{ComparisonConfig, TestKind};
use crate::stats::CorrectionMethod;
use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports and summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "evalcompare")]
#[command(version)]
#[command(about = "Statistical regression detection between evaluation runs", long_about = None)]
pub struct Cli {
    /// Enable debug logging to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare a candidate run against a baseline run
    Compare(CompareArgs),
    /// Print descriptive statistics for every metric of a run
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Baseline score file (JSON)
    pub baseline: PathBuf,

    /// Candidate score file (JSON)
    pub candidate: PathBuf,

    /// Comparison config (TOML); flags below override its fields
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Hypothesis test: ttest, welch, mannwhitney or bootstrap
    #[arg(long, value_name = "TEST")]
    pub test: Option<TestKind>,

    /// Significance level
    #[arg(long, value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Confidence level of the difference intervals
    #[arg(long = "confidence-level", value_name = "LEVEL")]
    pub confidence_level: Option<f64>,

    /// Relative change (percent) that counts as a regression or improvement
    #[arg(long, value_name = "PCT")]
    pub threshold: Option<f64>,

    /// Multiple-comparison correction: none, bonferroni or holm
    #[arg(long, value_name = "METHOD")]
    pub correction: Option<CorrectionMethod>,

    /// Bootstrap resamples
    #[arg(long, value_name = "N")]
    pub iterations: Option<usize>,

    /// Bootstrap seed
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u32>,

    /// Only classify significant changes
    #[arg(long = "require-significance")]
    pub require_significance: bool,

    /// Metrics where lower values are better (comma-separated)
    #[arg(long = "lower-is-better", value_name = "METRICS", value_delimiter = ',')]
    pub lower_is_better: Vec<String>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Exit with status 1 when any case regressed
    #[arg(long = "fail-on-regression")]
    pub fail_on_regression: bool,
}

impl CompareArgs {
    /// Load the config file (or defaults) and apply flag overrides
    pub fn comparison_config(&self) -> Result<ComparisonConfig> {
        let mut config = match &self.config {
            Some(path) => ComparisonConfig::from_file(path)?,
            None => ComparisonConfig::default(),
        };

        if let Some(test) = self.test {
            config.test = test;
        }
        if let Some(alpha) = self.alpha {
            config.alpha = alpha;
        }
        if let Some(level) = self.confidence_level {
            config.confidence_level = level;
        }
        if let Some(threshold) = self.threshold {
            config.regression_threshold = threshold;
        }
        if let Some(correction) = self.correction {
            config.correction = correction;
        }
        if let Some(iterations) = self.iterations {
            config.bootstrap_iterations = iterations;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.require_significance {
            config.require_significance = true;
        }
        for metric in &self.lower_is_better {
            if !config.is_lower_better(metric) {
                config.lower_is_better.push(metric.clone());
            }
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Score file (JSON)
    pub scores: PathBuf,

    /// Confidence level of the mean intervals
    #[arg(long = "confidence-level", value_name = "LEVEL", default_value = "0.95")]
    pub confidence_level: f64,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}
