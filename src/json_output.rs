//! JSON output format for comparison reports and run summaries
//!
//! `--format json` implementation. Both documents carry a format name and the
//! crate version ahead of their payload.

use crate::regression::RunComparisonReport;
use crate::scores::RunRef;
use crate::stats::MetricSummary;
use serde::{Deserialize, Serialize};

/// `evalcompare compare --format json` document
///
/// The report fields are inlined at the top level next to `version` and
/// `format`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonComparisonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    #[serde(flatten)]
    pub report: RunComparisonReport,
}

impl JsonComparisonOutput {
    pub fn new(report: RunComparisonReport) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "evalcompare-compare-v1".to_string(),
            report,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `evalcompare summary --format json` document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummaryOutput {
    pub version: String,
    pub format: String,
    pub run: RunRef,
    pub confidence_level: f64,
    /// One summary per metric, all case scores pooled
    pub metrics: Vec<MetricSummary>,
}

impl JsonSummaryOutput {
    pub fn new(run: RunRef, confidence_level: f64) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "evalcompare-summary-v1".to_string(),
            run,
            confidence_level,
            metrics: Vec::new(),
        }
    }

    pub fn add_metric(&mut self, summary: MetricSummary) {
        self.metrics.push(summary);
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
