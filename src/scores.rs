//! Per-run score files
//!
//! A run holds, for every metric, one entry per test case. An entry is either a
//! single score or the scores of repeated trials:
//!
//! ```json
//! { "id": "run-42", "agent_version": "1.3.0",
//!   "scores": { "accuracy": { "case-1": 0.91, "case-2": [0.9, 0.93] } } }
//! ```
//!
//! Maps are ordered so every report built from a run is deterministic.

use crate::stats::{calculate_metric_summary, MetricSummary};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Scores recorded for one case of one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CaseScores {
    Single(f64),
    Trials(Vec<f64>),
}

impl CaseScores {
    pub fn values(&self) -> &[f64] {
        match self {
            CaseScores::Single(value) => std::slice::from_ref(value),
            CaseScores::Trials(values) => values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

impl From<f64> for CaseScores {
    fn from(value: f64) -> Self {
        CaseScores::Single(value)
    }
}

impl From<Vec<f64>> for CaseScores {
    fn from(values: Vec<f64>) -> Self {
        CaseScores::Trials(values)
    }
}

impl From<&[f64]> for CaseScores {
    fn from(values: &[f64]) -> Self {
        CaseScores::Trials(values.to_vec())
    }
}

/// Identifier of a run as it appears in reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_version: Option<String>,
}

impl std::fmt::Display for RunRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.agent_version {
            Some(version) => write!(f, "{} (agent {})", self.id, version),
            None => f.write_str(&self.id),
        }
    }
}

/// All scores of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunScores {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_version: Option<String>,
    /// metric -> case -> scores
    #[serde(default)]
    pub scores: BTreeMap<String, BTreeMap<String, CaseScores>>,
}

impl RunScores {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            agent_version: None,
            scores: BTreeMap::new(),
        }
    }

    pub fn with_agent_version(mut self, version: impl Into<String>) -> Self {
        self.agent_version = Some(version.into());
        self
    }

    /// Record the scores of `case` for `metric`, replacing any previous entry
    pub fn insert(
        &mut self,
        metric: impl Into<String>,
        case: impl Into<String>,
        scores: impl Into<CaseScores>,
    ) -> &mut Self {
        self.scores
            .entry(metric.into())
            .or_default()
            .insert(case.into(), scores.into());
        self
    }

    /// Load a run from a JSON score file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read score file {}", path.display()))?;

        Self::from_json_str(&content)
            .with_context(|| format!("Invalid score file {}", path.display()))
    }

    /// Parse and validate a run from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let run: Self = serde_json::from_str(content).context("Failed to parse JSON")?;
        run.validate()?;
        Ok(run)
    }

    /// Reject runs with an empty id or non-finite scores
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            bail!("run id must not be empty");
        }

        for (metric, cases) in &self.scores {
            for (case, scores) in cases {
                if let Some(bad) = scores.values().iter().find(|v| !v.is_finite()) {
                    bail!("non-finite score {} for metric '{}', case '{}'", bad, metric, case);
                }
            }
        }

        Ok(())
    }

    pub fn run_ref(&self) -> RunRef {
        RunRef {
            id: self.id.clone(),
            agent_version: self.agent_version.clone(),
        }
    }

    /// Metric names in sorted order
    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }

    pub fn cases(&self, metric: &str) -> Option<&BTreeMap<String, CaseScores>> {
        self.scores.get(metric)
    }

    /// Every score of `metric`, pooled across cases in case order
    pub fn metric_values(&self, metric: &str) -> Vec<f64> {
        self.scores
            .get(metric)
            .map(|cases| {
                cases
                    .values()
                    .flat_map(|scores| scores.values().iter().copied())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Descriptive summary of every metric, all case scores pooled
    pub fn summarize(&self, confidence_level: f64) -> crate::error::Result<Vec<MetricSummary>> {
        self.metrics()
            .map(|metric| {
                calculate_metric_summary(metric, &self.metric_values(metric), confidence_level)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "run-42",
        "agent_version": "1.3.0",
        "scores": {
            "accuracy": { "case-2": [0.9, 0.93], "case-1": 0.91 },
            "latency_ms": { "case-1": 120 }
        }
    }"#;

    #[test]
    fn test_parse_single_and_trials() {
        let run = RunScores::from_json_str(SAMPLE).unwrap();
        assert_eq!(run.id, "run-42");
        assert_eq!(run.agent_version.as_deref(), Some("1.3.0"));

        let accuracy = run.cases("accuracy").unwrap();
        assert_eq!(accuracy["case-1"], CaseScores::Single(0.91));
        assert_eq!(accuracy["case-2"].values(), &[0.9, 0.93]);
        // integers are accepted as scores
        assert_eq!(run.cases("latency_ms").unwrap()["case-1"].values(), &[120.0]);
    }

    #[test]
    fn test_sorted_iteration() {
        let run = RunScores::from_json_str(SAMPLE).unwrap();
        let metrics: Vec<&str> = run.metrics().collect();
        assert_eq!(metrics, vec!["accuracy", "latency_ms"]);
        // case-1 before case-2 regardless of file order
        assert_eq!(run.metric_values("accuracy"), vec![0.91, 0.9, 0.93]);
        assert!(run.metric_values("missing").is_empty());
    }

    #[test]
    fn test_optional_fields() {
        let run = RunScores::from_json_str(r#"{"id": "r1"}"#).unwrap();
        assert!(run.agent_version.is_none());
        assert!(run.scores.is_empty());

        let json = serde_json::to_string(&run).unwrap();
        assert!(!json.contains("agent_version"));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(RunScores::from_json_str("not json").is_err());
        assert!(RunScores::from_json_str(r#"{"id": ""}"#).is_err());
        let text_score = r#"{"id": "r", "scores": {"m": {"c": "high"}}}"#;
        assert!(RunScores::from_json_str(text_score).is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut run = RunScores::new("r1");
        run.insert("accuracy", "case-1", vec![0.5, f64::NAN]);
        let err = run.validate().unwrap_err();
        assert!(err.to_string().contains("case-1"));
    }

    #[test]
    fn test_builder() {
        let mut run = RunScores::new("r1").with_agent_version("2.0");
        run.insert("accuracy", "a", 0.5).insert("accuracy", "b", &[0.6, 0.7][..]);
        assert_eq!(run.metric_values("accuracy"), vec![0.5, 0.6, 0.7]);
        assert_eq!(run.run_ref().to_string(), "r1 (agent 2.0)");
    }

    #[test]
    fn test_summarize() {
        let run = RunScores::from_json_str(SAMPLE).unwrap();
        let summaries = run.summarize(0.95).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "accuracy");
        assert_eq!(summaries[0].count, 3);
        assert_eq!(summaries[1].name, "latency_ms");
        assert_eq!(summaries[1].mean, 120.0);

        assert!(run.summarize(1.5).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(RunScores::from_file(&path).unwrap().id, "run-42");

        let err = RunScores::from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read score file"));
    }
}
