//! evalcompare - statistical comparison of evaluation runs
//!
//! This library compares the scores of a candidate agent run against a
//! baseline run: hypothesis tests, effect sizes, bootstrap intervals and
//! multiple-comparison correction, folded into a per-case regression report.
//!
//! # Example
//! ```
//! use evalcompare::regression::{compare_runs, ComparisonConfig};
//! use evalcompare::scores::RunScores;
//!
//! let mut baseline = RunScores::new("baseline");
//! baseline.insert("accuracy", "case-1", vec![0.80, 0.82, 0.79]);
//! let mut candidate = RunScores::new("candidate");
//! candidate.insert("accuracy", "case-1", vec![0.81, 0.80, 0.80]);
//!
//! let report = compare_runs(&baseline, &candidate, &ComparisonConfig::default()).unwrap();
//! assert!(report.passed);
//! ```

pub mod cli;
pub mod error;
pub mod json_output;
pub mod regression;
pub mod scores;
pub mod stats;

pub use error::{Result, StatsError};
