//! Text and JSON rendering of command results
//!
//! Every command produces one `Report`. JSON output wraps it in a versioned
//! envelope so downstream tools can detect format changes.

use crate::cross_validation::Folds;
use crate::hypothesis::{DisagreementCounts, TestResult, TestType};
use crate::metrics::{Normalize, ScoreReport};
use serde::Serialize;
use std::fmt::{self, Write};

/// Format tag written into every JSON document
pub const JSON_FORMAT: &str = "e2ml-json-v1";

/// Confusion matrix as printed by the `confusion` command
#[derive(Debug, Clone, Serialize)]
pub struct ConfusionReport {
    pub normalize: Normalize,
    pub n_classes: usize,
    /// Rows are true classes, columns predicted classes
    pub matrix: Vec<Vec<f64>>,
}

/// Outcome of a p-value based hypothesis test
#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    pub test: String,
    pub test_type: TestType,
    pub n: usize,
    pub statistic: f64,
    pub p_value: f64,
    pub significance_level: f64,
    pub significant: bool,
    /// Disagreement table, only for McNemar's test
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<DisagreementCounts>,
}

impl TestReport {
    pub fn new(
        test: impl Into<String>,
        test_type: TestType,
        n: usize,
        result: TestResult,
        significance_level: f64,
    ) -> Self {
        Self {
            test: test.into(),
            test_type,
            n,
            statistic: result.statistic,
            p_value: result.p_value,
            significance_level,
            significant: result.is_significant(significance_level),
            counts: None,
        }
    }

    pub fn with_counts(mut self, counts: DisagreementCounts) -> Self {
        self.counts = Some(counts);
        self
    }
}

/// Result of any command
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Report {
    Confusion(ConfusionReport),
    Scores(ScoreReport),
    Test(TestReport),
    Folds(Folds),
}

#[derive(Serialize)]
struct JsonEnvelope<'a> {
    format: &'static str,
    version: &'static str,
    result: &'a Report,
}

impl Report {
    /// Serialize to a pretty-printed JSON document
    pub fn to_json(&self) -> anyhow::Result<String> {
        let envelope = JsonEnvelope {
            format: JSON_FORMAT,
            version: env!("CARGO_PKG_VERSION"),
            result: self,
        };
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    /// Human-readable rendering
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Confusion(report) => write_confusion(f, report),
            Report::Scores(report) => write_scores(f, report),
            Report::Test(report) => write_test(f, report),
            Report::Folds(folds) => write_folds(f, folds),
        }
    }
}

fn write_confusion(out: &mut impl Write, report: &ConfusionReport) -> fmt::Result {
    writeln!(
        out,
        "Confusion matrix ({} classes, normalize={})",
        report.n_classes, report.normalize
    )?;
    write!(out, "true\\pred")?;
    for j in 0..report.n_classes {
        write!(out, "{:>10}", j)?;
    }
    writeln!(out)?;
    for (i, row) in report.matrix.iter().enumerate() {
        write!(out, "{:>9}", i)?;
        for value in row {
            if report.normalize == Normalize::None {
                write!(out, "{:>10}", value)?;
            } else {
                write!(out, "{:>10.4}", value)?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_scores(out: &mut impl Write, report: &ScoreReport) -> fmt::Result {
    writeln!(out, "Samples:      {}", report.n_samples)?;
    writeln!(out, "Classes:      {}", report.n_classes)?;
    writeln!(out, "Accuracy:     {:.4}", report.accuracy)?;
    writeln!(out, "Cohen kappa:  {:.4}", report.cohen_kappa)?;
    writeln!(out, "Macro F1:     {:.4}", report.macro_f1)?;
    for (class, f1) in report.f1_per_class.iter().enumerate() {
        writeln!(out, "  F1[{}]:      {:.4}", class, f1)?;
    }
    Ok(())
}

fn write_test(out: &mut impl Write, report: &TestReport) -> fmt::Result {
    writeln!(out, "{} ({}, n = {})", report.test, report.test_type, report.n)?;
    writeln!(out, "  Statistic:  {:.6}", report.statistic)?;
    writeln!(out, "  p-value:    {:.6}", report.p_value)?;
    if let Some(counts) = &report.counts {
        writeln!(
            out,
            "  Counts:     both correct {}, only first {}, only second {}, both wrong {}",
            counts.both_correct,
            counts.only_first_correct,
            counts.only_second_correct,
            counts.both_wrong
        )?;
    }
    let verdict = if report.significant {
        "reject H0"
    } else {
        "retain H0"
    };
    writeln!(
        out,
        "  Decision:   {} at alpha = {}",
        verdict, report.significance_level
    )
}

fn write_folds(out: &mut impl Write, folds: &Folds) -> fmt::Result {
    for (i, (train, test)) in folds.iter().enumerate() {
        writeln!(out, "fold {}: test={:?} train={:?}", i, test, train)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_test_report() -> TestReport {
        TestReport::new(
            "z-test",
            TestType::TwoSided,
            5,
            TestResult::new(1.118, 0.2636),
            0.05,
        )
    }

    #[test]
    fn test_json_envelope() {
        let json = Report::Test(sample_test_report()).to_json().unwrap();
        assert!(json.contains("\"format\": \"e2ml-json-v1\""));
        assert!(json.contains("\"kind\": \"test\""));
        assert!(json.contains("\"test_type\": \"two-sided\""));
        assert!(json.contains("\"significant\": false"));
        // McNemar-only field is omitted
        assert!(!json.contains("counts"));
    }

    #[test]
    fn test_text_test_report() {
        let text = Report::Test(sample_test_report()).to_text();
        assert!(text.starts_with("z-test (two-sided, n = 5)"));
        assert!(text.contains("p-value:    0.263600"));
        assert!(text.contains("retain H0 at alpha = 0.05"));
    }

    #[test]
    fn test_text_confusion_counts() {
        let report = ConfusionReport {
            normalize: Normalize::None,
            n_classes: 2,
            matrix: vec![vec![2.0, 0.0], vec![1.0, 3.0]],
        };
        let text = Report::Confusion(report).to_text();
        assert!(text.contains("normalize=none"));
        let last = text.lines().last().unwrap();
        assert_eq!(last.split_whitespace().collect::<Vec<_>>(), ["1", "1", "3"]);
    }

    #[test]
    fn test_display_matches_text() {
        let report = Report::Test(sample_test_report());
        assert_eq!(format!("{report}"), report.to_text());
        assert!(report.to_text().ends_with("alpha = 0.05\n"));
    }

    #[test]
    fn test_text_folds() {
        let folds = Folds {
            train: vec![vec![1], vec![0]],
            test: vec![vec![0], vec![1]],
        };
        let text = Report::Folds(folds).to_text();
        assert_eq!(text, "fold 0: test=[0] train=[1]\nfold 1: test=[1] train=[0]\n");
    }
}
