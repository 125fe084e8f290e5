//! CLI argument parsing for e2ml

use crate::hypothesis::TestType;
use crate::metrics::Normalize;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

/// Comma-separated list of values, e.g. `1,0,2` or `0.5,-1.25`
#[derive(Debug, Clone, PartialEq)]
pub struct List<T>(pub Vec<T>);

impl<T: FromStr> FromStr for List<T>
where
    T::Err: std::fmt::Display,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_list(s).map(List)
    }
}

/// Parse a comma-separated list; surrounding whitespace is ignored
///
/// An empty (or all-whitespace) string is the empty list. Empty items
/// such as in `1,,2` are rejected.
pub fn parse_list<T: FromStr>(s: &str) -> Result<Vec<T>, String>
where
    T::Err: std::fmt::Display,
{
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(',')
        .enumerate()
        .map(|(pos, item)| {
            let item = item.trim();
            if item.is_empty() {
                return Err(format!("empty item at position {pos}"));
            }
            item.parse::<T>()
                .map_err(|e| format!("invalid item '{item}' at position {pos}: {e}"))
        })
        .collect()
}

#[derive(Parser, Debug)]
#[command(name = "e2ml")]
#[command(version)]
#[command(about = "Classifier evaluation metrics and hypothesis tests", long_about = None)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Load evaluation settings (significance level, Wilcoxon exact policy) from a TOML file
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Pair of true and predicted class labels
#[derive(Args, Debug, Clone)]
pub struct LabelArgs {
    /// True class labels, comma-separated
    #[arg(long = "y-true", value_name = "LABELS", allow_hyphen_values = true)]
    pub y_true: List<i64>,

    /// Predicted class labels, comma-separated
    #[arg(long = "y-pred", value_name = "LABELS", allow_hyphen_values = true)]
    pub y_pred: List<i64>,

    /// Number of classes (default: largest label + 1)
    #[arg(long = "n-classes", value_name = "N")]
    pub n_classes: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Confusion matrix of true vs. predicted labels
    Confusion {
        #[command(flatten)]
        labels: LabelArgs,

        /// Normalization: none, true (rows), pred (columns) or all
        #[arg(long = "normalize", default_value = "none")]
        normalize: Normalize,
    },

    /// Accuracy, Cohen's kappa and macro-F1
    Scores {
        #[command(flatten)]
        labels: LabelArgs,
    },

    /// One-sample z-test with known standard deviation
    ZTest {
        /// Observations, comma-separated
        #[arg(long = "sample", allow_hyphen_values = true)]
        sample: List<f64>,

        /// Mean under the null hypothesis
        #[arg(long = "mu0", default_value = "0.0", allow_hyphen_values = true)]
        mu0: f64,

        /// Known population standard deviation
        #[arg(long = "sigma")]
        sigma: f64,

        /// two-sided, left-tail or right-tail
        #[arg(long = "test-type", default_value = "two-sided")]
        test_type: TestType,
    },

    /// One-sample t-test
    TTest {
        /// Observations, comma-separated
        #[arg(long = "sample", allow_hyphen_values = true)]
        sample: List<f64>,

        /// Mean under the null hypothesis
        #[arg(long = "mu0", default_value = "0.0", allow_hyphen_values = true)]
        mu0: f64,

        /// two-sided, left-tail or right-tail
        #[arg(long = "test-type", default_value = "two-sided")]
        test_type: TestType,
    },

    /// Paired t-test on sample1 - sample2
    PairedT {
        /// First sample (or the differences when --sample2 is omitted)
        #[arg(long = "sample1", allow_hyphen_values = true)]
        sample1: List<f64>,

        /// Second sample, paired element-wise with the first
        #[arg(long = "sample2", allow_hyphen_values = true)]
        sample2: Option<List<f64>>,

        /// Mean difference under the null hypothesis
        #[arg(long = "mu0", default_value = "0.0", allow_hyphen_values = true)]
        mu0: f64,

        /// two-sided, left-tail or right-tail
        #[arg(long = "test-type", default_value = "two-sided")]
        test_type: TestType,
    },

    /// Wilcoxon signed-rank test on sample1 - sample2
    Wilcoxon {
        /// First sample (or the differences when --sample2 is omitted)
        #[arg(long = "sample1", allow_hyphen_values = true)]
        sample1: List<f64>,

        /// Second sample, paired element-wise with the first
        #[arg(long = "sample2", allow_hyphen_values = true)]
        sample2: Option<List<f64>>,

        /// two-sided, left-tail or right-tail
        #[arg(long = "test-type", default_value = "two-sided")]
        test_type: TestType,
    },

    /// McNemar's test comparing two classifiers
    Mcnemar {
        /// True class labels, comma-separated
        #[arg(long = "y-true", value_name = "LABELS", allow_hyphen_values = true)]
        y_true: List<i64>,

        /// Predictions of the first classifier
        #[arg(long = "y-pred1", value_name = "LABELS", allow_hyphen_values = true)]
        y_pred_1: List<i64>,

        /// Predictions of the second classifier
        #[arg(long = "y-pred2", value_name = "LABELS", allow_hyphen_values = true)]
        y_pred_2: List<i64>,
    },

    /// (Stratified) k-fold index split
    Kfold {
        /// Number of samples to split
        #[arg(long = "n-samples", value_name = "N")]
        n_samples: usize,

        /// Number of folds (at least 2)
        #[arg(long = "n-folds", value_name = "K", default_value = "5")]
        n_folds: usize,

        /// Seed for shuffling the indices (no shuffling when omitted)
        #[arg(long = "seed")]
        seed: Option<u64>,

        /// Class labels for a stratified split, comma-separated
        #[arg(long = "y", value_name = "LABELS", allow_hyphen_values = true)]
        y: Option<List<i64>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list::<f64>("1, -2.5,3").unwrap(), vec![1.0, -2.5, 3.0]);
        assert_eq!(parse_list::<i64>("").unwrap(), Vec::<i64>::new());
        assert!(parse_list::<i64>("1,,2").is_err());
        assert!(parse_list::<i64>("1,a").unwrap_err().contains("position 1"));
    }

    #[test]
    fn test_cli_confusion() {
        let cli = Cli::parse_from([
            "e2ml", "confusion", "--y-true", "0,1,1", "--y-pred", "0,1,0", "--normalize", "true",
        ]);
        match cli.command {
            Command::Confusion { labels, normalize } => {
                assert_eq!(labels.y_true.0, vec![0, 1, 1]);
                assert_eq!(labels.y_pred.0, vec![0, 1, 0]);
                assert!(labels.n_classes.is_none());
                assert_eq!(normalize, Normalize::True);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "e2ml", "t-test", "--sample", "1,2,3", "--format", "json", "--debug",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.debug);
    }

    #[test]
    fn test_cli_negative_values() {
        let cli = Cli::parse_from([
            "e2ml", "z-test", "--sample", "-1,0.5", "--mu0", "-0.5", "--sigma", "2",
            "--test-type", "left-tail",
        ]);
        match cli.command {
            Command::ZTest { sample, mu0, sigma, test_type } => {
                assert_eq!(sample.0, vec![-1.0, 0.5]);
                assert_eq!(mu0, -0.5);
                assert_eq!(sigma, 2.0);
                assert_eq!(test_type, TestType::LeftTail);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_test_type() {
        let result = Cli::try_parse_from([
            "e2ml", "t-test", "--sample", "1,2", "--test-type", "greater",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_kfold_defaults() {
        let cli = Cli::parse_from(["e2ml", "kfold", "--n-samples", "10"]);
        match cli.command {
            Command::Kfold { n_samples, n_folds, seed, y } => {
                assert_eq!(n_samples, 10);
                assert_eq!(n_folds, 5);
                assert!(seed.is_none());
                assert!(y.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
