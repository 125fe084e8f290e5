//! McNemar's test for comparing two classifiers on the same samples

use super::TestResult;
use crate::error::{check_consistent_length, EvalError, Result};
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// 2x2 contingency of per-sample correctness for two classifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisagreementCounts {
    pub both_correct: u64,
    pub only_first_correct: u64,
    pub only_second_correct: u64,
    pub both_wrong: u64,
}

impl DisagreementCounts {
    pub fn new(y_true: &[i64], y_pred_1: &[i64], y_pred_2: &[i64]) -> Result<Self> {
        check_consistent_length(y_true.len(), y_pred_1.len(), "y_true and y_pred_1")?;
        check_consistent_length(y_true.len(), y_pred_2.len(), "y_true and y_pred_2")?;

        let mut counts = Self {
            both_correct: 0,
            only_first_correct: 0,
            only_second_correct: 0,
            both_wrong: 0,
        };
        for ((t, p1), p2) in y_true.iter().zip(y_pred_1).zip(y_pred_2) {
            match (p1 == t, p2 == t) {
                (true, true) => counts.both_correct += 1,
                (true, false) => counts.only_first_correct += 1,
                (false, true) => counts.only_second_correct += 1,
                (false, false) => counts.both_wrong += 1,
            }
        }
        Ok(counts)
    }

    /// McNemar statistic with continuity correction, `(|b - c| - 1)² / (b + c)`
    ///
    /// Zero when the classifiers never disagree on correctness.
    pub fn statistic(&self) -> f64 {
        let b = self.only_second_correct as f64;
        let c = self.only_first_correct as f64;
        if b + c == 0.0 {
            return 0.0;
        }
        ((b - c).abs() - 1.0).powi(2) / (b + c)
    }
}

/// McNemar's test: do two classifiers have the same error rate?
///
/// The p-value is the upper tail of chi² with one degree of freedom.
pub fn mc_nemar_test(y_true: &[i64], y_pred_1: &[i64], y_pred_2: &[i64]) -> Result<TestResult> {
    let counts = DisagreementCounts::new(y_true, y_pred_1, y_pred_2)?;
    if counts.only_first_correct + counts.only_second_correct == 0 {
        tracing::debug!("mcnemar: classifiers never disagree");
        return Ok(TestResult::new(0.0, 1.0));
    }

    let chi = counts.statistic();
    let dist = ChiSquared::new(1.0).map_err(|e| EvalError::argument(e.to_string()))?;
    let p = 1.0 - dist.cdf(chi);

    tracing::trace!(?counts, chi, p, "mcnemar");
    Ok(TestResult::new(chi, p.clamp(0.0, 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let y_true = [0, 1, 1, 0, 1];
        let y_pred_1 = [0, 1, 0, 1, 1];
        let y_pred_2 = [0, 0, 1, 1, 1];
        let counts = DisagreementCounts::new(&y_true, &y_pred_1, &y_pred_2).unwrap();
        assert_eq!(counts.both_correct, 2);
        assert_eq!(counts.only_first_correct, 1);
        assert_eq!(counts.only_second_correct, 1);
        assert_eq!(counts.both_wrong, 1);
    }

    #[test]
    fn test_identical_classifiers() {
        let y = [0, 1, 1, 0];
        let result = mc_nemar_test(&y, &[0, 1, 0, 0], &[0, 1, 0, 0]).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_strongly_different_classifiers() {
        // First classifier always right, second wrong on 20 samples
        let y_true = vec![1i64; 20];
        let y_pred_1 = vec![1i64; 20];
        let y_pred_2 = vec![0i64; 20];
        let result = mc_nemar_test(&y_true, &y_pred_1, &y_pred_2).unwrap();
        // (20 - 1)^2 / 20 = 18.05
        assert!((result.statistic - 18.05).abs() < 1e-12);
        assert!(result.p_value < 1e-4);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(mc_nemar_test(&[0, 1], &[0], &[0, 1]).is_err());
        assert!(mc_nemar_test(&[0, 1], &[0, 1], &[1]).is_err());
    }
}
