//! Paired-sample tests built on element-wise differences

use super::{t_test_one_sample, TestResult, TestType};
use crate::error::{check_consistent_length, check_finite, Result};

/// Element-wise `sample1 - sample2`
///
/// Without `sample2`, `sample1` is taken to already hold the differences.
/// The inputs are never modified.
pub fn differences(sample1: &[f64], sample2: Option<&[f64]>) -> Result<Vec<f64>> {
    check_finite(sample1, "sample1")?;
    match sample2 {
        None => Ok(sample1.to_vec()),
        Some(sample2) => {
            check_consistent_length(sample1.len(), sample2.len(), "sample1 and sample2")?;
            check_finite(sample2, "sample2")?;
            Ok(sample1.iter().zip(sample2).map(|(a, b)| a - b).collect())
        }
    }
}

/// Paired t-test: a one-sample t-test on the differences against `mu0`
///
/// # Example
/// ```
/// use e2ml::hypothesis::{t_test_paired, TestType};
///
/// let result = t_test_paired(&[1.0, 2.0, 3.0, 4.0], Some(&[2.0, 2.0, 2.0, 2.0]), 0.0, TestType::TwoSided).unwrap();
/// assert!((result.statistic - 0.7746).abs() < 1e-4);
/// ```
pub fn t_test_paired(
    sample1: &[f64],
    sample2: Option<&[f64]>,
    mu0: f64,
    test_type: TestType,
) -> Result<TestResult> {
    let diff = differences(sample1, sample2)?;
    t_test_one_sample(&diff, mu0, test_type)
}
