//! One-sample z-test and t-test on the population mean

use super::{mean, normal_tails, sample_std, student_t_tails, TestResult, TestType};
use crate::error::{check_finite, EvalError, Result};

/// One-sample z-test with known population standard deviation `sigma`
///
/// `z = (mean(sample) - mu0) / (sigma / sqrt(n))`, tails from N(0, 1).
///
/// # Example
/// ```
/// use e2ml::hypothesis::{z_test_one_sample, TestType};
///
/// let result = z_test_one_sample(&[10.0, 12.0, 11.0, 13.0, 9.0], 10.0, 2.0, TestType::TwoSided).unwrap();
/// assert!((result.statistic - 1.118).abs() < 1e-3);
/// assert!((result.p_value - 0.2636).abs() < 1e-3);
/// ```
pub fn z_test_one_sample(
    sample: &[f64],
    mu0: f64,
    sigma: f64,
    test_type: TestType,
) -> Result<TestResult> {
    check_sample(sample, 1)?;
    check_mu0(mu0)?;
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(EvalError::argument(format!(
            "`sigma` must be a finite value > 0, got {sigma}"
        )));
    }

    let n = sample.len() as f64;
    let z = (mean(sample) - mu0) / (sigma / n.sqrt());
    let (p_left, p_right) = normal_tails(z)?;

    tracing::trace!(n = sample.len(), z, p_left, "z-test");
    Ok(TestResult::new(z, test_type.p_value(p_left, p_right)))
}

/// One-sample t-test with unknown population standard deviation
///
/// Uses the bias-corrected sample standard deviation and `n - 1` degrees
/// of freedom. A sample with zero variance yields `t = 0` if its mean equals
/// `mu0` and `t = ±inf` otherwise.
pub fn t_test_one_sample(sample: &[f64], mu0: f64, test_type: TestType) -> Result<TestResult> {
    check_sample(sample, 2)?;
    check_mu0(mu0)?;

    let n = sample.len() as f64;
    let nu = n - 1.0;
    let shift = mean(sample) - mu0;
    let s = sample_std(sample);

    let t = if s == 0.0 {
        tracing::debug!("t-test: sample has zero variance");
        if shift == 0.0 {
            0.0
        } else {
            shift.signum() * f64::INFINITY
        }
    } else {
        shift / (s / n.sqrt())
    };
    let (p_left, p_right) = student_t_tails(t, nu)?;

    tracing::trace!(n = sample.len(), t, nu, p_left, "t-test");
    Ok(TestResult::new(t, test_type.p_value(p_left, p_right)))
}

fn check_sample(sample: &[f64], min_len: usize) -> Result<()> {
    if sample.len() < min_len {
        return Err(EvalError::input(format!(
            "need at least {min_len} observation(s), got {}",
            sample.len()
        )));
    }
    check_finite(sample, "sample")
}

fn check_mu0(mu0: f64) -> Result<()> {
    if !mu0.is_finite() {
        return Err(EvalError::argument(format!("`mu0` must be finite, got {mu0}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [f64; 5] = [10.0, 12.0, 11.0, 13.0, 9.0];

    #[test]
    fn test_z_test_two_sided() {
        let result = z_test_one_sample(&SAMPLE, 10.0, 2.0, TestType::TwoSided).unwrap();
        assert!((result.statistic - 1.118_033_988_749_895).abs() < 1e-12);
        assert!((result.p_value - 0.263_552_477).abs() < 1e-6);
    }

    #[test]
    fn test_z_test_tails_sum_to_one() {
        let left = z_test_one_sample(&SAMPLE, 10.0, 2.0, TestType::LeftTail).unwrap();
        let right = z_test_one_sample(&SAMPLE, 10.0, 2.0, TestType::RightTail).unwrap();
        let two = z_test_one_sample(&SAMPLE, 10.0, 2.0, TestType::TwoSided).unwrap();

        assert!((left.p_value + right.p_value - 1.0).abs() < 1e-12);
        assert!((two.p_value - 2.0 * left.p_value.min(right.p_value)).abs() < 1e-12);
        assert!(left.p_value > right.p_value);
    }

    #[test]
    fn test_z_test_rejects_non_positive_sigma() {
        for sigma in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                z_test_one_sample(&SAMPLE, 10.0, sigma, TestType::TwoSided),
                Err(EvalError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_z_test_rejects_bad_input() {
        assert!(matches!(
            z_test_one_sample(&[], 0.0, 1.0, TestType::TwoSided),
            Err(EvalError::InvalidInput(_))
        ));
        assert!(matches!(
            z_test_one_sample(&[1.0], f64::NAN, 1.0, TestType::TwoSided),
            Err(EvalError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_t_test_known_value() {
        // mean 11, s = sqrt(2.5), t = 1 / (sqrt(2.5) / sqrt(5)) = sqrt(2)
        let result = t_test_one_sample(&SAMPLE, 10.0, TestType::TwoSided).unwrap();
        assert!((result.statistic - 2.0f64.sqrt()).abs() < 1e-12);
        assert!(result.p_value > 0.2 && result.p_value < 0.3);
    }

    #[test]
    fn test_t_test_heavier_tails_than_z() {
        // Same statistic magnitude: Student-t p-value exceeds the normal one
        let t = t_test_one_sample(&SAMPLE, 10.0, TestType::TwoSided).unwrap();
        let z = z_test_one_sample(&SAMPLE, 10.0, 2.5f64.sqrt(), TestType::TwoSided).unwrap();
        assert!((t.statistic - z.statistic).abs() < 1e-12);
        assert!(t.p_value > z.p_value);
    }

    #[test]
    fn test_t_test_zero_variance() {
        let equal = t_test_one_sample(&[3.0, 3.0, 3.0], 3.0, TestType::TwoSided).unwrap();
        assert_eq!(equal.statistic, 0.0);
        assert_eq!(equal.p_value, 1.0);

        let shifted = t_test_one_sample(&[3.0, 3.0, 3.0], 1.0, TestType::RightTail).unwrap();
        assert_eq!(shifted.statistic, f64::INFINITY);
        assert_eq!(shifted.p_value, 0.0);
    }

    #[test]
    fn test_t_test_requires_two_observations() {
        assert!(matches!(
            t_test_one_sample(&[1.0], 0.0, TestType::TwoSided),
            Err(EvalError::InvalidInput(_))
        ));
    }
}
