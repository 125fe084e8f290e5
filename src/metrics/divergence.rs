//! Kullback-Leibler divergence between discrete distributions

use crate::error::{check_consistent_length, check_finite, EvalError, Result};

const SUM_TOLERANCE: f64 = 1e-6;

/// `KL(p || q) = sum p_i ln(p_i / q_i)` in nats
///
/// Terms with `p_i = 0` contribute nothing. A `q_i = 0` where `p_i > 0`
/// makes the divergence infinite.
pub fn kl_divergence(p: &[f64], q: &[f64]) -> Result<f64> {
    check_consistent_length(p.len(), q.len(), "p and q")?;
    if p.is_empty() {
        return Err(EvalError::input("distributions must not be empty"));
    }
    check_distribution(p, "p")?;
    check_distribution(q, "q")?;

    Ok(p.iter()
        .zip(q)
        .map(|(&pi, &qi)| match (pi, qi) {
            (pi, _) if pi == 0.0 => 0.0,
            (_, qi) if qi == 0.0 => f64::INFINITY,
            (pi, qi) => pi * (pi / qi).ln(),
        })
        .sum())
}

fn check_distribution(values: &[f64], name: &str) -> Result<()> {
    check_finite(values, name)?;
    if values.iter().any(|&v| v < 0.0) {
        return Err(EvalError::input(format!("`{name}` has negative entries")));
    }
    let sum: f64 = values.iter().sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(EvalError::input(format!(
            "`{name}` must sum to 1, got {sum}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_distributions() {
        let p = [0.2, 0.3, 0.5];
        assert!(kl_divergence(&p, &p).unwrap().abs() < 1e-15);
    }

    #[test]
    fn test_known_value() {
        // KL([0.5, 0.5] || [0.25, 0.75]) = 0.5 ln 2 + 0.5 ln(2/3)
        let expected = 0.5 * 2.0f64.ln() + 0.5 * (2.0f64 / 3.0).ln();
        let kl = kl_divergence(&[0.5, 0.5], &[0.25, 0.75]).unwrap();
        assert!((kl - expected).abs() < 1e-12);
    }

    #[test]
    fn test_zero_support() {
        assert_eq!(kl_divergence(&[0.0, 1.0], &[0.5, 0.5]).unwrap(), 2.0f64.ln());
        assert_eq!(
            kl_divergence(&[0.5, 0.5], &[1.0, 0.0]).unwrap(),
            f64::INFINITY
        );
    }

    #[test]
    fn test_validation() {
        assert!(kl_divergence(&[0.5, 0.6], &[0.5, 0.5]).is_err());
        assert!(kl_divergence(&[1.5, -0.5], &[0.5, 0.5]).is_err());
        assert!(kl_divergence(&[1.0], &[0.5, 0.5]).is_err());
    }
}
