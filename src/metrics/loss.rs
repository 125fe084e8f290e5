//! Loss functions over label and probability sequences

use super::scores::accuracy;
use crate::error::{check_consistent_length, check_finite, EvalError, Result};

/// Probabilities are clipped to `[EPS, 1 - EPS]` before taking logarithms
const EPS: f64 = 1e-15;

/// Fraction of misclassified samples, `1 - accuracy`
pub fn zero_one_loss(y_true: &[i64], y_pred: &[i64]) -> Result<f64> {
    Ok(1.0 - accuracy(y_true, y_pred)?)
}

/// Mean binary cross-entropy of predicted probabilities against `{0, 1}` labels
///
/// # Example
/// ```
/// use e2ml::metrics::binary_cross_entropy_loss;
///
/// let loss = binary_cross_entropy_loss(&[1, 0], &[0.5, 0.5]).unwrap();
/// assert!((loss - std::f64::consts::LN_2).abs() < 1e-12);
/// ```
pub fn binary_cross_entropy_loss(y_true: &[i64], y_proba: &[f64]) -> Result<f64> {
    check_consistent_length(y_true.len(), y_proba.len(), "y_true and y_proba")?;
    if y_true.is_empty() {
        return Err(EvalError::input("binary cross-entropy requires at least one sample"));
    }
    if let Some(&bad) = y_true.iter().find(|&&y| y != 0 && y != 1) {
        return Err(EvalError::input(format!(
            "invalid value in `y_true`: {bad}. Expected values in the set {{0, 1}}"
        )));
    }
    check_finite(y_proba, "y_proba")?;
    if let Some(&bad) = y_proba.iter().find(|&&p| !(0.0..=1.0).contains(&p)) {
        return Err(EvalError::input(format!(
            "invalid value in `y_proba`: {bad}. Expected probabilities in [0, 1]"
        )));
    }

    let total: f64 = y_true
        .iter()
        .zip(y_proba)
        .map(|(&y, &p)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            if y == 1 {
                -p.ln()
            } else {
                -(1.0 - p).ln()
            }
        })
        .sum();
    Ok(total / y_true.len() as f64)
}
