//! Scalar performance measures derived from the confusion matrix

use super::confusion::{confusion_matrix, ConfusionMatrix};
use crate::error::{EvalError, Result};

/// Fraction of correctly classified samples, in `[0, 1]`
///
/// # Example
/// ```
/// use e2ml::metrics::accuracy;
///
/// assert_eq!(accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]).unwrap(), 0.75);
/// ```
pub fn accuracy(y_true: &[i64], y_pred: &[i64]) -> Result<f64> {
    let c = confusion_matrix(y_true, y_pred, None)?;
    Ok(accuracy_from_matrix(&c))
}

pub(crate) fn accuracy_from_matrix(c: &ConfusionMatrix) -> f64 {
    c.trace() as f64 / c.total() as f64
}

/// Cohen's kappa: chance-corrected agreement between true and predicted labels
///
/// `kappa = 1 - sum(w * C) / sum(w * E)` where `w` is 1 off the diagonal and
/// 0 on it, and `E` is the outer product of the column and row marginals
/// divided by the total count. When the expected disagreement is zero every
/// sample falls in one diagonal cell, so the result is 1.
pub fn cohen_kappa(y_true: &[i64], y_pred: &[i64], n_classes: Option<usize>) -> Result<f64> {
    let c = confusion_matrix(y_true, y_pred, n_classes)?;
    if c.total() == 0 {
        return Err(EvalError::input("Cohen's kappa requires at least one sample"));
    }
    Ok(kappa_from_matrix(&c))
}

pub(crate) fn kappa_from_matrix(c: &ConfusionMatrix) -> f64 {
    let k = c.n_classes();
    let total = c.total() as f64;
    let col_sums: Vec<f64> = (0..k).map(|j| c.col_sum(j) as f64).collect();
    let row_sums: Vec<f64> = (0..k).map(|i| c.row_sum(i) as f64).collect();

    let mut observed = 0.0;
    let mut expected = 0.0;
    for i in 0..k {
        for j in 0..k {
            if i == j {
                continue;
            }
            observed += c.get(i, j) as f64;
            expected += col_sums[i] * row_sums[j] / total;
        }
    }

    if expected == 0.0 {
        tracing::debug!("kappa: zero expected disagreement, returning 1.0");
        return 1.0;
    }
    1.0 - observed / expected
}

/// Macro-averaged F1 measure, in `[0, 1]`
///
/// Per class `F1 = 2 TP / (row_sum + col_sum)`. A class with no true and no
/// predicted samples contributes 0.0 rather than NaN.
pub fn macro_f1_measure(y_true: &[i64], y_pred: &[i64], n_classes: Option<usize>) -> Result<f64> {
    let c = confusion_matrix(y_true, y_pred, n_classes)?;
    Ok(macro_f1_from_matrix(&c))
}

pub(crate) fn macro_f1_from_matrix(c: &ConfusionMatrix) -> f64 {
    let scores = f1_per_class(c);
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Per-class F1 scores, with the same zero fallback as `macro_f1_measure`
pub fn f1_per_class(c: &ConfusionMatrix) -> Vec<f64> {
    (0..c.n_classes())
        .map(|i| {
            let support = c.row_sum(i) + c.col_sum(i);
            if support == 0 {
                0.0
            } else {
                2.0 * c.get(i, i) as f64 / support as f64
            }
        })
        .collect()
}
