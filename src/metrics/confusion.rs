//! Confusion matrix construction and normalization
//!
//! `C[i][j]` counts the samples whose true label is `i` and whose predicted
//! label is `j`. Labels must lie in `{0, ..., n_classes - 1}`.

use crate::error::{check_consistent_length, EvalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Normalization mode for a confusion matrix
///
/// Any row or column that sums to zero normalizes to all zeros rather
/// than NaN. Downstream reporting relies on the matrix always being finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalize {
    /// Raw counts
    #[default]
    None,
    /// Divide each row by its sum (over true conditions)
    True,
    /// Divide each column by its sum (over predicted conditions)
    Pred,
    /// Divide every entry by the grand total
    All,
}

impl FromStr for Normalize {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Normalize::None),
            "true" => Ok(Normalize::True),
            "pred" => Ok(Normalize::Pred),
            "all" => Ok(Normalize::All),
            other => Err(EvalError::argument(format!(
                "invalid value for `normalize`: {other}. Allowed values are: `none`, `true`, `pred`, `all`"
            ))),
        }
    }
}

impl fmt::Display for Normalize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Normalize::None => "none",
            Normalize::True => "true",
            Normalize::Pred => "pred",
            Normalize::All => "all",
        };
        f.write_str(name)
    }
}

/// Square matrix of label co-occurrence counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfusionMatrix {
    n_classes: usize,
    /// Row-major counts, `n_classes * n_classes` entries
    counts: Vec<u64>,
}

impl ConfusionMatrix {
    /// Build a matrix directly from rows of counts
    pub fn from_rows(rows: &[Vec<u64>]) -> Result<Self> {
        let n_classes = rows.len();
        if let Some(bad) = rows.iter().position(|r| r.len() != n_classes) {
            return Err(EvalError::input(format!(
                "confusion matrix must be square: row {bad} has {} entries, expected {n_classes}",
                rows[bad].len()
            )));
        }
        Ok(Self {
            n_classes,
            counts: rows.iter().flatten().copied().collect(),
        })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Count of samples with true label `i` predicted as `j`
    pub fn get(&self, i: usize, j: usize) -> u64 {
        self.counts[i * self.n_classes + j]
    }

    /// Number of samples whose true label is `i`
    pub fn row_sum(&self, i: usize) -> u64 {
        self.row(i).iter().sum()
    }

    /// Number of samples predicted as `j`
    pub fn col_sum(&self, j: usize) -> u64 {
        (0..self.n_classes).map(|i| self.get(i, j)).sum()
    }

    /// Total number of samples
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of correctly classified samples
    pub fn trace(&self) -> u64 {
        (0..self.n_classes).map(|i| self.get(i, i)).sum()
    }

    pub fn row(&self, i: usize) -> &[u64] {
        &self.counts[i * self.n_classes..(i + 1) * self.n_classes]
    }

    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        (0..self.n_classes).map(|i| self.row(i).to_vec()).collect()
    }

    /// Normalize the counts according to `mode`
    ///
    /// `Normalize::None` returns the raw counts as floats.
    pub fn normalized(&self, mode: Normalize) -> Vec<Vec<f64>> {
        let k = self.n_classes;
        let row_sums: Vec<u64> = (0..k).map(|i| self.row_sum(i)).collect();
        let col_sums: Vec<u64> = (0..k).map(|j| self.col_sum(j)).collect();
        let total = self.total();

        let mut collapsed = 0usize;
        let rows: Vec<Vec<f64>> = (0..k)
            .map(|i| {
                (0..k)
                    .map(|j| {
                        let value = self.get(i, j) as f64;
                        let denom = match mode {
                            Normalize::None => return value,
                            Normalize::True => row_sums[i],
                            Normalize::Pred => col_sums[j],
                            Normalize::All => total,
                        };
                        if denom == 0 {
                            collapsed += 1;
                            0.0
                        } else {
                            value / denom as f64
                        }
                    })
                    .collect()
            })
            .collect();

        if collapsed > 0 {
            tracing::debug!(
                mode = %mode,
                entries = collapsed,
                "zero-sum normalization collapsed entries to 0"
            );
        }
        rows
    }
}

/// Compute the confusion matrix of `y_true` against `y_pred`
///
/// If `n_classes` is `None` it is inferred as `max(y_true, y_pred) + 1`,
/// which requires at least one sample.
///
/// # Example
/// ```
/// use e2ml::metrics::confusion_matrix;
///
/// let c = confusion_matrix(&[0, 1, 1, 2], &[0, 1, 0, 2], None).unwrap();
/// assert_eq!(c.to_rows(), vec![vec![1, 0, 0], vec![1, 1, 0], vec![0, 0, 1]]);
/// ```
pub fn confusion_matrix(
    y_true: &[i64],
    y_pred: &[i64],
    n_classes: Option<usize>,
) -> Result<ConfusionMatrix> {
    check_consistent_length(y_true.len(), y_pred.len(), "y_true and y_pred")?;

    let n_classes = match n_classes {
        Some(0) => return Err(EvalError::argument("`n_classes` must be at least 1")),
        Some(n) => n,
        None => infer_n_classes(y_true, y_pred)?,
    };

    check_labels(y_true, n_classes, "y_true")?;
    check_labels(y_pred, n_classes, "y_pred")?;

    let mut counts = vec![0u64; n_classes * n_classes];
    for (&t, &p) in y_true.iter().zip(y_pred) {
        counts[t as usize * n_classes + p as usize] += 1;
    }

    Ok(ConfusionMatrix { n_classes, counts })
}

/// Compute a confusion matrix and normalize it in one step
pub fn confusion_matrix_normalized(
    y_true: &[i64],
    y_pred: &[i64],
    n_classes: Option<usize>,
    normalize: Normalize,
) -> Result<Vec<Vec<f64>>> {
    Ok(confusion_matrix(y_true, y_pred, n_classes)?.normalized(normalize))
}

fn infer_n_classes(y_true: &[i64], y_pred: &[i64]) -> Result<usize> {
    let max = y_true
        .iter()
        .chain(y_pred)
        .copied()
        .max()
        .ok_or_else(|| EvalError::input("cannot infer `n_classes` from empty label sequences"))?;
    if max < 0 {
        return Err(EvalError::input(format!(
            "invalid labels: all values are negative (max {max})"
        )));
    }
    Ok(max as usize + 1)
}

fn check_labels(labels: &[i64], n_classes: usize, name: &str) -> Result<()> {
    if let Some(&bad) = labels
        .iter()
        .find(|&&l| l < 0 || l as usize >= n_classes)
    {
        return Err(EvalError::input(format!(
            "invalid value in `{name}`: {bad}. Expected values in the set {{0, ..., {}}}",
            n_classes - 1
        )));
    }
    Ok(())
}
