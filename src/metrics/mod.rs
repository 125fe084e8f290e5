// Classifier performance measures
//
// Everything here is a pure function of label (or score) sequences.
// The confusion matrix is the shared building block: accuracy, Cohen's
// kappa and macro-F1 are all derived from its diagonal and marginals.
//
// Degenerate inputs (empty rows/columns, classes never seen) collapse to
// 0 instead of producing NaN, so reports built on top stay total.

mod confusion;
mod divergence;
mod loss;
mod roc;
mod scores;

pub use confusion::{confusion_matrix, confusion_matrix_normalized, ConfusionMatrix, Normalize};
pub use divergence::kl_divergence;
pub use loss::{binary_cross_entropy_loss, zero_one_loss};
pub use roc::{roc_auc, roc_curve, RocPoint};
pub use scores::{accuracy, cohen_kappa, f1_per_class, macro_f1_measure};

use crate::error::{EvalError, Result};
use serde::Serialize;

/// All scalar scores for one pair of label sequences
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub n_samples: u64,
    pub n_classes: usize,
    pub accuracy: f64,
    pub cohen_kappa: f64,
    pub macro_f1: f64,
    pub f1_per_class: Vec<f64>,
}

/// Compute accuracy, kappa and F1 from a single confusion matrix
pub fn score_report(y_true: &[i64], y_pred: &[i64], n_classes: Option<usize>) -> Result<ScoreReport> {
    let c = confusion_matrix(y_true, y_pred, n_classes)?;
    if c.total() == 0 {
        return Err(EvalError::input("scores require at least one sample"));
    }
    Ok(ScoreReport {
        n_samples: c.total(),
        n_classes: c.n_classes(),
        accuracy: scores::accuracy_from_matrix(&c),
        cohen_kappa: scores::kappa_from_matrix(&c),
        macro_f1: scores::macro_f1_from_matrix(&c),
        f1_per_class: f1_per_class(&c),
    })
}
