//! Receiver operating characteristic analysis for a class of interest

use crate::error::{check_consistent_length, check_finite, EvalError, Result};
use serde::Serialize;

/// A single point on the ROC curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RocPoint {
    /// Score threshold at which this point is computed (`+inf` for the origin)
    pub threshold: f64,
    /// False positive rate
    pub fpr: f64,
    /// True positive rate
    pub tpr: f64,
}

/// Compute the ROC curve of `scores` for the class `positive`
///
/// Samples are sorted by descending score and each distinct score becomes a
/// threshold. The curve starts at `(0, 0)` and ends at `(1, 1)`.
///
/// # Errors
///
/// `InvalidInput` if the sequences are empty, differ in length, contain a
/// non-finite score, or lack either positive or negative samples.
pub fn roc_curve(labels: &[i64], positive: i64, scores: &[f64]) -> Result<Vec<RocPoint>> {
    check_consistent_length(labels.len(), scores.len(), "labels and scores")?;
    if labels.is_empty() {
        return Err(EvalError::input("ROC curve requires at least one sample"));
    }
    check_finite(scores, "scores")?;

    let total_pos = labels.iter().filter(|&&l| l == positive).count();
    let total_neg = labels.len() - total_pos;
    if total_pos == 0 {
        return Err(EvalError::input(format!(
            "no samples of positive class {positive}"
        )));
    }
    if total_neg == 0 {
        return Err(EvalError::input("no negative samples"));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let p = total_pos as f64;
    let n = total_neg as f64;
    let mut points = vec![RocPoint {
        threshold: f64::INFINITY,
        fpr: 0.0,
        tpr: 0.0,
    }];

    let (mut tp, mut fp) = (0usize, 0usize);
    let mut i = 0;
    while i < order.len() {
        // All samples sharing a score cross the threshold together
        let current = scores[order[i]];
        while i < order.len() && scores[order[i]] == current {
            if labels[order[i]] == positive {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }
        points.push(RocPoint {
            threshold: current,
            fpr: fp as f64 / n,
            tpr: tp as f64 / p,
        });
    }

    Ok(points)
}

/// Area under a ROC curve by the trapezoidal rule
///
/// Points are sorted by FPR (then TPR) before integrating.
pub fn roc_auc(points: &[RocPoint]) -> Result<f64> {
    if points.len() < 2 {
        return Err(EvalError::input(format!(
            "AUC requires at least 2 points, got {}",
            points.len()
        )));
    }

    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.fpr.total_cmp(&b.fpr).then(a.tpr.total_cmp(&b.tpr)));

    Ok(sorted
        .windows(2)
        .map(|w| (w[1].fpr - w[0].fpr) * (w[0].tpr + w[1].tpr) / 2.0)
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_separation() {
        let points = roc_curve(&[1, 1, 0, 0], 1, &[0.9, 0.8, 0.3, 0.1]).unwrap();
        assert_eq!(points.first().map(|p| (p.fpr, p.tpr)), Some((0.0, 0.0)));
        assert_eq!(points.last().map(|p| (p.fpr, p.tpr)), Some((1.0, 1.0)));
        assert!((roc_auc(&points).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverted_scores() {
        let points = roc_curve(&[1, 1, 0, 0], 1, &[0.1, 0.2, 0.8, 0.9]).unwrap();
        assert!(roc_auc(&points).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_tied_scores_form_diagonal() {
        let points = roc_curve(&[1, 0, 1, 0], 1, &[0.5; 4]).unwrap();
        assert_eq!(points.len(), 2);
        assert!((roc_auc(&points).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_multiclass_labels_with_class_of_interest() {
        // Class 2 is positive; classes 0 and 1 are negatives
        let points = roc_curve(&[2, 0, 1, 2], 2, &[0.9, 0.7, 0.4, 0.8]).unwrap();
        assert!((roc_auc(&points).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_validation() {
        assert!(roc_curve(&[1, 1], 1, &[0.1, 0.2]).is_err());
        assert!(roc_curve(&[0, 0], 1, &[0.1, 0.2]).is_err());
        assert!(roc_curve(&[0, 1], 1, &[0.1]).is_err());
        assert!(roc_curve(&[], 1, &[]).is_err());
        assert!(roc_auc(&[]).is_err());
    }
}
