//! K-fold index splitting for error estimation
//!
//! Folds are index sets: the caller keeps the data and selects rows by index.
//! With class labels the split is stratified so every fold sees roughly the
//! same class proportions as the full sample.

use crate::error::{check_consistent_length, EvalError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;

/// Train/test index sets, one pair per fold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Folds {
    /// `train[i]` holds every index not in `test[i]`, ascending
    pub train: Vec<Vec<usize>>,
    /// `test[i]` holds the indices evaluated in iteration `i`, ascending
    pub test: Vec<Vec<usize>>,
}

impl Folds {
    pub fn n_folds(&self) -> usize {
        self.test.len()
    }

    /// Iterate over `(train, test)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&[usize], &[usize])> {
        self.train
            .iter()
            .zip(&self.test)
            .map(|(train, test)| (train.as_slice(), test.as_slice()))
    }
}

/// (Stratified) k-fold cross-validation over `0..n_samples`
///
/// Indices are shuffled with a seeded `StdRng` when `random_state` is given
/// and kept in order otherwise. Without labels the (shuffled) indices are cut
/// into `n_folds` contiguous chunks whose sizes differ by at most one. With
/// labels each class's indices are dealt round-robin across the folds.
pub fn cross_validation(
    n_samples: usize,
    n_folds: usize,
    random_state: Option<u64>,
    y: Option<&[i64]>,
) -> Result<Folds> {
    if n_folds < 2 {
        return Err(EvalError::argument(format!(
            "`n_folds` must be at least 2, got {n_folds}"
        )));
    }
    if n_folds > n_samples {
        return Err(EvalError::argument(format!(
            "`n_folds` = {n_folds} exceeds the number of samples {n_samples}"
        )));
    }
    if let Some(y) = y {
        check_consistent_length(n_samples, y.len(), "n_samples and y")?;
    }

    let mut indices: Vec<usize> = (0..n_samples).collect();
    if let Some(seed) = random_state {
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
    }

    let mut test: Vec<Vec<usize>> = vec![Vec::new(); n_folds];
    match y {
        None => {
            let base = n_samples / n_folds;
            let extra = n_samples % n_folds;
            let mut start = 0;
            for (fold, bucket) in test.iter_mut().enumerate() {
                let size = base + usize::from(fold < extra);
                bucket.extend_from_slice(&indices[start..start + size]);
                start += size;
            }
        }
        Some(y) => {
            let mut by_class: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
            for &idx in &indices {
                by_class.entry(y[idx]).or_default().push(idx);
            }
            // The counter carries over between classes so fold sizes stay balanced
            let mut next = 0;
            for (class, members) in &by_class {
                if members.len() < n_folds {
                    tracing::debug!(class, count = members.len(), n_folds, "kfold: class smaller than fold count");
                }
                for &idx in members {
                    test[next % n_folds].push(idx);
                    next += 1;
                }
            }
        }
    }

    let mut fold_of = vec![0usize; n_samples];
    for (fold, bucket) in test.iter_mut().enumerate() {
        bucket.sort_unstable();
        for &idx in bucket.iter() {
            fold_of[idx] = fold;
        }
    }
    let train = (0..n_folds)
        .map(|fold| (0..n_samples).filter(|&idx| fold_of[idx] != fold).collect())
        .collect();

    tracing::debug!(n_samples, n_folds, stratified = y.is_some(), "kfold split");
    Ok(Folds { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partition(folds: &Folds, n_samples: usize) {
        let mut seen = vec![0u32; n_samples];
        for (train, test) in folds.iter() {
            assert_eq!(train.len() + test.len(), n_samples);
            for &idx in test {
                seen[idx] += 1;
                assert!(!train.contains(&idx));
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
    }

    #[test]
    fn test_unshuffled_contiguous_folds() {
        let folds = cross_validation(7, 3, None, None).unwrap();
        assert_eq!(folds.test, vec![vec![0, 1, 2], vec![3, 4], vec![5, 6]]);
        assert_eq!(folds.train[1], vec![0, 1, 2, 5, 6]);
        assert_partition(&folds, 7);
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let a = cross_validation(20, 4, Some(42), None).unwrap();
        let b = cross_validation(20, 4, Some(42), None).unwrap();
        assert_eq!(a, b);
        assert_partition(&a, 20);
        assert!(a.test.iter().all(|fold| fold.len() == 5));
    }

    #[test]
    fn test_stratified_keeps_class_balance() {
        let y: Vec<i64> = (0..12).map(|i| if i < 8 { 0 } else { 1 }).collect();
        let folds = cross_validation(12, 4, Some(7), Some(&y)).unwrap();
        assert_partition(&folds, 12);
        for test in &folds.test {
            let positives = test.iter().filter(|&&idx| y[idx] == 1).count();
            assert_eq!(positives, 1);
            assert_eq!(test.len(), 3);
        }
    }

    #[test]
    fn test_invalid_fold_counts() {
        assert!(matches!(
            cross_validation(10, 1, None, None),
            Err(EvalError::InvalidArgument(_))
        ));
        assert!(matches!(
            cross_validation(3, 4, None, None),
            Err(EvalError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_label_length_mismatch() {
        assert!(matches!(
            cross_validation(4, 2, None, Some(&[0, 1, 0])),
            Err(EvalError::InvalidInput(_))
        ));
    }
}
