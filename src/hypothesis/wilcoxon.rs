//! Wilcoxon signed-rank test
//!
//! The statistic is the positive rank sum `W+`: the sum of the mid-ranks of
//! `|d_i|` over the differences with `d_i > 0`. Zero differences carry no
//! sign information and are dropped before ranking.
//!
//! For small `n` the p-value comes from the exact null distribution of `W+`,
//! the distribution of the rank sum over all `2^n` equally likely sign
//! assignments. It is built by convolution instead of enumeration: adding
//! rank `r` maps the count vector `c` to `c(s) + c(s - r)`. Mid-ranks are
//! multiples of 1/2, so the convolution runs on doubled ranks and stays on an
//! integer grid. This costs `O(n * sum(ranks))` and yields the same
//! probabilities as enumerating every sign vector.
//!
//! Above the exact threshold the normal approximation
//! `mu = n(n+1)/4`, `sigma² = n(n+1)(2n+1)/24` is used.

use super::{differences, normal_tails, TestResult, TestType};
use crate::config::{EvalConfig, ExactPolicy, MAX_EXACT_N};
use crate::error::Result;

/// Mid-ranks of a set of absolute differences
///
/// Tied values share the average of the ranks they jointly occupy.
#[derive(Debug, Clone, PartialEq)]
pub struct RankTable {
    /// `(value, rank)` pairs sorted by value, one entry per distinct value
    entries: Vec<(f64, f64)>,
}

impl RankTable {
    /// Rank `values` in ascending order with the mid-rank convention
    pub fn new(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut entries = Vec::new();
        let mut start = 0;
        while start < sorted.len() {
            let value = sorted[start];
            let mut end = start;
            while end < sorted.len() && sorted[end] == value {
                end += 1;
            }
            // Positions start+1 ..= end share their mean rank
            let rank = (start + 1 + end) as f64 / 2.0;
            entries.push((value, rank));
            start = end;
        }

        Self { entries }
    }

    /// Rank of `value`, if it was part of the ranked set
    pub fn rank(&self, value: f64) -> Option<f64> {
        self.entries
            .binary_search_by(|(v, _)| v.total_cmp(&value))
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Signed-rank summary of a difference sequence with zeros removed
#[derive(Debug, Clone)]
pub(crate) struct SignedRanks {
    /// Mid-rank of every non-zero difference, in input order
    pub ranks: Vec<f64>,
    /// Sum of ranks of positive differences
    pub w_plus: f64,
    /// Sum of ranks of negative differences
    pub w_minus: f64,
}

impl SignedRanks {
    pub fn from_differences(diff: &[f64]) -> Self {
        let nonzero: Vec<f64> = diff.iter().copied().filter(|&d| d != 0.0).collect();
        let dropped = diff.len() - nonzero.len();
        if dropped > 0 {
            tracing::debug!(dropped, "wilcoxon: discarded zero differences");
        }

        let magnitudes: Vec<f64> = nonzero.iter().map(|d| d.abs()).collect();
        let table = RankTable::new(&magnitudes);
        let ranks: Vec<f64> = magnitudes
            .iter()
            .map(|&m| table.rank(m).unwrap_or(0.0))
            .collect();

        let (mut w_plus, mut w_minus) = (0.0, 0.0);
        for (d, r) in nonzero.iter().zip(&ranks) {
            if *d > 0.0 {
                w_plus += r;
            } else {
                w_minus += r;
            }
        }

        Self {
            ranks,
            w_plus,
            w_minus,
        }
    }

    pub fn n(&self) -> usize {
        self.ranks.len()
    }
}

/// Exact null distribution of the positive rank sum
///
/// Stored over doubled statistic values: entry `k` is `P(W+ = k / 2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WilcoxonDistribution {
    probabilities: Vec<f64>,
}

impl WilcoxonDistribution {
    /// `P(W+ <= w)`
    pub fn cdf(&self, w: f64) -> f64 {
        match Self::doubled_index(w) {
            None => 0.0,
            Some(k) => {
                let end = (k + 1).min(self.probabilities.len());
                self.probabilities[..end].iter().sum()
            }
        }
    }

    /// `P(W+ >= w)`
    pub fn sf(&self, w: f64) -> f64 {
        match Self::doubled_index(w) {
            None => 1.0,
            Some(k) if k >= self.probabilities.len() => 0.0,
            Some(k) => self.probabilities[k..].iter().sum(),
        }
    }

    /// Values of `W+` with non-zero probability, paired with that probability
    pub fn support(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.probabilities
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p > 0.0)
            .map(|(k, &p)| (k as f64 / 2.0, p))
    }

    fn doubled_index(w: f64) -> Option<usize> {
        let doubled = (2.0 * w).round();
        if doubled < 0.0 {
            None
        } else {
            Some(doubled as usize)
        }
    }
}

/// Build the exact null distribution of `W+` for the given ranks
///
/// Each rank enters the positive sum with probability 1/2 independently.
pub fn exact_null_distribution(ranks: &[f64]) -> WilcoxonDistribution {
    let doubled: Vec<usize> = ranks.iter().map(|r| (2.0 * r).round() as usize).collect();
    let max_sum: usize = doubled.iter().sum();

    let mut probabilities = vec![0.0f64; max_sum + 1];
    probabilities[0] = 1.0;
    let mut reach = 0;
    for &r in &doubled {
        reach += r;
        for s in (0..=reach).rev() {
            let without = probabilities[s];
            let with = if s >= r { probabilities[s - r] } else { 0.0 };
            probabilities[s] = 0.5 * (without + with);
        }
    }

    WilcoxonDistribution { probabilities }
}

/// Wilcoxon signed-rank test with the default configuration
///
/// Without `sample2`, `sample1` holds the paired differences. Returns the
/// positive rank sum and its p-value. If every difference is zero the
/// statistic is 0 and the p-value is 1.
///
/// # Example
/// ```
/// use e2ml::hypothesis::{wilcoxon_signed_rank_test, TestType};
///
/// let result = wilcoxon_signed_rank_test(&[1.0, 2.0, 3.0], None, TestType::RightTail).unwrap();
/// assert_eq!(result.statistic, 6.0);
/// assert_eq!(result.p_value, 0.125);
/// ```
pub fn wilcoxon_signed_rank_test(
    sample1: &[f64],
    sample2: Option<&[f64]>,
    test_type: TestType,
) -> Result<TestResult> {
    wilcoxon_signed_rank_test_with_config(sample1, sample2, test_type, &EvalConfig::default())
}

/// Wilcoxon signed-rank test with an explicit exact/approximate policy
pub fn wilcoxon_signed_rank_test_with_config(
    sample1: &[f64],
    sample2: Option<&[f64]>,
    test_type: TestType,
    config: &EvalConfig,
) -> Result<TestResult> {
    config.validate()?;
    let diff = differences(sample1, sample2)?;
    let signed = SignedRanks::from_differences(&diff);
    let n = signed.n();
    let w = signed.w_plus;

    if n == 0 {
        tracing::debug!("wilcoxon: no non-zero differences");
        return Ok(TestResult::new(0.0, 1.0));
    }

    let exact = config.use_exact(n);
    if !exact {
        match config.exact_policy {
            ExactPolicy::Exact => {
                tracing::warn!(n, max = MAX_EXACT_N, "wilcoxon: sample too large for exact distribution, using normal approximation");
            }
            ExactPolicy::Approximate if n <= config.exact_threshold => {
                tracing::warn!(n, "wilcoxon: exact distribution disabled by policy, using normal approximation");
            }
            _ => {}
        }
    }

    let (p_left, p_right) = if exact {
        tracing::debug!(n, w, "wilcoxon: exact null distribution");
        let dist = exact_null_distribution(&signed.ranks);
        (dist.cdf(w), dist.sf(w))
    } else {
        let nf = n as f64;
        let mu = nf * (nf + 1.0) / 4.0;
        let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0;
        let z = (w - mu) / variance.sqrt();
        tracing::debug!(n, w, z, "wilcoxon: normal approximation");
        normal_tails(z)?
    };

    Ok(TestResult::new(w, test_type.p_value(p_left, p_right)))
}
