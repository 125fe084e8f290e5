// Critical values and table-driven test decisions
//
// Besides p-values, tests can be decided by comparing the statistic with a
// critical value at significance level alpha. Critical values of continuous
// distributions come from inverse CDFs; the Wilcoxon signed-rank critical
// values for small samples come from a fixed table.

use super::mcnemar::DisagreementCounts;
use super::wilcoxon::SignedRanks;
use super::{differences, mean, sample_std};
use crate::error::{EvalError, Result};
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal, StudentsT};
use std::ops::RangeInclusive;

/// Significance levels (in percent) covered by the Wilcoxon table
pub const WILCOXON_TABLE_ALPHAS: [f64; 5] = [5.0, 2.5, 1.0, 0.5, 0.1];

/// Sample sizes covered by the Wilcoxon table
pub const WILCOXON_TABLE_N_RANGE: RangeInclusive<usize> = 5..=25;

/// Largest `T = min(W+, W-)` that rejects the null hypothesis,
/// one row per entry of `WILCOXON_TABLE_ALPHAS`, one column per `n` in 5..=25
static WILCOXON_TABLE: [[u32; 21]; 5] = [
    [0, 2, 3, 5, 8, 10, 13, 17, 21, 25, 30, 35, 41, 47, 53, 60, 67, 75, 83, 91, 100],
    [0, 0, 2, 3, 5, 8, 10, 13, 17, 21, 25, 29, 34, 40, 46, 52, 58, 65, 73, 81, 89],
    [0, 0, 0, 1, 3, 5, 7, 9, 12, 15, 19, 23, 27, 32, 37, 43, 49, 55, 62, 69, 76],
    [0, 0, 0, 0, 1, 3, 5, 7, 9, 12, 15, 19, 23, 27, 32, 37, 42, 48, 54, 61, 68],
    [0, 0, 0, 0, 0, 0, 1, 2, 4, 6, 8, 11, 14, 18, 21, 26, 30, 35, 40, 45, 51],
];

/// Outcome of comparing a statistic against a critical value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    /// Whether the null hypothesis is retained
    pub accept_null: bool,
    pub statistic: f64,
    pub critical_value: f64,
}

fn check_alpha(alpha: f64) -> Result<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(EvalError::argument(format!(
            "significance level must be in (0, 1), got {alpha}"
        )));
    }
    Ok(())
}

fn check_df(df: f64) -> Result<()> {
    if !(df.is_finite() && df > 0.0) {
        return Err(EvalError::argument(format!(
            "degrees of freedom must be > 0, got {df}"
        )));
    }
    Ok(())
}

/// Wilcoxon critical value for significance level `alpha` and `n` non-zero differences
///
/// Only the levels in `WILCOXON_TABLE_ALPHAS` and sizes in
/// `WILCOXON_TABLE_N_RANGE` are tabulated.
pub fn wilcoxon_critical_value(alpha: f64, n: usize) -> Result<u32> {
    let percent = alpha * 100.0;
    let row = WILCOXON_TABLE_ALPHAS
        .iter()
        .position(|&a| (a - percent).abs() < 1e-9)
        .ok_or_else(|| {
            EvalError::argument(format!(
                "no Wilcoxon table entry for alpha = {alpha}"
            ))
        })?;
    if !WILCOXON_TABLE_N_RANGE.contains(&n) {
        return Err(EvalError::argument(format!(
            "no Wilcoxon table entry for n = {n} (tabulated for 5..=25)"
        )));
    }
    Ok(WILCOXON_TABLE[row][n - WILCOXON_TABLE_N_RANGE.start()])
}

/// Upper-tail critical value of N(0, 1): `Φ⁻¹(1 - alpha)`
pub fn z_critical_value(alpha: f64) -> Result<f64> {
    check_alpha(alpha)?;
    let normal = Normal::new(0.0, 1.0).map_err(|e| EvalError::argument(e.to_string()))?;
    Ok(normal.inverse_cdf(1.0 - alpha))
}

/// Upper-tail critical value of Student-t with `df` degrees of freedom
pub fn t_critical_value(alpha: f64, df: f64) -> Result<f64> {
    check_alpha(alpha)?;
    check_df(df)?;
    let t = StudentsT::new(0.0, 1.0, df).map_err(|e| EvalError::argument(e.to_string()))?;
    Ok(t.inverse_cdf(1.0 - alpha))
}

/// Upper-tail critical value of chi² with `df` degrees of freedom
pub fn chi2_critical_value(alpha: f64, df: f64) -> Result<f64> {
    check_alpha(alpha)?;
    check_df(df)?;
    let chi2 = ChiSquared::new(df).map_err(|e| EvalError::argument(e.to_string()))?;
    Ok(chi2.inverse_cdf(1.0 - alpha))
}

/// Two matched samples t-test decided against `t_{1-alpha, n-1}`
///
/// The statistic is `|mean(d)| / (s_d / sqrt(n))` over `d = xs - ys`.
pub fn two_matched_samples_t_decision(xs: &[f64], ys: &[f64], alpha: f64) -> Result<Decision> {
    let diff = differences(xs, Some(ys))?;
    if diff.len() < 2 {
        return Err(EvalError::input(format!(
            "need at least 2 pairs, got {}",
            diff.len()
        )));
    }

    let n = diff.len() as f64;
    let d = mean(&diff).abs();
    let s = sample_std(&diff);
    let t = if d == 0.0 {
        0.0
    } else if s == 0.0 {
        f64::INFINITY
    } else {
        d / (s / n.sqrt())
    };

    let critical_value = t_critical_value(alpha, n - 1.0)?;
    Ok(Decision {
        accept_null: t <= critical_value,
        statistic: t,
        critical_value,
    })
}

/// Wilcoxon signed-rank test decided with `T = min(W+, W-)`
///
/// Inside the table range the critical value is looked up; otherwise it is
/// approximated as `mu - z_{1-alpha} * sigma`. The null hypothesis is
/// rejected when `T` does not exceed the critical value. Without any
/// non-zero difference there is no evidence and the null is retained.
pub fn wilcoxon_table_decision(xs: &[f64], ys: &[f64], alpha: f64) -> Result<Decision> {
    check_alpha(alpha)?;
    let diff = differences(xs, Some(ys))?;
    let signed = SignedRanks::from_differences(&diff);
    let n = signed.n();
    let t = signed.w_plus.min(signed.w_minus);

    if n == 0 {
        tracing::debug!("wilcoxon: no non-zero differences, retaining null hypothesis");
        return Ok(Decision {
            accept_null: true,
            statistic: 0.0,
            critical_value: 0.0,
        });
    }

    let critical_value = match wilcoxon_critical_value(alpha, n) {
        Ok(value) => f64::from(value),
        Err(_) => {
            let nf = n as f64;
            let mu = nf * (nf + 1.0) / 4.0;
            let sigma = (nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0).sqrt();
            tracing::debug!(n, alpha, "wilcoxon: critical value outside table, using normal approximation");
            mu - z_critical_value(alpha)? * sigma
        }
    };

    Ok(Decision {
        accept_null: t > critical_value,
        statistic: t,
        critical_value,
    })
}

/// McNemar's test decided against the chi² critical value with one degree of freedom
pub fn mc_nemar_decision(
    y_true: &[i64],
    y_pred_1: &[i64],
    y_pred_2: &[i64],
    alpha: f64,
) -> Result<Decision> {
    let chi = DisagreementCounts::new(y_true, y_pred_1, y_pred_2)?.statistic();
    let critical_value = chi2_critical_value(alpha, 1.0)?;
    Ok(Decision {
        accept_null: chi <= critical_value,
        statistic: chi,
        critical_value,
    })
}
