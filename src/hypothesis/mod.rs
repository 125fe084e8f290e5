// Hypothesis testing for one-sample and paired designs
//
// Every test reduces its sample to a statistic, evaluates the left-tail
// probability `p_left` of that statistic under the null distribution and
// sets `p_right = 1 - p_left` (or the exact upper tail for discrete
// distributions). The requested tail then picks the p-value:
//
//   two-sided  -> 2 * min(p_left, p_right), capped at 1
//   left-tail  -> p_left
//   right-tail -> p_right
//
// Parametric tests evaluate the standard normal and Student-t CDFs from
// statrs. The Wilcoxon signed-rank test uses its exact permutation
// distribution for small samples and a normal approximation above the
// configured threshold.

mod critical;
mod mcnemar;
mod one_sample;
mod paired;
mod wilcoxon;

pub use critical::{
    chi2_critical_value, mc_nemar_decision, t_critical_value, two_matched_samples_t_decision,
    wilcoxon_critical_value, wilcoxon_table_decision, z_critical_value, Decision,
    WILCOXON_TABLE_ALPHAS, WILCOXON_TABLE_N_RANGE,
};
pub use mcnemar::{mc_nemar_test, DisagreementCounts};
pub use one_sample::{t_test_one_sample, z_test_one_sample};
pub use paired::{differences, t_test_paired};
pub use wilcoxon::{
    exact_null_distribution, wilcoxon_signed_rank_test, wilcoxon_signed_rank_test_with_config,
    RankTable, WilcoxonDistribution,
};

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};
use std::fmt;
use std::str::FromStr;

/// Which side(s) of the null distribution a p-value is computed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestType {
    #[default]
    TwoSided,
    LeftTail,
    RightTail,
}

impl TestType {
    /// Combine tail probabilities into the p-value for this test type
    ///
    /// Discrete null distributions can make `2 * min(p_left, p_right)`
    /// exceed 1, so the two-sided value is capped.
    pub fn p_value(self, p_left: f64, p_right: f64) -> f64 {
        let p = match self {
            TestType::TwoSided => 2.0 * p_left.min(p_right),
            TestType::LeftTail => p_left,
            TestType::RightTail => p_right,
        };
        p.clamp(0.0, 1.0)
    }
}

impl FromStr for TestType {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "two-sided" => Ok(TestType::TwoSided),
            "left-tail" => Ok(TestType::LeftTail),
            "right-tail" => Ok(TestType::RightTail),
            other => Err(EvalError::argument(format!(
                "`test_type` must be in ['two-sided', 'left-tail', 'right-tail'], got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TestType::TwoSided => "two-sided",
            TestType::LeftTail => "left-tail",
            TestType::RightTail => "right-tail",
        })
    }
}

/// Observed statistic and p-value of a hypothesis test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestResult {
    /// Test statistic; meaning depends on the test (z, t, W+, chi²)
    pub statistic: f64,
    /// p-value in `[0, 1]`
    pub p_value: f64,
}

impl TestResult {
    pub fn new(statistic: f64, p_value: f64) -> Self {
        Self { statistic, p_value }
    }

    /// Whether the null hypothesis is rejected at level `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

fn standard_normal() -> Result<Normal> {
    Normal::new(0.0, 1.0).map_err(|e| EvalError::argument(e.to_string()))
}

/// Left and right tail probabilities of `z` under N(0, 1)
pub(crate) fn normal_tails(z: f64) -> Result<(f64, f64)> {
    let p_left = standard_normal()?.cdf(z);
    Ok((p_left, 1.0 - p_left))
}

/// Left and right tail probabilities of `t` under Student-t with `df` degrees of freedom
pub(crate) fn student_t_tails(t: f64, df: f64) -> Result<(f64, f64)> {
    let p_left = if t.is_infinite() {
        if t > 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        StudentsT::new(0.0, 1.0, df)
            .map_err(|e| EvalError::argument(e.to_string()))?
            .cdf(t)
    };
    Ok((p_left, 1.0 - p_left))
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Bias-corrected standard deviation (divides by `n - 1`)
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}
