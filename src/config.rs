// Configuration for hypothesis-test evaluation
//
// Controls the significance level used by decision helpers and how the
// Wilcoxon signed-rank test picks between its exact null distribution and
// the normal approximation.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sample size up to which the exact Wilcoxon null distribution is used
pub const DEFAULT_EXACT_THRESHOLD: usize = 30;

/// Hard cap on the exact Wilcoxon distribution
///
/// The exact distribution costs O(n³) time and O(n²) memory, so neither
/// `exact_threshold` nor `ExactPolicy::Exact` may push it past this size.
pub const MAX_EXACT_N: usize = 1000;

/// How the Wilcoxon signed-rank test chooses its sampling distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExactPolicy {
    /// Exact distribution for `n <= exact_threshold`, normal approximation above
    #[default]
    Auto,
    /// Exact distribution up to `MAX_EXACT_N`, normal approximation above
    Exact,
    /// Always use the normal approximation
    Approximate,
}

/// Configuration for statistical evaluation
///
/// # Example
/// ```
/// use e2ml::config::EvalConfig;
///
/// let config = EvalConfig::default();
/// assert_eq!(config.significance_level, 0.05);
/// assert_eq!(config.exact_threshold, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Statistical significance level (alpha) for hypothesis testing
    ///
    /// - 0.05 (default): 95% confidence level
    /// - 0.01: stricter, fewer false positives
    /// - 0.10: looser, more false positives
    pub significance_level: f64,

    /// Largest number of non-zero differences for which the Wilcoxon test
    /// uses the exact null distribution under `ExactPolicy::Auto`
    ///
    /// Default: 30
    pub exact_threshold: usize,

    /// Distribution selection for the Wilcoxon signed-rank test
    pub exact_policy: ExactPolicy,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            exact_threshold: DEFAULT_EXACT_THRESHOLD,
            exact_policy: ExactPolicy::Auto,
        }
    }
}

impl EvalConfig {
    /// Create a strict configuration (99% confidence)
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            ..Self::default()
        }
    }

    /// Create a permissive configuration (90% confidence)
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10,
            ..Self::default()
        }
    }

    /// Parse a configuration from TOML text and validate it
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EvalConfig =
            toml::from_str(text).map_err(|e| EvalError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EvalError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Whether the Wilcoxon test should use the exact distribution for `n` differences
    pub fn use_exact(&self, n: usize) -> bool {
        match self.exact_policy {
            ExactPolicy::Auto => n <= self.exact_threshold,
            ExactPolicy::Exact => n <= MAX_EXACT_N,
            ExactPolicy::Approximate => false,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(EvalError::Config(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            )));
        }

        if self.exact_threshold > MAX_EXACT_N {
            return Err(EvalError::Config(format!(
                "exact_threshold must be at most {MAX_EXACT_N}, got {}",
                self.exact_threshold
            )));
        }

        Ok(())
    }
}
