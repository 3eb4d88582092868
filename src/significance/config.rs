// Configuration for pairwise significance testing
//
// The significance level is an explicit parameter threaded into the
// analyzer, not a process-wide default.

use serde::{Deserialize, Serialize};

/// Configuration for pairwise significance testing
///
/// # Example
/// ```
/// use significar::significance::SignificanceConfig;
///
/// let config = SignificanceConfig::default();
/// assert_eq!(config.alpha, 0.05); // 95% confidence
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignificanceConfig {
    /// Statistical significance level (alpha) for the paired t-test
    ///
    /// - 0.05 (default): 95% confidence level
    /// - 0.01: 99% confidence level, stricter
    /// - 0.10: 90% confidence level, looser
    ///
    /// A pair is flagged significant exactly when `pvalue < alpha`.
    pub alpha: f64,
}

impl Default for SignificanceConfig {
    fn default() -> Self {
        Self { alpha: 0.05 }
    }
}

impl SignificanceConfig {
    /// Create a strict configuration (99% confidence)
    pub fn strict() -> Self {
        Self { alpha: 0.01 }
    }

    /// Create a permissive configuration (90% confidence)
    pub fn permissive() -> Self {
        Self { alpha: 0.10 }
    }

    /// Validate configuration
    ///
    /// Alpha must be a probability strictly inside (0, 1); the boundary
    /// values would flag every pair or none.
    pub fn validate(&self) -> Result<(), String> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 || self.alpha >= 1.0 {
            return Err(format!(
                "alpha must be in the open interval (0, 1), got {}",
                self.alpha
            ));
        }
        Ok(())
    }
}
