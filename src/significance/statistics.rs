// Paired two-sided t-test for matched score sequences
//
// The test analyzes the pointwise differences d_i = a_i - b_i under the
// null hypothesis that their mean is zero, assuming the differences are
// approximately normally distributed. The two-sided p-value comes from the
// Student-t CDF (statrs) rather than a series approximation.

use statrs::distribution::{ContinuousCDF, StudentsT};
use thiserror::Error;

/// Errors for paired test computation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatError {
    #[error("paired test requires equal-length samples, got {left} and {right}")]
    MismatchedLengths { left: usize, right: usize },

    #[error("paired test requires at least 2 matched samples, got {actual}")]
    InsufficientSamples { actual: usize },

    #[error("non-finite score at item index {index}")]
    NonFinite { index: usize },

    #[error("failed to construct t-distribution: {0}")]
    Distribution(String),
}

pub type Result<T> = std::result::Result<T, StatError>;

/// Result of a paired two-sided t-test
#[derive(Debug, Clone, PartialEq)]
pub struct PairedTest {
    /// t-statistic value (positive when the first sample scores higher)
    pub statistic: f64,

    /// Two-sided p-value in [0, 1]
    pub pvalue: f64,

    /// Degrees of freedom (n - 1)
    pub df: f64,

    /// Mean of the pointwise differences
    pub mean_difference: f64,
}

/// Run a paired two-sided t-test on two equal-length score sequences
///
/// # Arguments
/// * `a` - Per-item scores for the first system
/// * `b` - Per-item scores for the second system, aligned by position
///
/// # Returns
/// `PairedTest` with the t-statistic, two-sided p-value, and degrees of
/// freedom. Swapping `a` and `b` negates the statistic and preserves the
/// p-value.
///
/// # Zero-variance differences
/// When every difference is identical the classical statistic is
/// undefined. A zero mean difference is reported as `t = 0, p = 1` (the
/// systems agree on every item); a constant nonzero offset is reported as
/// `t = ±inf, p = 0` (the offset is exact on every item).
///
/// # Example
/// ```
/// use significar::significance::paired_ttest;
///
/// let a = vec![0.55, 0.61, 0.47, 0.58, 0.52];
/// let b = vec![0.31, 0.35, 0.28, 0.33, 0.30];
///
/// let test = paired_ttest(&a, &b).unwrap();
/// assert!(test.pvalue < 0.05); // Clear difference
/// assert!(test.statistic > 0.0);
/// ```
pub fn paired_ttest(a: &[f64], b: &[f64]) -> Result<PairedTest> {
    if a.len() != b.len() {
        return Err(StatError::MismatchedLengths {
            left: a.len(),
            right: b.len(),
        });
    }
    let n = a.len();
    if n < 2 {
        return Err(StatError::InsufficientSamples { actual: n });
    }
    for (index, (&x, &y)) in a.iter().zip(b.iter()).enumerate() {
        if !x.is_finite() || !y.is_finite() {
            return Err(StatError::NonFinite { index });
        }
    }

    let differences: Vec<f64> = a.iter().zip(b.iter()).map(|(x, y)| x - y).collect();
    let count = n as f64;
    let mean = differences.iter().sum::<f64>() / count;
    let variance = differences
        .iter()
        .map(|d| (d - mean).powi(2))
        .sum::<f64>()
        / (count - 1.0);
    let std_dev = variance.sqrt();
    let df = count - 1.0;

    if std_dev == 0.0 {
        let (statistic, pvalue) = if mean == 0.0 {
            (0.0, 1.0)
        } else {
            (f64::INFINITY.copysign(mean), 0.0)
        };
        return Ok(PairedTest {
            statistic,
            pvalue,
            df,
            mean_difference: mean,
        });
    }

    let statistic = mean / (std_dev / count.sqrt());
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| StatError::Distribution(e.to_string()))?;
    let pvalue = (2.0 * (1.0 - dist.cdf(statistic.abs()))).clamp(0.0, 1.0);

    Ok(PairedTest {
        statistic,
        pvalue,
        df,
        mean_difference: mean,
    })
}
