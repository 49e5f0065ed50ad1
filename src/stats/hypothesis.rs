//! Two-sample hypothesis testing.
//!
//! Implements Student's pooled-variance t-test for two independent samples
//! with equal population variances, reporting a two-tailed p-value.
//!
//! # Example
//!
//! ```
//! use pvalsim::stats::hypothesis::two_sample_ttest;
//!
//! let group1 = vec![2.3, 2.5, 2.7, 2.9, 3.1];
//! let group2 = vec![3.2, 3.4, 3.6, 3.8, 4.0];
//!
//! let result = two_sample_ttest(&group1, &group2).expect("valid t-test inputs");
//! assert_eq!(result.df, 8);
//! assert!(result.p_value < 0.01);
//! ```

use super::distribution::two_tailed_p_value;
use super::{mean, sample_variance};
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// Minimum observations per group (the unbiased variance needs n - 1 > 0).
pub const MIN_GROUP_SIZE: usize = 2;

/// Result of a two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// t-statistic, (mean_a - mean_b) / standard error
    pub t: f64,
    /// Degrees of freedom, n_a + n_b - 2
    pub df: usize,
    /// Two-tailed p-value in [0, 1]
    pub p_value: f64,
    /// Set when the pooled standard error was exactly zero; `t` is then 0
    /// or ±∞, and serde_json writes an infinite `t` as `null`
    pub degenerate: bool,
}

/// Independent two-sample t-test with pooled variance (Student's t-test).
///
/// H₀: μ_a = μ_b
/// H₁: μ_a ≠ μ_b
///
/// When both samples are constant the standard error is zero. Equal means
/// then yield `t = 0, p = 1`; different means yield `t = ±∞, p = 0`.
/// Either way `degenerate` is set.
///
/// # Errors
///
/// - [`SimError::InsufficientSamples`] if either sample has fewer than 2
///   observations
/// - [`SimError::NonFiniteObservation`] if either sample holds NaN or ±∞
/// - [`SimError::InvalidParameter`] if the spread or the mean difference
///   overflows `f64`
pub fn two_sample_ttest(sample_a: &[f64], sample_b: &[f64]) -> Result<TestResult> {
    check_sample("a", sample_a)?;
    check_sample("b", sample_b)?;

    let n1 = sample_a.len();
    let n2 = sample_b.len();
    let df = n1 + n2 - 2;

    let mean1 = mean(sample_a);
    let mean2 = mean(sample_b);
    let var1 = sample_variance(sample_a, mean1);
    let var2 = sample_variance(sample_b, mean2);

    let pooled_var = ((n1 - 1) as f64 * var1 + (n2 - 1) as f64 * var2) / df as f64;
    let se = (pooled_var * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
    let diff = mean1 - mean2;

    if !se.is_finite() {
        return Err(SimError::invalid_parameter(
            "standard error",
            se,
            "finite (sample spread overflows f64)",
        ));
    }
    if !diff.is_finite() {
        return Err(SimError::invalid_parameter(
            "mean difference",
            diff,
            "finite (sample means too far apart for f64)",
        ));
    }
    if se == 0.0 {
        return Ok(zero_standard_error(diff, df));
    }

    let t = diff / se;
    let p_value = two_tailed_p_value(t, df as f64)?;

    Ok(TestResult {
        t,
        df,
        p_value,
        degenerate: false,
    })
}

fn zero_standard_error(diff: f64, df: usize) -> TestResult {
    let (t, p_value) = if diff == 0.0 {
        (0.0, 1.0)
    } else {
        (diff.signum() * f64::INFINITY, 0.0)
    };
    TestResult {
        t,
        df,
        p_value,
        degenerate: true,
    }
}

fn check_sample(which: &'static str, sample: &[f64]) -> Result<()> {
    if sample.len() < MIN_GROUP_SIZE {
        return Err(SimError::InsufficientSamples {
            which,
            len: sample.len(),
            min: MIN_GROUP_SIZE,
        });
    }
    if let Some(index) = sample.iter().position(|v| !v.is_finite()) {
        return Err(SimError::NonFiniteObservation { which, index });
    }
    Ok(())
}

#[cfg(test)]
#[path = "hypothesis_tests.rs"]
mod hypothesis_tests;
