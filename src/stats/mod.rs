//! Statistical computation for simulated two-sample experiments.
//!
//! - [`special`]: log-gamma and the regularized incomplete beta function
//! - [`distribution`]: Student's t CDF built on the incomplete beta
//! - [`hypothesis`]: pooled two-sample t-test with two-tailed p-values
//! - [`summary`]: significance share, mean p and histograms of a batch
//!
//! # Examples
//!
//! ```
//! use pvalsim::stats::{mean, sample_variance};
//!
//! let data = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let m = mean(&data);
//! assert_eq!(m, 3.0);
//! assert_eq!(sample_variance(&data, m), 2.5);
//! ```

pub mod distribution;
pub mod hypothesis;
pub mod special;
pub mod summary;

pub use distribution::{student_t_cdf, two_tailed_p_value};
pub use hypothesis::{two_sample_ttest, TestResult};
pub use special::{ln_gamma, regularized_incomplete_beta};
pub use summary::{BatchSummary, HistogramBin, PValueHistogram, RateInterpretation};

/// Arithmetic mean. Returns NaN for an empty slice.
///
/// Accumulated incrementally, so finite inputs near `f64::MAX` keep a
/// finite mean.
#[must_use]
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter()
        .enumerate()
        .fold(0.0, |m, (i, &x)| m + (x - m) / (i + 1) as f64)
}

/// Unbiased sample variance around a precomputed mean (divides by n - 1).
///
/// Callers guarantee `data.len() >= 2`.
#[must_use]
pub fn sample_variance(data: &[f64], mean: f64) -> f64 {
    let sse = data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>();
    sse / (data.len() - 1) as f64
}
