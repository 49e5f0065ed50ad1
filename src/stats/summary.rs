//! Summaries of a batch of simulated p-values.
//!
//! These are the numbers a presentation layer shows next to the
//! histogram: how many trials crossed the significance threshold, the
//! average p-value, and fixed-width bins over [0, 1].

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// Conventional significance threshold.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default number of histogram bins over [0, 1].
pub const DEFAULT_BINS: usize = 40;

/// Effect sizes below this magnitude count as "no true difference".
pub const NULL_EFFECT_TOLERANCE: f64 = 1e-12;

/// What the share of significant trials estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateInterpretation {
    /// δ = 0: every significant trial is a false alarm.
    FalsePositiveRate,
    /// δ ≠ 0: significant trials catch a real effect.
    Power,
}

impl RateInterpretation {
    /// Classify an effect size.
    #[must_use]
    pub fn for_delta(delta: f64) -> Self {
        if delta.abs() < NULL_EFFECT_TOLERANCE {
            Self::FalsePositiveRate
        } else {
            Self::Power
        }
    }

    /// Short human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::FalsePositiveRate => "false-positive rate",
            Self::Power => "power",
        }
    }
}

/// Headline statistics of a p-value batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of p-values
    pub trials: usize,
    /// Count of p < α
    pub significant: usize,
    /// `significant / trials`, 0 for an empty batch
    pub significant_fraction: f64,
    /// Average p-value, `None` for an empty batch
    pub mean_p: Option<f64>,
    /// Threshold used
    pub alpha: f64,
    /// Meaning of `significant_fraction`
    pub interpretation: RateInterpretation,
}

impl BatchSummary {
    /// Summarize p-values against threshold `alpha`.
    ///
    /// The interpretation defaults to [`RateInterpretation::FalsePositiveRate`];
    /// use [`BatchSummary::with_delta`] to classify by effect size.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] unless `0 < alpha < 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pvalsim::stats::BatchSummary;
    ///
    /// let summary = BatchSummary::from_p_values(&[0.01, 0.2, 0.04, 0.9], 0.05).unwrap();
    /// assert_eq!(summary.significant, 2);
    /// assert_eq!(summary.significant_fraction, 0.5);
    /// ```
    pub fn from_p_values(p_values: &[f64], alpha: f64) -> Result<Self> {
        validate_alpha(alpha)?;

        let trials = p_values.len();
        let significant = p_values.iter().filter(|&&p| p < alpha).count();
        let (significant_fraction, mean_p) = if trials == 0 {
            (0.0, None)
        } else {
            (
                significant as f64 / trials as f64,
                Some(p_values.iter().sum::<f64>() / trials as f64),
            )
        };

        Ok(Self {
            trials,
            significant,
            significant_fraction,
            mean_p,
            alpha,
            interpretation: RateInterpretation::FalsePositiveRate,
        })
    }

    /// Set the interpretation from the simulated effect size.
    #[must_use]
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.interpretation = RateInterpretation::for_delta(delta);
        self
    }

    /// Significant share as a percentage
    #[must_use]
    pub fn significant_percent(&self) -> f64 {
        self.significant_fraction * 100.0
    }
}

/// One histogram bin over [lower, upper).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Inclusive lower edge
    pub lower: f64,
    /// Exclusive upper edge (inclusive for the last bin)
    pub upper: f64,
    /// Number of p-values in the bin
    pub count: usize,
    /// Whole bin lies at or below α
    pub below_alpha: bool,
}

/// Fixed-width histogram of p-values over [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PValueHistogram {
    /// Bins in increasing order
    pub bins: Vec<HistogramBin>,
    /// Threshold used to flag bins
    pub alpha: f64,
}

impl PValueHistogram {
    /// Bin p-values into `n_bins` equal-width bins over [0, 1].
    ///
    /// Values outside [0, 1] are clamped into the edge bins; p = 1 lands in
    /// the last bin.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] if `n_bins == 0` or `alpha`
    /// is not in (0, 1).
    pub fn from_p_values(p_values: &[f64], n_bins: usize, alpha: f64) -> Result<Self> {
        if n_bins == 0 {
            return Err(SimError::invalid_parameter("bins", n_bins, "bins >= 1"));
        }
        validate_alpha(alpha)?;

        let width = 1.0 / n_bins as f64;
        let mut counts = vec![0usize; n_bins];
        for &p in p_values {
            let idx = ((p.clamp(0.0, 1.0) / width) as usize).min(n_bins - 1);
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                let lower = i as f64 * width;
                let upper = if i + 1 == n_bins {
                    1.0
                } else {
                    (i + 1) as f64 * width
                };
                HistogramBin {
                    lower,
                    upper,
                    count,
                    below_alpha: upper <= alpha,
                }
            })
            .collect();

        Ok(Self { bins, alpha })
    }

    /// Largest bin count (0 for an empty histogram)
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Total number of binned values
    #[must_use]
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

pub(crate) fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(SimError::invalid_parameter("alpha", alpha, "0 < alpha < 1"))
    }
}
