//! Core types for p-value simulations
//!
//! A [`SimulationRequest`] fully determines the statistical distribution of
//! a batch; a [`SimulationBatch`] is the ordered p-values it produced.

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Largest accepted number of trials in one batch.
pub const MAX_TRIALS: usize = 100_000_000;

/// Largest accepted number of observations per group.
pub const MAX_GROUP_SIZE: usize = 1_000_000;

/// Parameters of one batch of simulated experiments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Difference of population means (group B mean minus group A mean)
    pub delta: f64,
    /// Shared population standard deviation
    pub sigma: f64,
    /// Observations per group
    pub n: usize,
    /// Number of independent replications
    pub trials: usize,
}

impl SimulationRequest {
    /// Create a validated request.
    ///
    /// # Errors
    ///
    /// See [`SimulationRequest::validate`].
    ///
    /// # Examples
    ///
    /// ```
    /// use pvalsim::monte_carlo::SimulationRequest;
    ///
    /// assert!(SimulationRequest::new(0.5, 1.0, 30, 1000).is_ok());
    /// assert!(SimulationRequest::new(0.5, 0.0, 30, 1000).is_err());
    /// ```
    pub fn new(delta: f64, sigma: f64, n: usize, trials: usize) -> Result<Self> {
        let request = Self {
            delta,
            sigma,
            n,
            trials,
        };
        request.validate()?;
        Ok(request)
    }

    /// Check every parameter against its domain.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] if `delta` is not finite,
    /// `sigma` is not a finite value above zero, `n` is outside
    /// `2..=MAX_GROUP_SIZE`, or `trials` is outside `1..=MAX_TRIALS`.
    pub fn validate(&self) -> Result<()> {
        if !self.delta.is_finite() {
            return Err(SimError::invalid_parameter(
                "delta",
                self.delta,
                "a finite number",
            ));
        }
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(SimError::invalid_parameter(
                "sigma",
                self.sigma,
                "finite sigma > 0",
            ));
        }
        if !(2..=MAX_GROUP_SIZE).contains(&self.n) {
            return Err(SimError::invalid_parameter(
                "n",
                self.n,
                "2 <= n <= 1000000",
            ));
        }
        if !(1..=MAX_TRIALS).contains(&self.trials) {
            return Err(SimError::invalid_parameter(
                "trials",
                self.trials,
                "1 <= trials <= 100000000",
            ));
        }
        Ok(())
    }

    /// Degrees of freedom of each trial's t-test, 2n - 2
    ///
    /// Saturates instead of overflowing for requests that were never
    /// validated.
    #[must_use]
    pub fn degrees_of_freedom(&self) -> usize {
        self.n.saturating_mul(2).saturating_sub(2)
    }
}

/// Ordered p-values of one completed batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationBatch {
    /// Request that produced the batch
    pub request: SimulationRequest,
    /// Seed of the random stream consumed
    pub seed: u64,
    /// One p-value per trial, in trial order
    pub p_values: Vec<f64>,
    /// Trials whose pooled standard error was exactly zero
    pub degenerate_trials: usize,
}

impl SimulationBatch {
    /// Number of trials in the batch
    #[must_use]
    pub fn len(&self) -> usize {
        self.p_values.len()
    }

    /// Whether the batch holds no p-values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.p_values.is_empty()
    }

    /// Borrow the p-values
    #[must_use]
    pub fn p_values(&self) -> &[f64] {
        &self.p_values
    }

    /// Take ownership of the p-values
    #[must_use]
    pub fn into_p_values(self) -> Vec<f64> {
        self.p_values
    }

    /// Share of trials with p < `alpha`
    #[must_use]
    pub fn rejection_rate(&self, alpha: f64) -> f64 {
        if self.p_values.is_empty() {
            return 0.0;
        }
        let hits = self.p_values.iter().filter(|&&p| p < alpha).count();
        hits as f64 / self.p_values.len() as f64
    }
}

/// Shared flag a caller flips to abandon an in-flight batch.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// New, not-yet-cancelled token
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
