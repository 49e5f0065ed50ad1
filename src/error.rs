//! Error types for pvalsim operations.
//!
//! Every fallible operation in the crate returns [`Result`], so callers get
//! one error type whether they drive the t-test directly, run a batch, or
//! load a configuration file.

use thiserror::Error;

/// Main error type for pvalsim operations.
///
/// # Examples
///
/// ```
/// use pvalsim::error::SimError;
///
/// let err = SimError::invalid_parameter("sigma", -1.0, "sigma > 0");
/// assert!(err.to_string().contains("sigma"));
/// assert!(err.is_invalid_input());
/// ```
#[derive(Debug, Error)]
pub enum SimError {
    /// A simulation or distribution parameter is outside its domain.
    #[error("Invalid parameter: {param} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// A sample is too short for an unbiased variance estimate.
    #[error("Sample {which} has {len} observations, at least {min} are required")]
    InsufficientSamples {
        /// Which sample ("a" or "b")
        which: &'static str,
        /// Observed length
        len: usize,
        /// Minimum length
        min: usize,
    },

    /// A caller-supplied observation is NaN or infinite.
    #[error("Sample {which} has a non-finite observation at index {index}")]
    NonFiniteObservation {
        /// Which sample ("a", "b" or "t")
        which: &'static str,
        /// Position of the offending value
        index: usize,
    },

    /// Configuration could not be parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
    },

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The background worker thread is no longer running.
    #[error("Simulation worker disconnected")]
    WorkerDisconnected,
}

impl SimError {
    /// Create an invalid parameter error from any displayable value
    #[must_use]
    pub fn invalid_parameter(
        param: &str,
        value: impl std::fmt::Display,
        constraint: &str,
    ) -> Self {
        Self::InvalidParameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }

    /// Whether this error belongs to the invalid-input class
    /// (rejected before any computation).
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. }
                | Self::InsufficientSamples { .. }
                | Self::NonFiniteObservation { .. }
        )
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, SimError>;
