//! pvalsim: Monte Carlo study of t-test p-values.
//!
//! Simulates many two-group experiments with a known true effect, runs a
//! pooled two-sample t-test on each, and collects the p-values. With no
//! effect the p-values are uniform and the share below α is the
//! false-positive rate; with an effect that share is the power.
//!
//! # Quick Start
//!
//! ```
//! use pvalsim::prelude::*;
//!
//! let request = SimulationRequest::new(1.0, 1.0, 30, 500).unwrap();
//! let batch = run_batch(&request, &mut MonteCarloRng::new(42)).unwrap();
//!
//! let summary = BatchSummary::from_p_values(batch.p_values(), 0.05)
//!     .unwrap()
//!     .with_delta(request.delta);
//! assert_eq!(summary.interpretation, RateInterpretation::Power);
//! assert!(summary.significant_fraction > 0.8);
//! ```
//!
//! # Modules
//!
//! - [`stats`]: special functions, t distribution, t-test, batch summaries
//! - [`monte_carlo`]: random streams, batch driver and background worker
//! - [`config`]: JSON configuration, presets and control ranges
//! - [`error`]: the crate-wide error type

pub mod config;
pub mod error;
pub mod monte_carlo;
pub mod prelude;
pub mod stats;

pub use error::{Result, SimError};
