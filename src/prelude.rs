//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use pvalsim::prelude::*;
//! ```

pub use crate::config::{Preset, SimulatorConfig};
pub use crate::error::{Result, SimError};
pub use crate::monte_carlo::{
    run_batch, run_batch_parallel, CancelToken, MonteCarloRng, SimulationBatch, SimulationEngine,
    SimulationRequest, SimulationWorker, WorkerEvent,
};
pub use crate::stats::{
    student_t_cdf, two_sample_ttest, BatchSummary, PValueHistogram, RateInterpretation, TestResult,
};
