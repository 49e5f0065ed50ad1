//! Monte Carlo simulation of t-test p-values.
//!
//! - [`engine`]: random streams, requests and the batch driver
//! - [`worker`]: background thread with supersede-on-submit cancellation
//!
//! # Example
//!
//! ```
//! use pvalsim::monte_carlo::{SimulationEngine, SimulationRequest};
//!
//! // No true effect: about 5% of p-values fall below 0.05.
//! let request = SimulationRequest::new(0.0, 1.0, 30, 1000).unwrap();
//! let batch = SimulationEngine::reproducible(42).run(&request).unwrap();
//! assert_eq!(batch.len(), 1000);
//! ```

pub mod engine;
pub mod worker;

pub use engine::{
    run_batch, run_batch_parallel, run_batch_with_cancel, run_batch_with_rng, sample_normal,
    CancelToken, MonteCarloRng, SimulationBatch, SimulationEngine, SimulationRequest,
    MAX_GROUP_SIZE, MAX_TRIALS, PARALLEL_CHUNK_TRIALS,
};
pub use worker::{JobId, SimulationWorker, WorkerEvent};
