//! Batch simulation driver
//!
//! Each trial draws group A from Normal(0, σ²) and group B from
//! Normal(δ, σ²), `n` observations each, runs the pooled two-sample t-test
//! and records its p-value. Results are returned only once the whole batch
//! has finished, so a superseded batch can be dropped without side effects.

mod rng;
mod types;

pub use rng::{sample_normal, MonteCarloRng};
pub use types::{CancelToken, SimulationBatch, SimulationRequest, MAX_GROUP_SIZE, MAX_TRIALS};

use crate::error::Result;
use crate::stats::hypothesis::{two_sample_ttest, TestResult};
use rand::Rng;
use rayon::prelude::*;
use std::time::Instant;

/// Trials per independently seeded chunk in parallel runs.
pub const PARALLEL_CHUNK_TRIALS: usize = 256;

/// Run one trial, reusing the caller's sample buffers.
fn run_trial<R: Rng + ?Sized>(
    request: &SimulationRequest,
    rng: &mut R,
    group_a: &mut Vec<f64>,
    group_b: &mut Vec<f64>,
) -> Result<TestResult> {
    group_a.clear();
    group_b.clear();
    group_a.extend((0..request.n).map(|_| sample_normal(rng, 0.0, request.sigma)));
    group_b.extend((0..request.n).map(|_| sample_normal(rng, request.delta, request.sigma)));
    two_sample_ttest(group_a, group_b)
}

/// Trials gathered by one pass of the driver loop.
struct Trials {
    p_values: Vec<f64>,
    degenerate: usize,
    completed: bool,
}

/// Trial loop shared by every entry point.
///
/// `keep_going` is polled before each trial; the loop stops early with
/// `completed == false` once it returns `false`.
fn drive<R, F>(request: &SimulationRequest, rng: &mut R, mut keep_going: F) -> Result<Trials>
where
    R: Rng + ?Sized,
    F: FnMut() -> bool,
{
    let mut p_values = Vec::with_capacity(request.trials.min(PARALLEL_CHUNK_TRIALS));
    let mut degenerate = 0;
    let mut group_a = Vec::with_capacity(request.n);
    let mut group_b = Vec::with_capacity(request.n);

    for _ in 0..request.trials {
        if !keep_going() {
            return Ok(Trials {
                p_values,
                degenerate,
                completed: false,
            });
        }
        let result = run_trial(request, rng, &mut group_a, &mut group_b)?;
        degenerate += usize::from(result.degenerate);
        p_values.push(result.p_value);
    }

    Ok(Trials {
        p_values,
        degenerate,
        completed: true,
    })
}

fn log_start(request: &SimulationRequest, seed: u64) -> Instant {
    tracing::debug!(
        target: "pvalsim::engine",
        delta = request.delta,
        sigma = request.sigma,
        n = request.n,
        trials = request.trials,
        seed,
        "batch started"
    );
    Instant::now()
}

/// Run a full batch with the given random stream.
///
/// The request is validated before any random draw.
///
/// # Errors
///
/// Returns [`crate::error::SimError::InvalidParameter`] for an invalid
/// request; no partial batch is produced.
///
/// # Examples
///
/// ```
/// use pvalsim::monte_carlo::{run_batch, MonteCarloRng, SimulationRequest};
///
/// let request = SimulationRequest::new(0.0, 1.0, 10, 50).unwrap();
/// let mut rng = MonteCarloRng::new(42);
/// let batch = run_batch(&request, &mut rng).unwrap();
/// assert_eq!(batch.len(), 50);
/// assert!(batch.p_values().iter().all(|p| (0.0..=1.0).contains(p)));
/// ```
pub fn run_batch(request: &SimulationRequest, rng: &mut MonteCarloRng) -> Result<SimulationBatch> {
    request.validate()?;
    let seed = rng.seed();
    let started = log_start(request, seed);
    let trials = drive(request, rng, || true)?;
    Ok(finish(request, seed, trials.p_values, trials.degenerate, started))
}

/// Run a batch that can be abandoned through `cancel`.
///
/// The token is checked before every trial. Returns `Ok(None)` if it fires
/// before completion; the partial p-values are discarded.
///
/// # Errors
///
/// Same as [`run_batch`].
pub fn run_batch_with_cancel(
    request: &SimulationRequest,
    rng: &mut MonteCarloRng,
    cancel: &CancelToken,
) -> Result<Option<SimulationBatch>> {
    request.validate()?;
    let seed = rng.seed();
    let started = log_start(request, seed);
    let trials = drive(request, rng, || !cancel.is_cancelled())?;
    if !trials.completed {
        tracing::debug!(
            target: "pvalsim::engine",
            seed,
            done = trials.p_values.len(),
            "batch cancelled"
        );
        return Ok(None);
    }
    Ok(Some(finish(
        request,
        seed,
        trials.p_values,
        trials.degenerate,
        started,
    )))
}

/// Run a batch with any injected [`rand::Rng`], returning bare p-values.
///
/// # Errors
///
/// Same as [`run_batch`].
pub fn run_batch_with_rng<R: Rng + ?Sized>(
    request: &SimulationRequest,
    rng: &mut R,
) -> Result<Vec<f64>> {
    request.validate()?;
    Ok(drive(request, rng, || true)?.p_values)
}

/// Run a batch across the rayon thread pool.
///
/// Trials are split into chunks of [`PARALLEL_CHUNK_TRIALS`]; chunk `k`
/// draws from `MonteCarloRng::derived(seed, k)`. Output is concatenated in
/// chunk order, so a seed reproduces the same batch on any thread count.
///
/// # Errors
///
/// Same as [`run_batch`].
pub fn run_batch_parallel(request: &SimulationRequest, seed: u64) -> Result<SimulationBatch> {
    request.validate()?;
    let started = log_start(request, seed);
    let n_chunks = request.trials.div_ceil(PARALLEL_CHUNK_TRIALS);
    tracing::debug!(target: "pvalsim::engine", chunks = n_chunks, "running in parallel");

    let chunks = (0..n_chunks)
        .into_par_iter()
        .map(|k| {
            let start = k * PARALLEL_CHUNK_TRIALS;
            let len = PARALLEL_CHUNK_TRIALS.min(request.trials - start);
            let chunk_request = SimulationRequest {
                trials: len,
                ..*request
            };
            let mut rng = MonteCarloRng::derived(seed, k as u64);
            drive(&chunk_request, &mut rng, || true)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut p_values = Vec::with_capacity(request.trials);
    let mut degenerate_trials = 0;
    for chunk in chunks {
        p_values.extend(chunk.p_values);
        degenerate_trials += chunk.degenerate;
    }

    Ok(finish(request, seed, p_values, degenerate_trials, started))
}

fn finish(
    request: &SimulationRequest,
    seed: u64,
    p_values: Vec<f64>,
    degenerate_trials: usize,
    started: Instant,
) -> SimulationBatch {
    if degenerate_trials > 0 {
        tracing::warn!(
            target: "pvalsim::engine",
            degenerate_trials,
            "trials with zero standard error were scored by the zero-variance policy"
        );
    }
    tracing::debug!(
        target: "pvalsim::engine",
        trials = p_values.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch finished"
    );

    SimulationBatch {
        request: *request,
        seed,
        p_values,
        degenerate_trials,
    }
}

/// Configured simulation runner.
///
/// # Example
///
/// ```
/// use pvalsim::monte_carlo::{SimulationEngine, SimulationRequest};
///
/// let request = SimulationRequest::new(1.0, 1.0, 30, 200).unwrap();
/// let batch = SimulationEngine::reproducible(7).run(&request).unwrap();
/// assert_eq!(batch.seed, 7);
/// assert!(batch.rejection_rate(0.05) > 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    seed: u64,
    parallel: bool,
}

impl SimulationEngine {
    /// Engine with a fixed seed
    #[must_use]
    pub fn reproducible(seed: u64) -> Self {
        Self {
            seed,
            parallel: false,
        }
    }

    /// Engine seeded from operating-system entropy
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::reproducible(MonteCarloRng::from_entropy().seed())
    }

    /// Spread trials across the rayon pool
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Seed in use
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run one batch.
    ///
    /// # Errors
    ///
    /// Same as [`run_batch`].
    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationBatch> {
        if self.parallel {
            run_batch_parallel(request, self.seed)
        } else {
            run_batch(request, &mut MonteCarloRng::new(self.seed))
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
