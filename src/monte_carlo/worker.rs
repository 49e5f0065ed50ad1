//! Background simulation worker.
//!
//! Long batches run on a dedicated thread so an interactive front end stays
//! responsive. Submitting a new request supersedes the previous one: its
//! [`CancelToken`] is fired and its output is never delivered as completed.
//!
//! # Example
//!
//! ```
//! use pvalsim::monte_carlo::{SimulationRequest, SimulationWorker};
//!
//! let mut worker = SimulationWorker::spawn(Some(42)).unwrap();
//! let job = worker.submit(SimulationRequest::new(0.0, 1.0, 10, 100).unwrap()).unwrap();
//! let batch = worker.wait_for(job).unwrap().expect("not superseded");
//! assert_eq!(batch.len(), 100);
//! ```

use super::engine::{
    run_batch_with_cancel, CancelToken, MonteCarloRng, SimulationBatch, SimulationRequest,
};
use crate::error::{Result, SimError};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

/// Identifier of a submitted job, increasing in submission order.
pub type JobId = u64;

/// Outcome of a job, delivered in the order jobs finish.
#[derive(Debug)]
pub enum WorkerEvent {
    /// The full batch finished and was not superseded.
    Completed {
        /// Job identifier
        job: JobId,
        /// Completed batch
        batch: SimulationBatch,
    },
    /// The job was superseded or cancelled; its partial output was dropped.
    Cancelled {
        /// Job identifier
        job: JobId,
    },
    /// The batch failed.
    Failed {
        /// Job identifier
        job: JobId,
        /// Cause
        error: SimError,
    },
}

impl WorkerEvent {
    /// Job this event belongs to
    #[must_use]
    pub fn job(&self) -> JobId {
        match self {
            Self::Completed { job, .. } | Self::Cancelled { job } | Self::Failed { job, .. } => {
                *job
            }
        }
    }
}

struct Job {
    id: JobId,
    request: SimulationRequest,
    seed: u64,
    token: CancelToken,
}

/// Handle to a simulation thread.
pub struct SimulationWorker {
    jobs: Option<Sender<Job>>,
    events: Receiver<WorkerEvent>,
    handle: Option<JoinHandle<()>>,
    seeds: MonteCarloRng,
    next_id: JobId,
    in_flight: Option<CancelToken>,
}

impl std::fmt::Debug for SimulationWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationWorker")
            .field("next_id", &self.next_id)
            .field("running", &self.handle.is_some())
            .finish_non_exhaustive()
    }
}

impl SimulationWorker {
    /// Start the worker thread.
    ///
    /// With `Some(seed)` every job seed is derived from it, so the sequence
    /// of submitted jobs is reproducible. `None` seeds from entropy.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the thread cannot be spawned.
    pub fn spawn(seed: Option<u64>) -> Result<Self> {
        let (job_tx, job_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();

        let handle = std::thread::Builder::new()
            .name("pvalsim-worker".to_string())
            .spawn(move || worker_loop(&job_rx, &event_tx))?;

        let seeds = seed.map_or_else(MonteCarloRng::from_entropy, MonteCarloRng::new);
        Ok(Self {
            jobs: Some(job_tx),
            events: event_rx,
            handle: Some(handle),
            seeds,
            next_id: 0,
            in_flight: None,
        })
    }

    /// Queue a request, superseding the previous one.
    ///
    /// The request is validated here, before it reaches the thread.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] for an invalid request and
    /// [`SimError::WorkerDisconnected`] if the thread has exited.
    pub fn submit(&mut self, request: SimulationRequest) -> Result<JobId> {
        request.validate()?;
        self.cancel();

        let id = self.next_id;
        self.next_id += 1;
        let token = CancelToken::new();
        let job = Job {
            id,
            request,
            seed: self.seeds.next_seed(),
            token: token.clone(),
        };

        self.jobs
            .as_ref()
            .ok_or(SimError::WorkerDisconnected)?
            .send(job)
            .map_err(|_| SimError::WorkerDisconnected)?;
        self.in_flight = Some(token);
        Ok(id)
    }

    /// Cancel the most recently submitted job, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }

    /// Block until the next event.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::WorkerDisconnected`] if the thread has exited.
    pub fn recv(&self) -> Result<WorkerEvent> {
        self.events.recv().map_err(|_| SimError::WorkerDisconnected)
    }

    /// Wait up to `timeout` for the next event.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::WorkerDisconnected`] if the thread has exited.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<WorkerEvent>> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(SimError::WorkerDisconnected),
        }
    }

    /// Poll for an event without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::WorkerDisconnected`] if the thread has exited.
    pub fn try_recv(&self) -> Result<Option<WorkerEvent>> {
        match self.events.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SimError::WorkerDisconnected),
        }
    }

    /// Block until `job` resolves, discarding events of other jobs.
    ///
    /// Returns `Ok(None)` if the job was superseded.
    ///
    /// # Errors
    ///
    /// Returns the job's own error, or [`SimError::WorkerDisconnected`].
    pub fn wait_for(&self, job: JobId) -> Result<Option<SimulationBatch>> {
        loop {
            match self.recv()? {
                WorkerEvent::Completed { job: id, batch } if id == job => return Ok(Some(batch)),
                WorkerEvent::Cancelled { job: id } if id == job => return Ok(None),
                WorkerEvent::Failed { job: id, error } if id == job => return Err(error),
                _ => {}
            }
        }
    }
}

impl Drop for SimulationWorker {
    fn drop(&mut self) {
        self.cancel();
        drop(self.jobs.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!(target: "pvalsim::worker", "worker thread panicked");
            }
        }
    }
}

fn worker_loop(jobs: &Receiver<Job>, events: &Sender<WorkerEvent>) {
    while let Ok(mut job) = jobs.recv() {
        // Only the newest queued job can still matter.
        while let Ok(newer) = jobs.try_recv() {
            tracing::debug!(target: "pvalsim::worker", job = job.id, "skipping superseded job");
            if events.send(WorkerEvent::Cancelled { job: job.id }).is_err() {
                return;
            }
            job = newer;
        }

        let event = if job.token.is_cancelled() {
            WorkerEvent::Cancelled { job: job.id }
        } else {
            let mut rng = MonteCarloRng::new(job.seed);
            match run_batch_with_cancel(&job.request, &mut rng, &job.token) {
                Ok(Some(batch)) => WorkerEvent::Completed { job: job.id, batch },
                Ok(None) => WorkerEvent::Cancelled { job: job.id },
                Err(error) => WorkerEvent::Failed { job: job.id, error },
            }
        };

        if events.send(event).is_err() {
            return;
        }
    }
}
