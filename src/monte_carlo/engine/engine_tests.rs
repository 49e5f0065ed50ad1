use super::*;
use crate::error::SimError;

fn request(delta: f64, sigma: f64, n: usize, trials: usize) -> SimulationRequest {
    SimulationRequest::new(delta, sigma, n, trials).expect("valid request")
}

#[test]
fn test_engine_basic_simulation() {
    let batch = SimulationEngine::reproducible(42)
        .run(&request(0.0, 1.0, 30, 100))
        .expect("batch runs");

    assert_eq!(batch.len(), 100);
    assert_eq!(batch.seed, 42);
    assert_eq!(batch.degenerate_trials, 0);
    assert!(batch.p_values().iter().all(|p| (0.0..=1.0).contains(p)));
}

#[test]
fn test_engine_reproducibility() {
    let req = request(0.4, 1.5, 12, 200);
    let b1 = SimulationEngine::reproducible(42).run(&req).expect("batch runs");
    let b2 = SimulationEngine::reproducible(42).run(&req).expect("batch runs");

    for (p1, p2) in b1.p_values().iter().zip(b2.p_values()) {
        assert_eq!(p1.to_bits(), p2.to_bits(), "same seed must give same p-values");
    }
}

#[test]
fn test_engine_different_seeds() {
    let req = request(0.0, 1.0, 10, 50);
    let b1 = SimulationEngine::reproducible(1).run(&req).expect("batch runs");
    let b2 = SimulationEngine::reproducible(2).run(&req).expect("batch runs");
    assert_ne!(b1.p_values, b2.p_values);
}

#[test]
fn test_invalid_request_consumes_no_randomness() {
    let bad = SimulationRequest {
        delta: 0.0,
        sigma: -1.0,
        n: 30,
        trials: 10,
    };
    let mut rng = MonteCarloRng::new(5);
    let err = run_batch(&bad, &mut rng).unwrap_err();
    assert!(matches!(err, SimError::InvalidParameter { .. }));

    let mut fresh = MonteCarloRng::new(5);
    assert_eq!(rng.uniform().to_bits(), fresh.uniform().to_bits());
}

#[test]
fn test_invalid_n_and_trials_rejected() {
    let mut rng = MonteCarloRng::new(5);
    for bad in [
        SimulationRequest {
            delta: 0.0,
            sigma: 1.0,
            n: 1,
            trials: 10,
        },
        SimulationRequest {
            delta: 0.0,
            sigma: 1.0,
            n: 5,
            trials: 0,
        },
    ] {
        assert!(run_batch(&bad, &mut rng).unwrap_err().is_invalid_input());
        assert!(run_batch_parallel(&bad, 1).unwrap_err().is_invalid_input());
    }
}

#[test]
fn test_oversized_request_rejected_before_allocation() {
    let huge = SimulationRequest {
        delta: 0.0,
        sigma: 1.0,
        n: 30,
        trials: usize::MAX / 4,
    };
    let mut rng = MonteCarloRng::new(5);
    assert!(run_batch(&huge, &mut rng).unwrap_err().is_invalid_input());
    assert!(run_batch_parallel(&huge, 5).unwrap_err().is_invalid_input());
    assert!(run_batch_with_cancel(&huge, &mut rng, &CancelToken::new())
        .unwrap_err()
        .is_invalid_input());

    let wide = SimulationRequest {
        n: MAX_GROUP_SIZE + 1,
        trials: 1,
        ..huge
    };
    assert!(run_batch(&wide, &mut rng).unwrap_err().is_invalid_input());
}

#[test]
fn test_minimum_sample_size() {
    let batch = run_batch(&request(0.5, 1.0, 2, 500), &mut MonteCarloRng::new(3))
        .expect("n = 2 is valid");
    assert!(batch
        .p_values()
        .iter()
        .all(|p| p.is_finite() && (0.0..=1.0).contains(p)));
}

#[test]
fn test_large_effect_small_noise_rejects_everything() {
    let batch = run_batch(&request(5.0, 0.1, 10, 100), &mut MonteCarloRng::new(11))
        .expect("batch runs");
    assert_eq!(batch.rejection_rate(0.001), 1.0);
}

#[test]
fn test_cancelled_token_discards_batch() {
    let token = CancelToken::new();
    token.cancel();
    let out = run_batch_with_cancel(&request(0.0, 1.0, 10, 100), &mut MonteCarloRng::new(1), &token)
        .expect("valid request");
    assert!(out.is_none());
}

#[test]
fn test_live_token_completes() {
    let token = CancelToken::new();
    let out = run_batch_with_cancel(&request(0.0, 1.0, 10, 100), &mut MonteCarloRng::new(1), &token)
        .expect("valid request")
        .expect("not cancelled");
    let direct = run_batch(&request(0.0, 1.0, 10, 100), &mut MonteCarloRng::new(1)).expect("runs");
    assert_eq!(out, direct);
}

#[test]
fn test_injected_rng() {
    use rand::SeedableRng;

    let mut rng = rand::rngs::StdRng::seed_from_u64(99);
    let p_values = run_batch_with_rng(&request(0.0, 1.0, 8, 64), &mut rng).expect("runs");
    assert_eq!(p_values.len(), 64);

    // MonteCarloRng wraps the same generator, so the streams agree.
    let wrapped = run_batch(&request(0.0, 1.0, 8, 64), &mut MonteCarloRng::new(99)).expect("runs");
    assert_eq!(p_values, wrapped.p_values);
}

#[test]
fn test_parallel_batch_length_and_reproducibility() {
    let trials = 3 * PARALLEL_CHUNK_TRIALS + 17;
    let req = request(0.2, 1.0, 15, trials);

    let b1 = run_batch_parallel(&req, 77).expect("runs");
    let b2 = SimulationEngine::reproducible(77)
        .with_parallel(true)
        .run(&req)
        .expect("runs");

    assert_eq!(b1.len(), trials);
    assert_eq!(b1.p_values, b2.p_values);
    assert!(b1.p_values().iter().all(|p| (0.0..=1.0).contains(p)));
}

#[test]
fn test_parallel_chunks_use_distinct_streams() {
    let req = request(0.0, 1.0, 10, 2 * PARALLEL_CHUNK_TRIALS);
    let batch = run_batch_parallel(&req, 5).expect("runs");
    let (first, second) = batch.p_values().split_at(PARALLEL_CHUNK_TRIALS);
    assert_ne!(first, second);
}

#[test]
fn test_entropy_engine_records_seed() {
    let engine = SimulationEngine::from_entropy();
    let batch = engine.run(&request(0.0, 1.0, 5, 10)).expect("runs");
    assert_eq!(batch.seed, engine.seed());
}
