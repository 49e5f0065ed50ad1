//! Seedable random source and normal sampling.
//!
//! Every batch owns its own [`MonteCarloRng`]; there is no global random
//! state, so two batches with the same seed draw identical trials and
//! concurrent batches never share a stream.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::f64::consts::PI;

/// Draw from Normal(mu, sigma²) with the Box-Muller transform.
///
/// `mu + sigma * sqrt(-2 ln U1) * cos(2π U2)` with `U1` in (0, 1): a zero
/// draw is discarded and redrawn so the logarithm stays finite.
///
/// Works with any [`rand::Rng`], so callers may inject their own generator.
///
/// # Examples
///
/// ```
/// use pvalsim::monte_carlo::sample_normal;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let x = sample_normal(&mut rng, 10.0, 2.0);
/// assert!(x.is_finite());
/// ```
pub fn sample_normal<R: Rng + ?Sized>(rng: &mut R, mu: f64, sigma: f64) -> f64 {
    let u1 = open_unit(rng);
    let u2: f64 = rng.gen();
    mu + sigma * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u: f64 = rng.gen();
        if u > 0.0 {
            return u;
        }
    }
}

/// Reproducible random number generator for simulations.
#[derive(Debug, Clone)]
pub struct MonteCarloRng {
    inner: StdRng,
    seed: u64,
}

impl MonteCarloRng {
    /// Create a generator from a fixed seed
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a generator from operating-system entropy.
    ///
    /// The drawn seed is recorded so the run can be replayed.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Generator for stream `stream` derived from `seed`.
    ///
    /// Distinct streams are decorrelated through SplitMix64 mixing, which is
    /// what parallel chunks and worker jobs use.
    #[must_use]
    pub fn derived(seed: u64, stream: u64) -> Self {
        Self::new(splitmix64(seed ^ splitmix64(stream.wrapping_add(1))))
    }

    /// Seed this generator was created from
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in [0, 1)
    pub fn uniform(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Standard normal draw
    pub fn standard_normal(&mut self) -> f64 {
        sample_normal(&mut self.inner, 0.0, 1.0)
    }

    /// Normal draw with mean `mu` and standard deviation `sigma`
    pub fn normal(&mut self, mu: f64, sigma: f64) -> f64 {
        sample_normal(&mut self.inner, mu, sigma)
    }

    /// Fill a new sample of `n` normal draws
    #[must_use]
    pub fn normal_sample(&mut self, n: usize, mu: f64, sigma: f64) -> Vec<f64> {
        (0..n).map(|_| self.normal(mu, sigma)).collect()
    }

    /// Fresh seed for a child generator
    pub fn next_seed(&mut self) -> u64 {
        self.inner.next_u64()
    }
}

impl RngCore for MonteCarloRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// SplitMix64 finalizer (Steele, Lea & Flood 2014).
#[must_use]
pub(crate) fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
