//! Simulator configuration and presets.
//!
//! Configuration is plain JSON; every field is optional and falls back to
//! the defaults below.
//!
//! ```json
//! { "delta": 0.5, "n": 40, "seed": 7 }
//! ```

use crate::error::{Result, SimError};
use crate::monte_carlo::SimulationRequest;
use crate::stats::summary::{validate_alpha, DEFAULT_ALPHA, DEFAULT_BINS};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Everything needed to run and report one batch.
///
/// # Examples
///
/// ```
/// use pvalsim::config::{Preset, SimulatorConfig};
///
/// let mut config = SimulatorConfig::default();
/// config.apply_preset(Preset::Big);
/// assert_eq!(config.delta, 1.0);
/// assert_eq!(config.n, 30);
/// let request = config.request().unwrap();
/// assert_eq!(request.trials, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// True difference of means
    pub delta: f64,
    /// Shared standard deviation
    pub sigma: f64,
    /// Observations per group
    pub n: usize,
    /// Number of simulated experiments
    pub trials: usize,
    /// Significance level for the summary
    pub alpha: f64,
    /// Random seed; `None` draws one from entropy
    pub seed: Option<u64>,
    /// Histogram resolution over [0, 1]
    pub histogram_bins: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            delta: 0.0,
            sigma: 1.0,
            n: 30,
            trials: 1000,
            alpha: DEFAULT_ALPHA,
            seed: None,
            histogram_bins: DEFAULT_BINS,
        }
    }
}

impl SimulatorConfig {
    /// Load from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read and
    /// [`SimError::Config`] if it is not valid configuration JSON.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content).map_err(|e| match e {
            SimError::Config { message } => SimError::Config {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        })
    }

    /// Parse from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] on malformed JSON or unknown value types.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Overwrite `delta` and `n` with the preset's values.
    pub fn apply_preset(&mut self, preset: Preset) {
        let (delta, n) = preset.values();
        self.delta = delta;
        self.n = n;
    }

    /// Check the reporting fields and build the simulation request.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidParameter`] for any out-of-domain field.
    pub fn request(&self) -> Result<SimulationRequest> {
        validate_alpha(self.alpha)?;
        if self.histogram_bins == 0 {
            return Err(SimError::invalid_parameter(
                "histogram_bins",
                self.histogram_bins,
                "histogram_bins >= 1",
            ));
        }
        SimulationRequest::new(self.delta, self.sigma, self.n, self.trials)
    }

    /// Snap the simulation parameters onto the interactive control grid.
    ///
    /// Non-finite `delta` or `sigma` are left alone so that
    /// [`SimulatorConfig::request`] still rejects them.
    #[must_use]
    pub fn clamp_to_controls(&self) -> Self {
        Self {
            delta: ControlRange::DELTA.snap(self.delta),
            sigma: ControlRange::SIGMA.snap(self.sigma),
            n: ControlRange::N.snap(self.n as f64) as usize,
            trials: ControlRange::TRIALS.snap(self.trials as f64) as usize,
            ..self.clone()
        }
    }
}

/// Named starting points for common scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// No effect (δ = 0, n = 30): every rejection is a false positive
    Null,
    /// Small effect (δ = 0.3, n = 50): modest power
    Small,
    /// Big effect (δ = 1.0, n = 30): high power
    Big,
}

impl Preset {
    /// All presets, in display order
    pub const ALL: [Preset; 3] = [Preset::Null, Preset::Small, Preset::Big];

    /// `(delta, n)` of this preset
    #[must_use]
    pub fn values(self) -> (f64, usize) {
        match self {
            Self::Null => (0.0, 30),
            Self::Small => (0.3, 50),
            Self::Big => (1.0, 30),
        }
    }

    /// Lowercase name used on the command line and in JSON
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Small => "small",
            Self::Big => "big",
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SimError::invalid_parameter("preset", s, "one of null, small, big"))
    }
}

/// Range and step of one interactive control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlRange {
    /// Smallest selectable value
    pub min: f64,
    /// Largest selectable value
    pub max: f64,
    /// Grid spacing from `min`
    pub step: f64,
}

impl ControlRange {
    /// True difference of means
    pub const DELTA: Self = Self {
        min: -3.0,
        max: 3.0,
        step: 0.1,
    };
    /// Standard deviation
    pub const SIGMA: Self = Self {
        min: 0.1,
        max: 3.0,
        step: 0.1,
    };
    /// Observations per group
    pub const N: Self = Self {
        min: 5.0,
        max: 300.0,
        step: 1.0,
    };
    /// Number of simulated experiments
    pub const TRIALS: Self = Self {
        min: 100.0,
        max: 5000.0,
        step: 100.0,
    };

    /// Clamp into range and round to the nearest grid point.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }

    /// Whether `value` lies inside the range
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}
