//! Simulate command implementation
//!
//! Runs a batch of simulated two-group experiments and reports how often
//! the t-test came out significant.

use crate::error::{CliError, Result};
use crate::output::{self, OutputFormat};
use colored::Colorize;
use pvalsim::config::{Preset, SimulatorConfig};
use pvalsim::monte_carlo::{SimulationBatch, SimulationEngine, SimulationRequest};
use pvalsim::stats::{BatchSummary, PValueHistogram, RateInterpretation};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Command-line overrides, applied over the config file and preset.
#[derive(Debug, Default)]
pub(crate) struct SimulateOptions {
    pub(crate) config: Option<PathBuf>,
    pub(crate) preset: Option<Preset>,
    pub(crate) delta: Option<f64>,
    pub(crate) sigma: Option<f64>,
    pub(crate) n: Option<usize>,
    pub(crate) trials: Option<usize>,
    pub(crate) alpha: Option<f64>,
    pub(crate) seed: Option<u64>,
    pub(crate) bins: Option<usize>,
    pub(crate) parallel: bool,
    pub(crate) format: OutputFormat,
}

#[derive(Serialize)]
struct Report<'a> {
    request: &'a SimulationRequest,
    seed: u64,
    degenerate_trials: usize,
    summary: &'a BatchSummary,
    histogram: &'a PValueHistogram,
    p_values: &'a [f64],
}

/// Run the simulate command
pub(crate) fn run(options: &SimulateOptions) -> Result<()> {
    let config = resolve_config(options)?;
    let request = config.request()?;

    let engine = config
        .seed
        .map_or_else(SimulationEngine::from_entropy, SimulationEngine::reproducible)
        .with_parallel(options.parallel);
    let batch = engine.run(&request)?;

    let summary =
        BatchSummary::from_p_values(batch.p_values(), config.alpha)?.with_delta(request.delta);
    let histogram =
        PValueHistogram::from_p_values(batch.p_values(), config.histogram_bins, config.alpha)?;

    match options.format {
        OutputFormat::Table => print_table(&batch, &summary, &histogram),
        OutputFormat::Json => {
            let report = Report {
                request: &batch.request,
                seed: batch.seed,
                degenerate_trials: batch.degenerate_trials,
                summary: &summary,
                histogram: &histogram,
                p_values: batch.p_values(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Csv => write_csv(&mut std::io::stdout().lock(), batch.p_values())?,
    }
    Ok(())
}

/// Layer defaults, config file, preset and flags, in that order.
pub(crate) fn resolve_config(options: &SimulateOptions) -> Result<SimulatorConfig> {
    let mut config = match &options.config {
        Some(path) if !path.exists() => return Err(CliError::FileNotFound(path.clone())),
        Some(path) => SimulatorConfig::from_json_file(path)?,
        None => SimulatorConfig::default(),
    };

    if let Some(preset) = options.preset {
        config.apply_preset(preset);
    }
    if let Some(delta) = options.delta {
        config.delta = delta;
    }
    if let Some(sigma) = options.sigma {
        config.sigma = sigma;
    }
    if let Some(n) = options.n {
        config.n = n;
    }
    if let Some(trials) = options.trials {
        config.trials = trials;
    }
    if let Some(alpha) = options.alpha {
        config.alpha = alpha;
    }
    if options.seed.is_some() {
        config.seed = options.seed;
    }
    if let Some(bins) = options.bins {
        config.histogram_bins = bins;
    }

    tracing::debug!(?config, "resolved configuration");
    Ok(config)
}

fn print_table(batch: &SimulationBatch, summary: &BatchSummary, histogram: &PValueHistogram) {
    let request = &batch.request;

    output::section("Simulation");
    output::kv("delta", request.delta);
    output::kv("sigma", request.sigma);
    output::kv("n per group", request.n);
    output::kv("trials", request.trials);
    output::kv("seed", batch.seed);

    output::section("Results");
    output::kv("alpha", summary.alpha);
    output::kv(
        &format!("p < {}", summary.alpha),
        format!(
            "{} of {} ({:.1}%)",
            summary.significant,
            summary.trials,
            summary.significant_percent()
        ),
    );
    if let Some(mean_p) = summary.mean_p {
        output::kv("mean p", format!("{mean_p:.4}"));
    }
    let rate = format!("{:.1}%", summary.significant_percent()).bold();
    output::kv(summary.interpretation.label(), rate);

    match summary.interpretation {
        RateInterpretation::FalsePositiveRate => output::info(&format!(
            "There is no real difference, so every p < {} is a false positive; \
             the rate should sit near {:.0}%.",
            summary.alpha,
            summary.alpha * 100.0
        )),
        RateInterpretation::Power => output::info(&format!(
            "A real difference of {} exists; this share of experiments detected it.",
            request.delta
        )),
    }
    if batch.degenerate_trials > 0 {
        output::warning(&format!(
            "{} trials had zero standard error",
            batch.degenerate_trials
        ));
    }

    output::section("p-value histogram");
    output::histogram(histogram);
}

fn write_csv<W: Write>(out: &mut W, p_values: &[f64]) -> Result<()> {
    writeln!(out, "trial,p_value")?;
    for (i, p) in p_values.iter().enumerate() {
        writeln!(out, "{i},{p}")?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_preset() {
        let options = SimulateOptions {
            preset: Some(Preset::Big),
            n: Some(12),
            ..SimulateOptions::default()
        };
        let config = resolve_config(&options).unwrap();
        assert_eq!(config.delta, 1.0);
        assert_eq!(config.n, 12);
        assert_eq!(config.trials, 1000);
    }

    #[test]
    fn test_missing_config_file() {
        let options = SimulateOptions {
            config: Some(PathBuf::from("/definitely/not/here.json")),
            ..SimulateOptions::default()
        };
        assert!(matches!(
            resolve_config(&options),
            Err(CliError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_csv_layout() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[0.5, 0.01]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "trial,p_value\n0,0.5\n1,0.01\n");
    }
}
