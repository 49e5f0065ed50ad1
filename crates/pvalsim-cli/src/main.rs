//! pvalsim - p-value simulator CLI
//!
//! Usage:
//!   pvalsim simulate                          # defaults: δ=0, σ=1, n=30, 1000 trials
//!   pvalsim simulate --preset big --seed 42   # reproducible power study
//!   pvalsim simulate --config sim.json -f csv # p-values as CSV
//!   pvalsim ttest --a 1,2,3 --b 4,5,6         # one pooled t-test
//!   pvalsim cdf 2.0 10                        # Student's t CDF

use clap::{Parser, Subcommand};
use pvalsim::config::Preset;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

use commands::{cdf, simulate, ttest};
use output::OutputFormat;

/// pvalsim - simulate p-values of the two-sample t-test
///
/// Draws many pairs of normal samples with a known true difference and
/// shows how the resulting p-values are distributed.
#[derive(Parser)]
#[command(name = "pvalsim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a batch of simulated experiments
    Simulate {
        /// True difference of means (group B minus group A)
        #[arg(long, allow_negative_numbers = true)]
        delta: Option<f64>,

        /// Shared standard deviation
        #[arg(long)]
        sigma: Option<f64>,

        /// Observations per group
        #[arg(short, long)]
        n: Option<usize>,

        /// Number of simulated experiments
        #[arg(short, long)]
        trials: Option<usize>,

        /// Significance level
        #[arg(short, long)]
        alpha: Option<f64>,

        /// Random seed (drawn from entropy when omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Starting scenario: null, small or big
        #[arg(short, long)]
        preset: Option<Preset>,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Histogram bins over [0, 1]
        #[arg(short, long)]
        bins: Option<usize>,

        /// Spread trials across all cores
        #[arg(long)]
        parallel: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Pooled two-sample t-test on comma-separated samples
    Ttest {
        /// First sample
        #[arg(long = "a", value_delimiter = ',', required = true, allow_negative_numbers = true)]
        a: Vec<f64>,

        /// Second sample
        #[arg(long = "b", value_delimiter = ',', required = true, allow_negative_numbers = true)]
        b: Vec<f64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Student's t cumulative distribution function
    Cdf {
        /// t statistic
        #[arg(allow_negative_numbers = true)]
        t: f64,

        /// Degrees of freedom
        df: f64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Simulate {
            delta,
            sigma,
            n,
            trials,
            alpha,
            seed,
            preset,
            config,
            bins,
            parallel,
            format,
        } => simulate::run(&simulate::SimulateOptions {
            config,
            preset,
            delta,
            sigma,
            n,
            trials,
            alpha,
            seed,
            bins,
            parallel,
            format,
        }),

        Commands::Ttest { a, b, json } => ttest::run(&a, &b, json),

        Commands::Cdf { t, df, json } => cdf::run(t, df, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
