//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use pvalsim::stats::PValueHistogram;

/// Widest histogram bar, in characters
pub(crate) const BAR_WIDTH: usize = 40;

/// Output format for simulation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable summary and histogram
    #[default]
    Table,
    /// Full report as JSON
    Json,
    /// One p-value per row
    Csv,
}

/// Print a section header
pub(crate) fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").cyan().bold());
}

/// Print a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

/// Print a warning message
pub(crate) fn warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// Print an info message
pub(crate) fn info(msg: &str) {
    println!("{} {}", "[INFO]".blue(), msg);
}

/// Bar length for `count` when the tallest bin holds `max`
pub(crate) fn bar_len(count: usize, max: usize) -> usize {
    if max == 0 {
        return 0;
    }
    let len = (count * BAR_WIDTH + max / 2) / max;
    // Any non-empty bin stays visible.
    if count > 0 {
        len.max(1)
    } else {
        0
    }
}

/// Print a horizontal bar histogram; bins at or below α are drawn red.
pub(crate) fn histogram(histogram: &PValueHistogram) {
    let max = histogram.max_count();
    for bin in &histogram.bins {
        let bar = "█".repeat(bar_len(bin.count, max));
        let bar = if bin.below_alpha {
            bar.red()
        } else {
            bar.blue()
        };
        println!(
            "  {:.3}-{:.3} | {:<width$} {}",
            bin.lower,
            bin.upper,
            bar,
            bin.count,
            width = BAR_WIDTH
        );
    }
}
