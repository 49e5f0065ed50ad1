//! Ttest command implementation

use crate::error::Result;
use crate::output;
use pvalsim::stats::{two_sample_ttest, TestResult};
use serde::Serialize;

/// JSON shape of a t-test result.
///
/// JSON has no infinity, so an infinite `t` is written as `null` with its
/// sign spelled out in `t_infinite`.
#[derive(Debug, Serialize)]
struct TtestReport {
    t: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    t_infinite: Option<&'static str>,
    df: usize,
    p_value: f64,
    degenerate: bool,
}

impl From<&TestResult> for TtestReport {
    fn from(result: &TestResult) -> Self {
        let t_infinite = match result.t {
            t if t == f64::INFINITY => Some("+inf"),
            t if t == f64::NEG_INFINITY => Some("-inf"),
            _ => None,
        };
        Self {
            t: result.t.is_finite().then_some(result.t),
            t_infinite,
            df: result.df,
            p_value: result.p_value,
            degenerate: result.degenerate,
        }
    }
}

/// Run a pooled two-sample t-test on the given samples
pub(crate) fn run(sample_a: &[f64], sample_b: &[f64], json: bool) -> Result<()> {
    let result = two_sample_ttest(sample_a, sample_b)?;

    if json {
        let report = TtestReport::from(&result);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::section("Two-sample t-test (pooled variance)");
    output::kv("n", format!("{} vs {}", sample_a.len(), sample_b.len()));
    output::kv("t", format!("{:.6}", result.t));
    output::kv("df", result.df);
    output::kv("p (two-tailed)", format!("{:.6}", result.p_value));
    if result.degenerate {
        output::warning("both samples are constant; the standard error is zero");
    }
    Ok(())
}
