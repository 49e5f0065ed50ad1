//! Cdf command implementation

use crate::error::Result;
use crate::output;
use pvalsim::stats::{student_t_cdf, two_tailed_p_value};
use serde::Serialize;

#[derive(Serialize)]
struct CdfReport {
    t: f64,
    df: f64,
    cdf: f64,
    two_tailed_p: f64,
}

/// Print P(T <= t) for Student's t with `df` degrees of freedom
pub(crate) fn run(t: f64, df: f64, json: bool) -> Result<()> {
    let report = CdfReport {
        t,
        df,
        cdf: student_t_cdf(t, df)?,
        two_tailed_p: two_tailed_p_value(t, df)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::section("Student's t distribution");
        output::kv("t", report.t);
        output::kv("df", report.df);
        output::kv("P(T <= t)", format!("{:.8}", report.cdf));
        output::kv("two-tailed p", format!("{:.8}", report.two_tailed_p));
    }
    Ok(())
}
