//! Command implementations

pub(crate) mod cdf;
pub(crate) mod simulate;
pub(crate) mod ttest;
