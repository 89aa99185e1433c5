//! Export layer for cmdtrail.
//!
//! Serializes the aggregated frequency table to a JSON record and renders
//! the ranked bar chart, overwriting the fixed artifact paths on each run.

pub mod chart;
pub mod writer;

pub use trail_core as core;
