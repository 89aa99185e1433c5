//! Evidence ingestion layer for cmdtrail.
//!
//! Responsible for reading the evidence sources (shell history, process
//! table, system logs, auditd), extracting command tokens from raw lines,
//! aggregating them into a frequency table and running the top-level
//! collection pipeline.

pub mod aggregator;
pub mod collect;
pub mod extract;
pub mod sources;

pub use trail_core as core;
