//! Shared foundation for cmdtrail.
//!
//! Defines the evidence data model (sources, raw lines, command tokens,
//! the frequency table), the error taxonomy, and the CLI settings shared
//! by the collection, export and dashboard crates.

pub mod error;
pub mod models;
pub mod settings;
