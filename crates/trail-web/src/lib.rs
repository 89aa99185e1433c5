//! Dashboard layer for cmdtrail.
//!
//! Serves the aggregated frequency table over a local axum server: a
//! searchable list view, a filtered chart view and a collection summary,
//! all read-only over an immutable snapshot taken once at startup.

pub mod page;
pub mod server;

pub use trail_core as core;
