//! Top-level collection pipeline for cmdtrail.
//!
//! Runs every source reader in fixed order, feeds raw lines through the
//! extractor, aggregates the tokens into one frequency table and returns it
//! alongside the per-source collection summary.

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info};
use trail_core::models::{
    CollectionSummary, CommandToken, FrequencyTable, SourceKind,
};

use crate::aggregator::CommandAggregator;
use crate::extract;
use crate::sources::{self, CollectorConfig};

// ── Public types ──────────────────────────────────────────────────────────────

/// The complete output of [`collect_commands`].
#[derive(Debug, Clone)]
pub struct CollectionResult {
    /// The aggregated command frequency table.
    pub table: FrequencyTable,
    /// Per-source availability and extraction counts.
    pub summary: CollectionSummary,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full collection pipeline.
///
/// Sources are read sequentially in [`SourceKind::ALL`] order so that two
/// runs over identical inputs ingest tokens in the same sequence. A source
/// that cannot be read contributes nothing and is marked unavailable in the
/// summary; it never aborts the run.
pub fn collect_commands(cfg: &CollectorConfig) -> CollectionResult {
    let started = Instant::now();

    let mut reports = Vec::with_capacity(SourceKind::ALL.len());
    let mut tokens: Vec<CommandToken> = Vec::new();
    let mut total_lines = 0usize;

    for kind in SourceKind::ALL {
        let (lines, mut report) = match kind {
            SourceKind::History => sources::read_history(cfg),
            SourceKind::Process => sources::read_processes(cfg),
            SourceKind::Syslog => sources::read_log_file(SourceKind::Syslog, &cfg.syslog_file),
            SourceKind::Auth => sources::read_log_file(SourceKind::Auth, &cfg.auth_log_file),
            SourceKind::Audit => sources::read_audit(cfg),
        };

        total_lines += report.lines_read;

        let before = tokens.len();
        tokens.extend(lines.iter().filter_map(extract::extract));
        report.commands_extracted = tokens.len() - before;

        debug!(
            "Source {}: {} lines, {} commands extracted",
            kind, report.lines_read, report.commands_extracted
        );
        reports.push(report);
    }

    let table = CommandAggregator::aggregate(tokens);

    let summary = CollectionSummary {
        generated_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        elapsed_seconds: started.elapsed().as_secs_f64(),
        sources: reports,
        total_lines,
        total_commands: table.total(),
        unique_commands: table.len(),
    };

    info!(
        "Collected {} commands ({} unique) from {} lines in {:.2}s",
        summary.total_commands,
        summary.unique_commands,
        summary.total_lines,
        summary.elapsed_seconds
    );

    CollectionResult { table, summary }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
