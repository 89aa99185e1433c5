mod bootstrap;

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use trail_core::models::CollectionSummary;
use trail_core::settings::Settings;
use trail_data::collect::collect_commands;
use trail_data::sources::CollectorConfig;
use trail_export::writer::write_outputs;
use trail_web::server::{DashboardServer, Snapshot};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("cmdtrail v{} starting", env!("CARGO_PKG_VERSION"));

    // ── Collect ───────────────────────────────────────────────────────────────
    println!("\nCollecting command evidence...");
    let cfg = CollectorConfig {
        command_timeout: Duration::from_secs(settings.command_timeout_secs),
        ..CollectorConfig::default()
    };
    let result = collect_commands(&cfg);

    print!("{}", render_summary(&result.summary));

    // ── Export ────────────────────────────────────────────────────────────────
    let (record_path, chart_path) = write_outputs(
        &result.table,
        &settings.output_dir,
        usize::from(settings.top),
    )?;
    println!(
        "Results saved to {} and {}",
        record_path.display(),
        chart_path.display()
    );

    if settings.no_dashboard {
        return Ok(());
    }

    // ── Dashboard ─────────────────────────────────────────────────────────────
    let snapshot = Arc::new(Snapshot::new(
        result.table.ranked(),
        result.summary,
        usize::from(settings.top),
    ));
    let server = DashboardServer::new(snapshot, settings.port);

    let url = format!("http://127.0.0.1:{}", settings.port);
    println!("Dashboard at {} (Ctrl+C to stop)", url);

    if !settings.no_browser {
        // Open the browser once the server has had a moment to bind.
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            if let Err(e) = open::that(&url) {
                tracing::warn!("Could not open browser: {e}");
                eprintln!("Open manually: {}", url);
            }
        });
    }

    tokio::select! {
        result = server.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down dashboard");
        }
    }

    Ok(())
}

/// Render the end-of-run evidence summary.
///
/// Lists every source with its availability and extraction counts so an
/// analyst can judge how complete the collected evidence is.
fn render_summary(summary: &CollectionSummary) -> String {
    let mut out = String::new();
    writeln!(out, "\nEvidence sources:").ok();
    for report in &summary.sources {
        if report.available {
            writeln!(
                out,
                "  {:<8} {} lines read, {} commands extracted",
                report.kind, report.lines_read, report.commands_extracted
            )
            .ok();
        } else {
            writeln!(
                out,
                "  {:<8} unavailable ({})",
                report.kind,
                report.detail.as_deref().unwrap_or("unknown reason")
            )
            .ok();
        }
    }
    writeln!(
        out,
        "Total: {} commands ({} unique) in {:.2}s\n",
        summary.total_commands, summary.unique_commands, summary.elapsed_seconds
    )
    .ok();
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
