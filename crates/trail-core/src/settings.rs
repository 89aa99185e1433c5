use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Command-usage evidence collection and presentation for Linux hosts
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cmdtrail",
    about = "Aggregate command-usage evidence from shell history, the process \
             table, system logs and auditd into a ranked frequency table",
    version
)]
pub struct Settings {
    /// Directory where export artifacts are written
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Number of top commands shown in the chart (1-100)
    #[arg(long, default_value = "20", value_parser = clap::value_parser!(u16).range(1..=100))]
    pub top: u16,

    /// Dashboard port on 127.0.0.1
    #[arg(long, default_value = "8050")]
    pub port: u16,

    /// Export only; do not start the dashboard
    #[arg(long)]
    pub no_dashboard: bool,

    /// Do not open a browser when the dashboard starts
    #[arg(long)]
    pub no_browser: bool,

    /// Timeout in seconds for external commands (ps, ausearch)
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..=600))]
    pub command_timeout_secs: u64,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path (stderr when unset)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ── Tests ──────────────────────────────────────────────────────────────────────
