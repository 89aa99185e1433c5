//! Source readers for the five evidence origins.
//!
//! Each reader produces raw lines plus a [`SourceReport`] describing whether
//! the source could be read. Failures are never fatal: a missing file, an
//! uninstalled utility or a non-zero exit yields an empty line set and an
//! `available = false` report, and the run continues.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};
use trail_core::models::{RawLine, SourceKind, SourceReport};

// ── CollectorConfig ───────────────────────────────────────────────────────────

/// Explicit configuration for all source readers.
///
/// Defaults point at the well-known host locations; tests override the paths
/// and commands to point at fixtures.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Shell history files, read in order when present.
    pub history_files: Vec<PathBuf>,
    /// The general system log.
    pub syslog_file: PathBuf,
    /// The authentication log.
    pub auth_log_file: PathBuf,
    /// Process-listing command and arguments.
    pub ps_command: Vec<String>,
    /// Audit-search command and arguments, scoped to execution events.
    pub audit_command: Vec<String>,
    /// Upper bound on external command runtime.
    pub command_timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            history_files: vec![home.join(".bash_history"), home.join(".zsh_history")],
            syslog_file: PathBuf::from("/var/log/syslog"),
            auth_log_file: PathBuf::from("/var/log/auth.log"),
            ps_command: vec!["ps".into(), "aux".into()],
            audit_command: vec!["ausearch".into(), "-m".into(), "EXECVE".into()],
            command_timeout: Duration::from_secs(30),
        }
    }
}

// ── File-backed readers ───────────────────────────────────────────────────────

/// Read all configured shell history files.
///
/// One [`RawLine`] per non-empty line. The per-file results are folded into a
/// single `history` report; the source counts as available when at least one
/// file could be read.
pub fn read_history(cfg: &CollectorConfig) -> (Vec<RawLine>, SourceReport) {
    let mut lines: Vec<RawLine> = Vec::new();
    let mut files_read = 0usize;

    for path in &cfg.history_files {
        match read_text_lines(path) {
            Ok(file_lines) => {
                files_read += 1;
                lines.extend(
                    file_lines
                        .into_iter()
                        .filter(|l| !l.trim().is_empty())
                        .map(|l| RawLine::new(SourceKind::History, l)),
                );
            }
            Err(e) => {
                debug!("History file {} skipped: {}", path.display(), e);
            }
        }
    }

    if files_read == 0 {
        warn!("No shell history files could be read");
        return (
            Vec::new(),
            SourceReport::unavailable(SourceKind::History, "no history files readable"),
        );
    }

    let report = SourceReport::available(SourceKind::History, lines.len());
    (lines, report)
}

/// Read one system log file line-by-line.
///
/// `kind` must be [`SourceKind::Syslog`] or [`SourceKind::Auth`]; the file is
/// streamed through a `BufReader` so large logs are never loaded wholesale.
pub fn read_log_file(kind: SourceKind, path: &Path) -> (Vec<RawLine>, SourceReport) {
    match read_text_lines(path) {
        Ok(file_lines) => {
            let lines: Vec<RawLine> = file_lines
                .into_iter()
                .map(|l| RawLine::new(kind, l))
                .collect();
            let report = SourceReport::available(kind, lines.len());
            (lines, report)
        }
        Err(e) => {
            warn!("Log file {} unavailable: {}", path.display(), e);
            (Vec::new(), SourceReport::unavailable(kind, e.to_string()))
        }
    }
}

// ── Subprocess-backed readers ─────────────────────────────────────────────────

/// Run the process-listing utility and capture one [`RawLine`] per process
/// row, excluding the header row.
pub fn read_processes(cfg: &CollectorConfig) -> (Vec<RawLine>, SourceReport) {
    run_source_command(SourceKind::Process, &cfg.ps_command, cfg.command_timeout, 1)
}

/// Run the audit-search utility scoped to execution events.
///
/// `ausearch` exits non-zero both when auditd is absent and when no records
/// match; either way the source is reported unavailable.
pub fn read_audit(cfg: &CollectorConfig) -> (Vec<RawLine>, SourceReport) {
    run_source_command(SourceKind::Audit, &cfg.audit_command, cfg.command_timeout, 0)
}

fn run_source_command(
    kind: SourceKind,
    command: &[String],
    timeout: Duration,
    skip_lines: usize,
) -> (Vec<RawLine>, SourceReport) {
    let Some((program, args)) = command.split_first() else {
        return (
            Vec::new(),
            SourceReport::unavailable(kind, "no command configured"),
        );
    };

    match run_with_timeout(program, args, timeout) {
        Ok(output) if output.status.success() => {
            let text = String::from_utf8_lossy(&output.stdout).into_owned();
            let lines: Vec<RawLine> = text
                .lines()
                .skip(skip_lines)
                .filter(|l| !l.trim().is_empty())
                .map(|l| RawLine::new(kind, l))
                .collect();
            let report = SourceReport::available(kind, lines.len());
            (lines, report)
        }
        Ok(output) => {
            let detail = format!("{} exited with {}", program, output.status);
            warn!("Source {} unavailable: {}", kind, detail);
            (Vec::new(), SourceReport::unavailable(kind, detail))
        }
        Err(e) => {
            let detail = format!("{}: {}", program, e);
            warn!("Source {} unavailable: {}", kind, detail);
            (Vec::new(), SourceReport::unavailable(kind, detail))
        }
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Stream a text file into lines. Lines that are not valid UTF-8 are skipped;
/// shell history files routinely contain a few.
fn read_text_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut out = Vec::new();
    for line in reader.lines() {
        match line {
            Ok(l) => out.push(l),
            Err(_) => continue,
        }
    }
    Ok(out)
}

/// Run an external command with a bounded runtime.
///
/// Stdout is drained on a helper thread so a chatty child never blocks on a
/// full pipe while the parent polls for exit. On timeout the child is killed
/// and a `TimedOut` error is returned.
pub(crate) fn run_with_timeout(
    program: &str,
    args: &[String],
    timeout: Duration,
) -> std::io::Result<Output> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    let stdout_pipe = child.stdout.take();
    let drain = std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = stdout_pipe {
            use std::io::Read;
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = drain.join();
                return Err(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("timed out after {}s", timeout.as_secs()),
                ));
            }
            None => std::thread::sleep(Duration::from_millis(25)),
        }
    };

    let stdout = drain.join().unwrap_or_default();
    Ok(Output {
        status,
        stdout,
        stderr: Vec::new(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
