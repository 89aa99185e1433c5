//! Command extraction heuristics, one per evidence source.
//!
//! [`extract`] is a pure function from a raw line to at most one
//! [`CommandToken`]. Lines that do not match the source's pattern yield
//! `None` silently; malformed input never errors.

use std::sync::OnceLock;

use regex::Regex;
use trail_core::models::{CommandToken, RawLine, SourceKind};

/// `COMMAND=/usr/bin/apt` entries written by sudo into syslog/auth.log.
fn command_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"COMMAND=(\S+)").expect("static regex"))
}

/// The `a0="..."` argv field of an auditd EXECVE record.
fn execve_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"argc=\d+.*?a0="([^"]+)""#).expect("static regex"))
}

/// Extract the command token from one raw line, dispatching on its source.
pub fn extract(line: &RawLine) -> Option<CommandToken> {
    match line.source {
        SourceKind::History => extract_history(&line.text),
        SourceKind::Process => extract_process(&line.text),
        SourceKind::Syslog | SourceKind::Auth => extract_log(&line.text),
        SourceKind::Audit => extract_audit(&line.text),
    }
}

// ── Per-source heuristics ─────────────────────────────────────────────────────

/// First whitespace-delimited token of a history line.
///
/// Strips the zsh extended-history prefix (`: <ts>:<elapsed>;cmd`) and a
/// leading numeric index column (`  123  cmd` from `history` dumps). Comment
/// and timestamp lines starting with `#` yield nothing.
fn extract_history(text: &str) -> Option<CommandToken> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return None;
    }

    let text = match text.strip_prefix(": ") {
        Some(rest) => rest.split_once(';').map(|(_, cmd)| cmd).unwrap_or(rest),
        None => text,
    };

    let mut tokens = text.split_whitespace();
    let first = tokens.next()?;
    let candidate = if first.chars().all(|c| c.is_ascii_digit()) {
        tokens.next()?
    } else {
        first
    };

    CommandToken::parse(candidate)
}

/// The command column of a `ps aux` row: the 11th whitespace-delimited field.
/// Rows with fewer fields yield nothing.
fn extract_process(text: &str) -> Option<CommandToken> {
    let candidate = text.split_whitespace().nth(10)?;
    CommandToken::parse(candidate)
}

/// `COMMAND=` entries in syslog/auth.log; anything else yields nothing.
fn extract_log(text: &str) -> Option<CommandToken> {
    let captures = command_re().captures(text)?;
    CommandToken::parse(captures.get(1)?.as_str())
}

/// The `a0` argv field of an EXECVE audit record; non-exec records yield
/// nothing.
fn extract_audit(text: &str) -> Option<CommandToken> {
    let captures = execve_re().captures(text)?;
    CommandToken::parse(captures.get(1)?.as_str())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
