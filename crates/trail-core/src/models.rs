use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ── SourceKind ────────────────────────────────────────────────────────────────

/// One origin of command-usage evidence on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Shell history files (`~/.bash_history`, `~/.zsh_history`).
    History,
    /// The live process table (`ps aux`).
    Process,
    /// The general system log (`/var/log/syslog`).
    Syslog,
    /// The authentication log (`/var/log/auth.log`).
    Auth,
    /// auditd execution records (`ausearch -m EXECVE`).
    Audit,
}

impl SourceKind {
    /// All sources in collection order. The order is fixed so that two runs
    /// over identical inputs ingest tokens in the same sequence.
    pub const ALL: [SourceKind; 5] = [
        SourceKind::History,
        SourceKind::Process,
        SourceKind::Syslog,
        SourceKind::Auth,
        SourceKind::Audit,
    ];

    /// Stable lowercase label used in reports and JSON payloads.
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::History => "history",
            SourceKind::Process => "process",
            SourceKind::Syslog => "syslog",
            SourceKind::Auth => "auth",
            SourceKind::Audit => "audit",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── RawLine ───────────────────────────────────────────────────────────────────

/// A single line of evidence text tagged with its origin.
///
/// Produced by a source reader and consumed by the extractor within one run;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Which source produced this line.
    pub source: SourceKind,
    /// The raw line text, untrimmed.
    pub text: String,
}

impl RawLine {
    pub fn new(source: SourceKind, text: impl Into<String>) -> Self {
        Self {
            source,
            text: text.into(),
        }
    }
}

// ── CommandToken ──────────────────────────────────────────────────────────────

/// A normalized command name extracted from evidence.
///
/// Equality is exact string match after normalization, so `/usr/bin/ls` from
/// an audit record and `ls` from shell history merge into one token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandToken(String);

impl CommandToken {
    /// Normalize a raw candidate into a token, or reject it.
    ///
    /// Normalization rules, applied in order:
    /// 1. trim whitespace and surrounding quotes;
    /// 2. reject flags (`-v`), comments (`#...`) and kernel threads (`[kworker]`);
    /// 3. take the basename of a path-qualified command (`/usr/bin/ls` → `ls`);
    /// 4. trim trailing `:` and `;` left over from log punctuation;
    /// 5. reject environment assignments (`FOO=bar`) and candidates without
    ///    any ASCII letter;
    /// 6. lowercase.
    pub fn parse(raw: &str) -> Option<Self> {
        let candidate = raw.trim().trim_matches(|c| c == '"' || c == '\'');
        if candidate.is_empty()
            || candidate.starts_with('-')
            || candidate.starts_with('#')
            || candidate.starts_with('[')
        {
            return None;
        }

        let candidate = candidate.rsplit('/').next().unwrap_or(candidate);
        let candidate = candidate.trim_end_matches([':', ';']);

        if candidate.is_empty()
            || candidate.contains('=')
            || !candidate.chars().any(|c| c.is_ascii_alphabetic())
        {
            return None;
        }

        Some(Self(candidate.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for CommandToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ── FrequencyTable ────────────────────────────────────────────────────────────

/// Command → occurrence-count mapping, the central aggregated artifact.
///
/// Backed by a `BTreeMap` so iteration order is deterministic regardless of
/// insertion order. Increment is the only mutation; a token is never present
/// with a count of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<CommandToken, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `token`.
    pub fn record(&mut self, token: CommandToken) {
        *self.counts.entry(token).or_insert(0) += 1;
    }

    /// Number of distinct commands.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts; equals the total number of tokens recorded.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Count for a single command name, if present.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.counts.get(name).copied()
    }

    /// Iterate entries in lexicographic command order.
    pub fn iter(&self) -> impl Iterator<Item = (&CommandToken, u64)> {
        self.counts.iter().map(|(token, count)| (token, *count))
    }

    /// Entries ranked by count descending, ties broken by command name
    /// ascending.
    pub fn ranked(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .counts
            .iter()
            .map(|(token, count)| (token.as_str().to_string(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

// ── SourceReport ──────────────────────────────────────────────────────────────

/// Per-source collection outcome, reported so an analyst can assess evidence
/// completeness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReport {
    /// The source this report covers.
    pub kind: SourceKind,
    /// Whether the source could be read at all.
    pub available: bool,
    /// Raw lines produced by the reader.
    pub lines_read: usize,
    /// Tokens that survived extraction and normalization.
    pub commands_extracted: usize,
    /// Unavailability reason (file missing, spawn error, non-zero exit, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SourceReport {
    /// Report for a source that could not be read.
    pub fn unavailable(kind: SourceKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            available: false,
            lines_read: 0,
            commands_extracted: 0,
            detail: Some(detail.into()),
        }
    }

    /// Report for a source that produced `lines_read` raw lines.
    pub fn available(kind: SourceKind, lines_read: usize) -> Self {
        Self {
            kind,
            available: true,
            lines_read,
            commands_extracted: 0,
            detail: None,
        }
    }
}

// ── CollectionSummary ─────────────────────────────────────────────────────────

/// End-of-run summary across all sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSummary {
    /// ISO-8601 timestamp when the collection ran.
    pub generated_at: String,
    /// Wall-clock seconds spent reading and extracting.
    pub elapsed_seconds: f64,
    /// One report per source, in collection order.
    pub sources: Vec<SourceReport>,
    /// Total raw lines read across all sources.
    pub total_lines: usize,
    /// Total tokens extracted across all sources; equals the frequency table
    /// total by construction.
    pub total_commands: u64,
    /// Number of distinct commands in the frequency table.
    pub unique_commands: usize,
}

impl CollectionSummary {
    /// Sources that could not be read.
    pub fn unavailable(&self) -> Vec<SourceKind> {
        self.sources
            .iter()
            .filter(|r| !r.available)
            .map(|r| r.kind)
            .collect()
    }
}

// ── ExportRecord ──────────────────────────────────────────────────────────────

/// One `(command, count)` pair in the export record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub command: String,
    pub count: u64,
}

/// The on-disk snapshot of a [`FrequencyTable`].
///
/// Contains no timestamps: identical inputs must serialize to byte-identical
/// output. Entries are ordered by count descending, then command ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Sum of all counts.
    pub total_commands: u64,
    /// Number of distinct commands.
    pub unique_commands: usize,
    /// Ranked `(command, count)` pairs.
    pub commands: Vec<ExportEntry>,
}

impl ExportRecord {
    pub fn from_table(table: &FrequencyTable) -> Self {
        Self {
            total_commands: table.total(),
            unique_commands: table.len(),
            commands: table
                .ranked()
                .into_iter()
                .map(|(command, count)| ExportEntry { command, count })
                .collect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> CommandToken {
        CommandToken::parse(s).unwrap()
    }

    // ── CommandToken::parse ───────────────────────────────────────────────────

    #[test]
    fn test_parse_plain_command() {
        assert_eq!(token("ls").as_str(), "ls");
    }

    #[test]
    fn test_parse_strips_path_prefix() {
        assert_eq!(token("/usr/bin/ls").as_str(), "ls");
        assert_eq!(token("./script.sh").as_str(), "script.sh");
    }

    #[test]
    fn test_parse_path_and_bare_form_merge() {
        assert_eq!(token("/usr/bin/ls"), token("ls"));
    }

    #[test]
    fn test_parse_lowercases() {
        assert_eq!(token("Grep").as_str(), "grep");
    }

    #[test]
    fn test_parse_trims_quotes_and_punctuation() {
        assert_eq!(token("\"ls\"").as_str(), "ls");
        assert_eq!(token("cron:").as_str(), "cron");
        assert_eq!(token("ls;").as_str(), "ls");
    }

    #[test]
    fn test_parse_rejects_flags_and_comments() {
        assert!(CommandToken::parse("-la").is_none());
        assert!(CommandToken::parse("#1699999999").is_none());
    }

    #[test]
    fn test_parse_rejects_kernel_threads() {
        assert!(CommandToken::parse("[kworker/0:1]").is_none());
        assert!(CommandToken::parse("[migration/12]").is_none());
    }

    #[test]
    fn test_parse_rejects_env_assignments() {
        assert!(CommandToken::parse("FOO=bar").is_none());
    }

    #[test]
    fn test_parse_rejects_non_alphabetic() {
        assert!(CommandToken::parse("12345").is_none());
        assert!(CommandToken::parse("...").is_none());
        assert!(CommandToken::parse("").is_none());
        assert!(CommandToken::parse("   ").is_none());
    }

    #[test]
    fn test_parse_keeps_hyphens_and_digits() {
        assert_eq!(token("apt-get").as_str(), "apt-get");
        assert_eq!(token("python3").as_str(), "python3");
    }

    // ── FrequencyTable ────────────────────────────────────────────────────────

    #[test]
    fn test_table_records_and_counts() {
        let mut table = FrequencyTable::new();
        table.record(token("ls"));
        table.record(token("ls"));
        table.record(token("grep"));

        assert_eq!(table.len(), 2);
        assert_eq!(table.total(), 3);
        assert_eq!(table.get("ls"), Some(2));
        assert_eq!(table.get("grep"), Some(1));
        assert_eq!(table.get("vim"), None);
    }

    #[test]
    fn test_table_conservation() {
        let tokens = ["ls", "ls", "grep", "vim", "ls", "grep"];
        let mut table = FrequencyTable::new();
        for t in tokens {
            table.record(token(t));
        }
        assert_eq!(table.total(), tokens.len() as u64);
    }

    #[test]
    fn test_table_no_zero_counts() {
        let mut table = FrequencyTable::new();
        table.record(token("ls"));
        assert!(table.iter().all(|(_, count)| count >= 1));
    }

    #[test]
    fn test_ranked_count_desc_then_name_asc() {
        let mut table = FrequencyTable::new();
        for _ in 0..5 {
            table.record(token("b"));
        }
        for _ in 0..5 {
            table.record(token("a"));
        }
        for _ in 0..3 {
            table.record(token("c"));
        }

        let ranked = table.ranked();
        assert_eq!(
            ranked,
            vec![
                ("a".to_string(), 5),
                ("b".to_string(), 5),
                ("c".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_ranked_independent_of_insertion_order() {
        let mut first = FrequencyTable::new();
        for t in ["vim", "ls", "ls", "grep"] {
            first.record(token(t));
        }
        let mut second = FrequencyTable::new();
        for t in ["grep", "ls", "vim", "ls"] {
            second.record(token(t));
        }
        assert_eq!(first.ranked(), second.ranked());
    }

    // ── ExportRecord ──────────────────────────────────────────────────────────

    #[test]
    fn test_export_record_from_table() {
        let mut table = FrequencyTable::new();
        table.record(token("ls"));
        table.record(token("ls"));
        table.record(token("grep"));

        let record = ExportRecord::from_table(&table);
        assert_eq!(record.total_commands, 3);
        assert_eq!(record.unique_commands, 2);
        assert_eq!(record.commands[0].command, "ls");
        assert_eq!(record.commands[0].count, 2);
    }

    #[test]
    fn test_export_record_empty_table() {
        let record = ExportRecord::from_table(&FrequencyTable::new());
        assert_eq!(record.total_commands, 0);
        assert_eq!(record.unique_commands, 0);
        assert!(record.commands.is_empty());
    }

    #[test]
    fn test_export_record_serialization_deterministic() {
        let mut table = FrequencyTable::new();
        for t in ["ls", "grep", "ls"] {
            table.record(token(t));
        }
        let a = serde_json::to_string_pretty(&ExportRecord::from_table(&table)).unwrap();
        let b = serde_json::to_string_pretty(&ExportRecord::from_table(&table)).unwrap();
        assert_eq!(a, b);
    }

    // ── SourceKind / SourceReport ─────────────────────────────────────────────

    #[test]
    fn test_source_kind_labels() {
        let labels: Vec<&str> = SourceKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["history", "process", "syslog", "auth", "audit"]);
    }

    #[test]
    fn test_source_report_unavailable() {
        let report = SourceReport::unavailable(SourceKind::Auth, "file missing");
        assert!(!report.available);
        assert_eq!(report.lines_read, 0);
        assert_eq!(report.detail.as_deref(), Some("file missing"));
    }

    #[test]
    fn test_summary_unavailable_sources() {
        let summary = CollectionSummary {
            generated_at: "2024-01-15T10:00:00Z".to_string(),
            elapsed_seconds: 0.1,
            sources: vec![
                SourceReport::available(SourceKind::History, 10),
                SourceReport::unavailable(SourceKind::Auth, "permission denied"),
            ],
            total_lines: 10,
            total_commands: 8,
            unique_commands: 4,
        };
        assert_eq!(summary.unavailable(), vec![SourceKind::Auth]);
    }
}
