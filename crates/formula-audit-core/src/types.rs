//! Core types for offenses and audit results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::syntax::{Position, SyntaxNode};

/// Severity level for offenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Style or convention issue.
    Convention,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
    /// Fatal problem with the formula.
    Fatal,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Convention => write!(f, "convention"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "convention" | "info" => Ok(Self::Convention),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// Half-open byte range `[start, end)` in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl TextRange {
    /// Creates a new range.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the range is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if two edits on these ranges would interfere.
    ///
    /// Ranges sharing a start offset always conflict, so two insertions at
    /// the same point are never both applied.
    #[must_use]
    pub fn overlaps(&self, other: &TextRange) -> bool {
        self.start == other.start || (self.start < other.end && other.start < self.end)
    }
}

/// An automatic correction: replace `range` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Byte range to replace.
    pub range: TextRange,
    /// Replacement text.
    pub replacement: String,
}

impl Fix {
    /// Replaces the given range.
    #[must_use]
    pub fn replace(range: TextRange, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    /// Replaces the full text of a node.
    #[must_use]
    pub fn replace_node(node: &SyntaxNode, replacement: impl Into<String>) -> Self {
        Self::replace(node.range.bytes(), replacement)
    }

    /// Deletes the given range.
    #[must_use]
    pub fn remove(range: TextRange) -> Self {
        Self::replace(range, "")
    }
}

/// Offense as emitted by a rule, before the dispatcher attaches rule metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffenseDraft {
    /// Where the offense is reported.
    pub position: Position,
    /// Length of the highlighted span in bytes.
    pub length: usize,
    /// Human-readable message.
    pub message: String,
    /// Optional correction.
    pub fix: Option<Fix>,
}

impl OffenseDraft {
    /// Creates a draft at an explicit position.
    #[must_use]
    pub fn at(position: Position, length: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            length,
            message: message.into(),
            fix: None,
        }
    }

    /// Creates a draft covering a node.
    #[must_use]
    pub fn at_node(node: &SyntaxNode, message: impl Into<String>) -> Self {
        Self::at(node.start(), node.range.bytes().len(), message)
    }

    /// Creates a draft at the content of a string or symbol literal.
    #[must_use]
    pub fn at_content(node: &SyntaxNode, message: impl Into<String>) -> Self {
        Self::at(node.content_start(), node.content_range().len(), message)
    }

    /// Attaches a correction.
    #[must_use]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path, or `None` for in-memory sources.
    pub file: Option<PathBuf>,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed, in characters).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: Option<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }

    /// Display form of the file, `<source>` for in-memory sources.
    #[must_use]
    pub fn file_display(&self) -> String {
        self.file
            .as_ref()
            .map_or_else(|| "<source>".to_string(), |p| p.display().to_string())
    }
}

/// An offense found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offense {
    /// Rule code (e.g., "FA001").
    pub code: String,
    /// Rule name (e.g., "deprecated-dependency").
    pub rule: String,
    /// Rule family (e.g., "lines").
    pub family: String,
    /// Severity of this offense.
    pub severity: Severity,
    /// Where the offense is reported.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Full text of the reported line.
    pub source_line: String,
    /// Correction, if the rule supports one and it survived conflict resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
    /// Set when the correction was dropped because it overlapped another one.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fix_conflict: bool,
}

impl Offense {
    /// Returns true if this offense can be corrected automatically.
    #[must_use]
    pub fn is_correctable(&self) -> bool {
        self.fix.is_some()
    }

    /// Formats the offense for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file_display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if !self.source_line.is_empty() {
            let _ = writeln!(output, "  | {}", self.source_line);
        }
        if self.fix.is_some() {
            let _ = writeln!(output, "  = help: correctable with --fix");
        } else if self.fix_conflict {
            let _ = writeln!(output, "  = note: correction skipped (overlaps another fix)");
        }
        output
    }
}

impl std::fmt::Display for Offense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file_display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Converts an Offense to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct OffenseDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Offense> for OffenseDiagnostic {
    fn from(o: &Offense) -> Self {
        Self {
            message: format!("[{}] {}", o.code, o.message),
            help: o
                .fix
                .as_ref()
                .map(|fix| format!("replace with `{}`", fix.replacement)),
            span: SourceSpan::from((o.location.offset, o.location.length)),
            label_message: o.rule.clone(),
        }
    }
}

/// A rule that panicked while checking a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    /// Rule name.
    pub rule: String,
    /// File being checked, if any.
    pub file: Option<PathBuf>,
    /// Panic message.
    pub message: String,
}

/// A file that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    /// File path.
    pub file: PathBuf,
    /// Parser or I/O error message.
    pub message: String,
}

/// Result of auditing a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Offenses grouped by rule in catalogue order.
    pub offenses: Vec<Offense>,
    /// Rules that failed on this file.
    pub rule_failures: Vec<RuleFailure>,
}

/// Offense counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// Fatal offenses.
    pub fatal: usize,
    /// Errors.
    pub error: usize,
    /// Warnings.
    pub warning: usize,
    /// Convention offenses.
    pub convention: usize,
}

/// Result of auditing a set of files.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AuditResult {
    /// All offenses found, grouped per file.
    pub offenses: Vec<Offense>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Rules that failed while checking.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rule_failures: Vec<RuleFailure>,
    /// Files skipped because they could not be read or parsed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parse_failures: Vec<ParseFailure>,
}

impl AuditResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single file's report.
    pub fn push_report(&mut self, report: FileReport) {
        self.offenses.extend(report.offenses);
        self.rule_failures.extend(report.rule_failures);
        self.files_checked += 1;
    }

    /// Returns true if there are any errors or fatal offenses.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_offenses_at(Severity::Error)
    }

    /// Checks if any offenses meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_offenses_at(&self, severity: Severity) -> bool {
        self.offenses.iter().any(|o| o.severity >= severity)
    }

    /// Returns offenses filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Offense> {
        self.offenses
            .iter()
            .filter(|o| o.severity == severity)
            .collect()
    }

    /// Number of offenses that carry a correction.
    #[must_use]
    pub fn correctable_count(&self) -> usize {
        self.offenses.iter().filter(|o| o.is_correctable()).count()
    }

    /// Counts offenses by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for offense in &self.offenses {
            match offense.severity {
                Severity::Fatal => counts.fatal += 1,
                Severity::Error => counts.error += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Convention => counts.convention += 1,
            }
        }
        counts
    }

    /// Formats offenses as a test failure report.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&Offense> = self
            .offenses
            .iter()
            .filter(|o| o.severity >= fail_on)
            .collect();

        let mut report = String::new();
        let _ = writeln!(
            report,
            "\n=== formula-audit: {} offense(s) ===\n",
            failing.len()
        );
        for o in &failing {
            let _ = writeln!(report, "{}", o.format());
        }

        let counts = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {} fatal, {} error(s), {} warning(s), {} convention(s) in {} file(s)",
            counts.fatal, counts.error, counts.warning, counts.convention, self.files_checked
        );

        report
    }

    /// Adds offenses from another result.
    pub fn extend(&mut self, other: Self) {
        self.offenses.extend(other.offenses);
        self.files_checked += other.files_checked;
        self.rule_failures.extend(other.rule_failures);
        self.parse_failures.extend(other.parse_failures);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_offense(severity: Severity) -> Offense {
        Offense {
            code: "FA001".to_string(),
            rule: "deprecated-dependency".to_string(),
            family: "lines".to_string(),
            severity,
            location: Location::new(Some(PathBuf::from("Formula/foo.rb")), 3, 2),
            message: "Replace depends_on :automake with depends_on \"automake\"".to_string(),
            source_line: "  depends_on :automake".to_string(),
            fix: None,
            fix_conflict: false,
        }
    }

    #[test]
    fn severity_parses_aliases() {
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("Fatal".parse::<Severity>(), Ok(Severity::Fatal));
        assert!("loud".parse::<Severity>().is_err());
    }

    #[test]
    fn severity_is_ordered() {
        assert!(Severity::Convention < Severity::Warning);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn ranges_sharing_start_overlap() {
        assert!(TextRange::new(4, 4).overlaps(&TextRange::new(4, 4)));
        assert!(TextRange::new(0, 5).overlaps(&TextRange::new(3, 8)));
        assert!(!TextRange::new(0, 3).overlaps(&TextRange::new(3, 8)));
    }

    #[test]
    fn display_uses_placeholder_for_in_memory_source() {
        let mut offense = make_offense(Severity::Convention);
        offense.location.file = None;
        assert!(offense.to_string().starts_with("<source>:3:2: convention [FA001]"));
    }

    #[test]
    fn display_is_one_line_per_offense() {
        insta::assert_snapshot!(
            make_offense(Severity::Warning).to_string(),
            @r#"Formula/foo.rb:3:2: warning [FA001] Replace depends_on :automake with depends_on "automake""#
        );
    }

    #[test]
    fn format_mentions_fix_conflict() {
        let mut offense = make_offense(Severity::Convention);
        offense.fix_conflict = true;
        assert!(offense.format().contains("overlaps another fix"));
    }

    #[test]
    fn has_offenses_at_threshold() {
        let mut result = AuditResult::new();
        result.offenses.push(make_offense(Severity::Warning));
        assert!(!result.has_offenses_at(Severity::Error));
        assert!(result.has_offenses_at(Severity::Warning));
    }

    #[test]
    fn format_test_report_filters_by_severity() {
        let mut result = AuditResult::new();
        result.files_checked = 5;
        result.offenses.push(make_offense(Severity::Warning));
        result.offenses.push(make_offense(Severity::Error));

        let report = result.format_test_report(Severity::Error);
        assert!(report.contains("1 offense(s)"));
        assert!(report.contains("1 error(s), 1 warning(s)"));
    }

    #[test]
    fn push_report_counts_files() {
        let mut result = AuditResult::new();
        result.push_report(FileReport {
            offenses: vec![make_offense(Severity::Convention)],
            rule_failures: Vec::new(),
        });
        result.push_report(FileReport::default());
        assert_eq!(result.files_checked, 2);
        assert_eq!(result.count_by_severity().convention, 1);
    }
}
