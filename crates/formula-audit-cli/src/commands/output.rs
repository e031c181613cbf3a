//! Shared output formatting for audit results.

use anyhow::Result;
use formula_audit::{AuditResult, Offense, OffenseDiagnostic, Severity};
use miette::{NamedSource, Report};
use serde::Serialize;

use crate::OutputFormat;

/// Print audit results in the specified format.
pub fn print(result: &AuditResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => print_pretty(result),
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Fatal => "\x1b[1;31mfatal\x1b[0m",
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Convention => "\x1b[34mconvention\x1b[0m",
    }
}

fn print_text(result: &AuditResult) {
    for offense in &result.offenses {
        println!(
            "{} {} at {}:{}:{}",
            offense.code,
            offense.rule,
            offense.location.file_display(),
            offense.location.line,
            offense.location.column,
        );
        println!(
            "  {}: {}",
            severity_indicator(offense.severity),
            offense.message
        );
        if !offense.source_line.is_empty() {
            println!("  | {}", offense.source_line);
        }
        if let Some(fix) = &offense.fix {
            println!("  = help: replace with `{}`", fix.replacement);
        } else if offense.fix_conflict {
            println!("  = note: correction overlaps another fix");
        }
        println!();
    }

    print_failures(result);
    print_summary(result);
}

fn print_failures(result: &AuditResult) {
    for failure in &result.parse_failures {
        println!(
            "\x1b[31mparse failure\x1b[0m {}: {}",
            failure.file.display(),
            failure.message
        );
    }
    for failure in &result.rule_failures {
        let file = failure
            .file
            .as_ref()
            .map_or_else(|| "<source>".to_string(), |f| f.display().to_string());
        println!(
            "\x1b[31mrule failure\x1b[0m {} on {}: {}",
            failure.rule, file, failure.message
        );
    }
}

fn print_summary(result: &AuditResult) {
    let counts = result.count_by_severity();

    let summary_color = if counts.fatal + counts.error > 0 {
        "\x1b[31m"
    } else if counts.warning + counts.convention > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}{} file(s) inspected, {} offense(s) detected ({} fatal, {} error, {} warning, {} convention), {} correctable\x1b[0m",
        summary_color,
        result.files_checked,
        result.offenses.len(),
        counts.fatal,
        counts.error,
        counts.warning,
        counts.convention,
        result.correctable_count()
    );
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a AuditResult,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonSummary {
    offense_count: usize,
    correctable_count: usize,
    files_checked: usize,
}

fn print_json(result: &AuditResult) -> Result<()> {
    let report = JsonReport {
        result,
        summary: JsonSummary {
            offense_count: result.offenses.len(),
            correctable_count: result.correctable_count(),
            files_checked: result.files_checked,
        },
    };
    let json = serde_json::to_string_pretty(&report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &AuditResult) {
    for offense in &result.offenses {
        println!("{offense}");
    }
}

fn print_pretty(result: &AuditResult) {
    let mut current: Option<(String, String)> = None;
    for offense in &result.offenses {
        let name = offense.location.file_display();
        let stale = current.as_ref().map_or(true, |(file, _)| *file != name);
        if stale {
            let source = offense
                .location
                .file
                .as_ref()
                .and_then(|f| std::fs::read_to_string(f).ok())
                .unwrap_or_default();
            current = Some((name, source));
        }
        if let Some((file, source)) = &current {
            println!("{:?}", render(offense, file, source));
        }
    }
    print_failures(result);
    print_summary(result);
}

fn render(offense: &Offense, file: &str, source: &str) -> Report {
    Report::new(OffenseDiagnostic::from(offense))
        .with_source_code(NamedSource::new(file, source.to_string()))
}
