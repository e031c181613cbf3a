//! Helpers for rule unit tests.

use formula_audit_core::autocorrect::{apply, resolve};
use formula_audit_core::{Analyzer, Offense, Rule};
use formula_audit_ruby::RubyParser;
use std::path::Path;

fn analyzer(rule: impl Rule + 'static) -> Analyzer {
    Analyzer::builder()
        .parser(RubyParser::new())
        .rule(rule)
        .build()
        .expect("analyzer should build")
}

/// Runs a single rule over in-memory source.
pub(crate) fn inspect(rule: impl Rule + 'static, source: &str) -> Vec<Offense> {
    analyzer(rule)
        .analyze_source(source, None)
        .expect("source should parse")
        .offenses
}

/// Runs a single rule over source as if it lived at `path`.
pub(crate) fn inspect_at(rule: impl Rule + 'static, source: &str, path: &str) -> Vec<Offense> {
    analyzer(rule)
        .analyze_source(source, Some(Path::new(path)))
        .expect("source should parse")
        .offenses
}

/// Applies every correction the rule offers.
pub(crate) fn correct(rule: impl Rule + 'static, source: &str) -> String {
    let mut offenses = inspect(rule, source);
    let edits = resolve(&mut offenses);
    apply(source, &edits).expect("edits should apply")
}

/// Asserts exactly one offense at the given position with the given message.
#[track_caller]
pub(crate) fn assert_single(offenses: &[Offense], line: usize, column: usize, message: &str) {
    assert_eq!(offenses.len(), 1, "expected one offense, got {offenses:#?}");
    let offense = &offenses[0];
    assert_eq!(offense.message, message);
    assert_eq!(
        (offense.location.line, offense.location.column),
        (line, column),
        "wrong position for {:?}",
        offense.message
    );
}
