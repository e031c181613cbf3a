//! # formula-audit
//!
//! Rule-based static analyzer for Homebrew formula scripts.
//!
//! This is the main facade crate that re-exports the core framework, the
//! built-in rules and the Ruby front end, wired together with sensible
//! defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! let report = formula_audit::audit_source(
//!     "class Foo < Formula\n  depends_on :hg\nend\n",
//!     None,
//! )?;
//! for offense in &report.offenses {
//!     println!("{offense}");
//! }
//! ```
//!
//! ## Autocorrection
//!
//! ```rust,ignore
//! let analyzer = formula_audit::default_analyzer()?;
//! let correction = formula_audit::correct_source(&analyzer, source, None)?;
//! std::fs::write(path, &correction.output)?;
//! ```
//!
//! ## Suppression Comments
//!
//! ```ruby
//! # formula-audit: allow(deprecated-dependency) reason="tap still ships hg"
//! depends_on :hg
//! ```
//!
//! ## Project Checks
//!
//! ```rust,ignore
//! use formula_audit::{run_check, CheckOptions};
//!
//! let outcome = run_check("./Formula", &CheckOptions::default())?;
//! if !outcome.passed() {
//!     eprintln!("{}", outcome.result.format_test_report(outcome.fail_on));
//! }
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use formula_audit_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use formula_audit_rules::*;
}

pub use formula_audit_ruby::RubyParser;

mod runner;

pub use runner::{
    audit_source, build_analyzer, correct_source, default_analyzer, load_config, resolve_fail_on,
    resolve_preset, run_check, CheckOptions, CheckOutcome, Correction, RunError,
    CONFIG_CANDIDATES, MAX_CORRECTION_PASSES,
};
