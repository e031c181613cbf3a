//! # formula-audit-rules
//!
//! Built-in audit rules for formula-audit.
//!
//! Rules are grouped in families. [`all_rules`] returns them in catalogue
//! order, which is also the order their offenses are reported in.
//!
//! ## Available Rules
//!
//! | Code | Name | Family |
//! |------|------|--------|
//! | FA001 | `deprecated-dependency` | lines |
//! | FA002 | `class-inheritance-space` | class-inheritance |
//! | FA003 | `template-comment` | comments |
//! | FA004 | `commented-dependency` | comments |
//! | FA005 | `assert-include` | assert-statements |
//! | FA006 | `assert-predicate` | assert-statements |
//! | FA007 | `unless-option-query` | option-declarations |
//! | FA008 | `negated-option-query` | option-declarations |
//! | FA009 | `duplicated-option-prefix` | option-declarations |
//! | FA010 | `option-include-query` | option-declarations |
//! | FA011 | `dashed-option-reference` | option-declarations |
//! | FA012 | `legacy-options-method` | option-declarations |
//! | FA013 | `fileutils-namespace` | miscellaneous |
//! | FA014 | `inreplace-block-variable` | miscellaneous |
//! | FA015 | `zero-rebuild` | miscellaneous |
//! | FA016 | `os-linux-check` | miscellaneous |
//! | FA017 | `fails-with-llvm` | miscellaneous |
//! | FA018 | `legacy-test-method` | miscellaneous |
//! | FA019 | `skip-clean-all` | miscellaneous |
//! | FA020 | `universal-binary` | miscellaneous |
//! | FA021 | `deprecated-env-helper` | miscellaneous |
//! | FA022 | `install-name-tool` | miscellaneous |
//! | FA023 | `npm-install-args` | miscellaneous |
//! | FA024 | `requirement-instance` | miscellaneous |
//! | FA025 | `legacy-macos-check` | miscellaneous |
//! | FA026 | `non-glob-dir` | miscellaneous |
//! | FA027 | `system-fileutils` | miscellaneous |
//! | FA028 | `top-level-method` | miscellaneous |
//! | FA029 | `argv-options` | miscellaneous |
//! | FA030 | `argv-head` | miscellaneous |
//! | FA031 | `man-path-concat` | miscellaneous |
//! | FA032 | `hardcoded-compiler` | miscellaneous |
//! | FA033 | `path-shortcut` | miscellaneous |
//! | FA034 | `vendored-language-dependency` | miscellaneous |
//! | FA035 | `shell-env-mutation` | miscellaneous |
//! | FA036 | `dependency-option` | miscellaneous |
//! | FA037 | `version-head-comparison` | miscellaneous |
//! | FA038 | `macos-version-constant` | miscellaneous |
//! | FA039 | `conditional-dependency` | miscellaneous |
//!
//! ## Usage
//!
//! ```ignore
//! use formula_audit_core::Analyzer;
//! use formula_audit_rules::{DeprecatedDependency, Preset};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./Formula")
//!     .parser(RubyParser::new())
//!     .rules(Preset::Recommended.rules())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assert_statements;
mod class_inheritance;
mod comments;
mod lines;
pub mod miscellaneous;
mod option_declarations;
mod presets;
mod support;

#[cfg(test)]
mod test_support;

pub use assert_statements::{AssertInclude, AssertPredicate};
pub use class_inheritance::ClassInheritanceSpace;
pub use comments::{CommentedDependency, TemplateComment};
pub use lines::DeprecatedDependency;
pub use miscellaneous::*;
pub use option_declarations::{
    DashedOptionReference, DuplicatedOptionPrefix, LegacyOptionsMethod, NegatedOptionQuery,
    OptionIncludeQuery, UnlessOptionQuery,
};
pub use presets::{all_rules, minimal_rules, recommended_rules, strict_rules, Preset};

/// Re-export core types for convenience.
pub use formula_audit_core::{Offense, Rule, Severity};
