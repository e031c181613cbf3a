//! # formula-audit-core
//!
//! Core framework for auditing formula scripts.
//!
//! This crate provides the foundational traits and types for building
//! formula auditors. It includes:
//!
//! - [`SyntaxTree`] / [`SyntaxNode`], the parser-independent tree model
//! - [`Rule`] trait for node-level rules
//! - [`Analyzer`] for registering rules and dispatching them over trees
//! - [`ExemptionPolicy`] for per-file rule exemptions
//! - [`RuleTables`] holding the data rules consult
//! - [`autocorrect`] for resolving and applying fixes
//!
//! ## Example
//!
//! ```ignore
//! use formula_audit_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./Formula")
//!     .parser(RubyParser::new())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
pub mod autocorrect;
mod config;
mod context;
mod exemption;
mod rule;
pub mod syntax;
mod tables;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use autocorrect::Edit;
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{FileContext, FileIdentity};
pub use exemption::{ExemptionPolicy, ExemptionRule};
pub use rule::{OffenseOrder, Rule, RuleBox};
pub use syntax::{
    NodeKind, NodePath, ParseError, Position, SourceParser, SourceRange, SyntaxNode, SyntaxTree,
};
pub use tables::{PathShortcut, RuleTables, TableOverrides};
pub use types::{
    AuditResult, FileReport, Fix, Location, Offense, OffenseDiagnostic, OffenseDraft,
    ParseFailure, RuleFailure, Severity, SeverityCounts, TextRange,
};
pub use utils::allowance::AllowCheck;
