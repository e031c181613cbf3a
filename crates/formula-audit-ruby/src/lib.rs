//! # formula-audit-ruby
//!
//! Tree-sitter based Ruby front end for formula-audit.
//!
//! [`RubyParser`] implements [`formula_audit_core::SourceParser`]: it parses
//! formula source with `tree-sitter-ruby` and converts the concrete tree into
//! an owned [`formula_audit_core::SyntaxTree`], mapping grammar node types to
//! [`formula_audit_core::NodeKind`] and keeping field names, comments and
//! anonymous tokens.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod convert;
pub mod parser;

pub use parser::RubyParser;
