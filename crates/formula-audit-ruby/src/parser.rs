//! Ruby source parser using Tree-sitter.

use formula_audit_core::{ParseError, SourceParser, SyntaxTree};
use tracing::debug;
use tree_sitter::{Language, Parser};

use crate::convert::{convert, first_error};

/// Parses formula source into a [`SyntaxTree`].
///
/// By default a source containing syntax errors is rejected with
/// [`ParseError::Syntax`]. With [`RubyParser::lenient`] the partial tree is
/// returned instead, error regions appearing as [`NodeKind::Other`]
/// nodes.
///
/// [`NodeKind::Other`]: formula_audit_core::NodeKind::Other
pub struct RubyParser {
    language: Language,
    lenient: bool,
}

impl RubyParser {
    /// Creates a new strict Ruby parser.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_ruby::LANGUAGE.into(),
            lenient: false,
        }
    }

    /// Accept sources with syntax errors.
    #[must_use]
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }
}

impl Default for RubyParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for RubyParser {
    fn extensions(&self) -> &'static [&'static str] {
        &["rb"]
    }

    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::Setup(e.to_string()))?;

        let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;

        if tree.root_node().has_error() {
            if let Some(position) = first_error(&mut tree.walk()) {
                if !self.lenient {
                    return Err(ParseError::Syntax {
                        line: position.line,
                        column: position.column,
                    });
                }
                debug!(
                    "Keeping partial tree with syntax error at {}:{}",
                    position.line, position.column
                );
            }
        }

        let root = convert(&mut tree.walk(), source);
        Ok(SyntaxTree::new(source, root))
    }
}
