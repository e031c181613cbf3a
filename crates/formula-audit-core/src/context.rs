//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::syntax::{Position, SyntaxNode, SyntaxTree};
use crate::tables::RuleTables;
use crate::types::TextRange;

/// Identity of the file being audited.
///
/// Exemptions match against the path and the declared class name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIdentity {
    /// File path, or `None` for in-memory sources.
    pub path: Option<PathBuf>,
    /// Name of the formula class declared in the file.
    pub class_name: Option<String>,
}

impl FileIdentity {
    /// Creates an identity from explicit values.
    #[must_use]
    pub fn new(path: Option<PathBuf>, class_name: Option<String>) -> Self {
        Self { path, class_name }
    }

    /// Creates an identity for a parsed tree, reading the class name from it.
    #[must_use]
    pub fn from_tree(path: Option<&Path>, tree: &SyntaxTree) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
            class_name: tree.declared_class_name().map(String::from),
        }
    }

    /// Path as a string, if any.
    #[must_use]
    pub fn path_str(&self) -> Option<String> {
        self.path.as_ref().map(|p| p.to_string_lossy().into_owned())
    }
}

/// Context provided to rules while checking a file.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Identity of the file.
    pub identity: &'a FileIdentity,
    /// Full source text.
    pub source: &'a str,
    /// Data tables the rules consult.
    pub tables: &'a RuleTables,
    line_starts: Vec<usize>,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(identity: &'a FileIdentity, source: &'a str, tables: &'a RuleTables) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            identity,
            source,
            tables,
            line_starts,
        }
    }

    /// Calculates the byte offset for a position.
    ///
    /// Returns the end of the source if the position is out of bounds.
    #[must_use]
    pub fn offset_for(&self, position: Position) -> usize {
        if position.line == 0 {
            return 0;
        }
        self.line_starts
            .get(position.line - 1)
            .map_or(self.source.len(), |start| {
                (start + position.column).min(self.source.len())
            })
    }

    /// Character column of a position whose column is a byte offset.
    #[must_use]
    pub fn char_column(&self, position: Position) -> usize {
        let start = self.line_range(position.line).start;
        let end = self.offset_for(position);
        self.source
            .get(start..end)
            .map_or(position.column, |prefix| prefix.chars().count())
    }

    /// Text of a line (1-indexed) without its line terminator.
    #[must_use]
    pub fn line_text(&self, line: usize) -> &'a str {
        let range = self.line_range(line);
        let text = self.source.get(range.start..range.end).unwrap_or_default();
        text.trim_end_matches(['\n', '\r'])
    }

    /// Byte range of a line (1-indexed), including its newline.
    #[must_use]
    pub fn line_range(&self, line: usize) -> TextRange {
        let Some(&start) = line.checked_sub(1).and_then(|i| self.line_starts.get(i)) else {
            return TextRange::new(self.source.len(), self.source.len());
        };
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.source.len());
        TextRange::new(start, end)
    }

    /// Range to delete when removing a statement.
    ///
    /// If the node is alone on its lines, the whole lines (newline included)
    /// are removed; otherwise just the node's own span.
    #[must_use]
    pub fn removal_range(&self, node: &SyntaxNode) -> TextRange {
        let start_line = self.line_range(node.range.start.line);
        let end_line = self.line_range(node.range.end.line);
        let before = self
            .source
            .get(start_line.start..node.range.start_byte)
            .unwrap_or_default();
        let after = self
            .source
            .get(node.range.end_byte..end_line.end)
            .unwrap_or_default();
        if before.trim().is_empty() && after.trim().is_empty() {
            TextRange::new(start_line.start, end_line.end)
        } else {
            node.range.bytes()
        }
    }

    /// Source text of a byte range.
    #[must_use]
    pub fn slice(&self, range: TextRange) -> &'a str {
        self.source.get(range.start..range.end).unwrap_or_default()
    }
}
