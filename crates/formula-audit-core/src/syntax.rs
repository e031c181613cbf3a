//! Syntax tree model consumed by rules.
//!
//! Trees are produced by a [`SourceParser`] implementation (see the
//! `formula-audit-ruby` crate) and are read-only for the rest of the engine.
//! Comments are kept as [`NodeKind::Comment`] nodes and anonymous tokens
//! (keywords, operators, punctuation) are kept as [`NodeKind::Token`] children,
//! so rules can point at exact spans such as the `!` of a negation.

use serde::{Deserialize, Serialize};

use crate::types::TextRange;

/// Kind of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Root of a file.
    Program,
    /// `class Foo < Formula ... end`
    ClassDefinition,
    /// The `< Formula` part of a class definition.
    Superclass,
    /// `def name ... end`
    MethodDefinition,
    /// A method call, with or without receiver, arguments or block.
    MethodCall,
    /// Arguments of a method call (parenthesized or not).
    ArgumentList,
    /// `do ... end` or `{ ... }` block attached to a call.
    Block,
    /// `|a, b|` parameters of a block.
    BlockParameters,
    /// Statement sequence inside a class, method, block or branch.
    Body,
    /// `if cond ... end` (also `elsif`).
    If,
    /// `unless cond ... end`
    Unless,
    /// `stmt if cond`
    IfModifier,
    /// `stmt unless cond`
    UnlessModifier,
    /// Prefix operator expression such as `!x`.
    Unary,
    /// Infix operator expression such as `a + b` or `a == b`.
    Binary,
    /// `lhs = rhs`
    Assignment,
    /// `object[index]`
    ElementReference,
    /// `key => value` or `key: value`
    Pair,
    /// `{ ... }` hash literal.
    Hash,
    /// `[ ... ]` array literal.
    Array,
    /// String literal, possibly interpolated.
    String,
    /// Literal text segment inside a string.
    StringContent,
    /// `#{ ... }` segment inside a string.
    Interpolation,
    /// Symbol literal (`:foo`).
    Symbol,
    /// Integer literal.
    Integer,
    /// Any other literal (`nil`, `true`, floats, ...).
    OtherLiteral,
    /// Constant reference (`ENV`, `Formula`).
    Constant,
    /// Scoped constant reference (`Language::Node`).
    ScopedConstant,
    /// Bare identifier (local variable or receiver-less call without arguments).
    Identifier,
    /// `# ...` comment.
    Comment,
    /// `return` statement.
    Return,
    /// `( ... )` expression.
    Parenthesized,
    /// Anonymous token: keyword, operator or punctuation.
    Token,
    /// Anything the engine has no specific kind for.
    Other,
}

/// A position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed byte offset within the line).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Source span of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceRange {
    /// Start position (inclusive).
    pub start: Position,
    /// End position (exclusive).
    pub end: Position,
    /// Start byte offset in the file.
    pub start_byte: usize,
    /// End byte offset in the file (exclusive).
    pub end_byte: usize,
}

impl SourceRange {
    /// Returns the byte range covered by this span.
    #[must_use]
    pub fn bytes(&self) -> TextRange {
        TextRange::new(self.start_byte, self.end_byte)
    }

    /// Returns true if `other` lies within this span.
    #[must_use]
    pub fn contains(&self, other: &SourceRange) -> bool {
        self.start_byte <= other.start_byte && other.end_byte <= self.end_byte
    }
}

/// A node of the formula syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    /// Kind of this node.
    pub kind: NodeKind,
    /// Role of this node inside its parent (e.g. `receiver`, `condition`).
    pub field: Option<&'static str>,
    /// Source span.
    pub range: SourceRange,
    /// Raw source text of the node.
    pub text: String,
    /// Ordered children, tokens included.
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Creates a childless node.
    #[must_use]
    pub fn new(kind: NodeKind, range: SourceRange, text: impl Into<String>) -> Self {
        Self {
            kind,
            field: None,
            range,
            text: text.into(),
            children: Vec::new(),
        }
    }

    /// Sets the field name of this node.
    #[must_use]
    pub fn with_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }

    /// Sets the children of this node.
    #[must_use]
    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = children;
        self
    }

    /// Returns true if this node has the given kind.
    #[must_use]
    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// Start position of this node.
    #[must_use]
    pub fn start(&self) -> Position {
        self.range.start
    }

    /// Returns the first child with the given field name.
    #[must_use]
    pub fn child_by_field(&self, field: &str) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.field == Some(field))
    }

    /// Iterates over children that are not anonymous tokens or comments.
    pub fn named_children(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children
            .iter()
            .filter(|c| !matches!(c.kind, NodeKind::Token | NodeKind::Comment))
    }

    /// Returns the first named child of the given kind.
    #[must_use]
    pub fn child_of_kind(&self, kind: NodeKind) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Returns the anonymous token child with the given text.
    #[must_use]
    pub fn token(&self, text: &str) -> Option<&SyntaxNode> {
        self.children
            .iter()
            .find(|c| c.kind == NodeKind::Token && c.text == text)
    }

    /// Pre-order iterator over all descendants (excluding `self`).
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// `name` field text of a class or method definition.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.child_by_field("name").map(|n| n.text.as_str())
    }

    /// `condition` field of a conditional.
    #[must_use]
    pub fn condition(&self) -> Option<&SyntaxNode> {
        self.child_by_field("condition")
    }

    /// Receiver of a method call.
    #[must_use]
    pub fn receiver(&self) -> Option<&SyntaxNode> {
        self.child_by_field("receiver")
    }

    /// Method name node of a method call.
    #[must_use]
    pub fn method_node(&self) -> Option<&SyntaxNode> {
        self.child_by_field("method")
    }

    /// Method name of a method call.
    #[must_use]
    pub fn method_name(&self) -> Option<&str> {
        self.method_node().map(|m| m.text.as_str())
    }

    /// Arguments of a method call, in order.
    #[must_use]
    pub fn arguments(&self) -> Vec<&SyntaxNode> {
        self.child_by_field("arguments")
            .map(|args| args.named_children().collect())
            .unwrap_or_default()
    }

    /// First argument of a method call.
    #[must_use]
    pub fn first_argument(&self) -> Option<&SyntaxNode> {
        self.arguments().into_iter().next()
    }

    /// Block attached to a method call.
    #[must_use]
    pub fn block(&self) -> Option<&SyntaxNode> {
        self.child_by_field("block")
            .or_else(|| self.child_of_kind(NodeKind::Block))
    }

    /// Returns true if this is a call to `method` on `receiver`.
    ///
    /// `receiver = None` matches receiver-less calls only; otherwise the
    /// receiver's source text must equal the given string.
    #[must_use]
    pub fn is_call_to(&self, receiver: Option<&str>, method: &str) -> bool {
        if self.kind != NodeKind::MethodCall || self.method_name() != Some(method) {
            return false;
        }
        match (receiver, self.receiver()) {
            (None, None) => true,
            (Some(expected), Some(actual)) => actual.text == expected,
            _ => false,
        }
    }

    /// Returns true if this is a call on the given receiver, whatever the method.
    #[must_use]
    pub fn is_call_on(&self, receiver: &str) -> bool {
        self.kind == NodeKind::MethodCall && self.receiver().is_some_and(|r| r.text == receiver)
    }

    /// Returns true if this string literal contains interpolation.
    #[must_use]
    pub fn is_interpolated(&self) -> bool {
        self.children
            .iter()
            .any(|c| c.kind == NodeKind::Interpolation)
    }

    /// Value of a non-interpolated string literal, without its quotes.
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        if self.kind != NodeKind::String || self.is_interpolated() {
            return None;
        }
        strip_delimiters(&self.text)
    }

    /// Name of a symbol literal, without the leading colon.
    #[must_use]
    pub fn symbol_name(&self) -> Option<&str> {
        if self.kind != NodeKind::Symbol {
            return None;
        }
        let name = self.text.strip_prefix(':').unwrap_or(&self.text);
        let name = name.strip_suffix(':').unwrap_or(name);
        Some(strip_delimiters(name).unwrap_or(name))
    }

    /// Value of a string or symbol literal.
    #[must_use]
    pub fn literal_value(&self) -> Option<&str> {
        self.string_value().or_else(|| self.symbol_name())
    }

    /// Position of the first character after the opening delimiter
    /// (quote of a string, colon of a symbol).
    #[must_use]
    pub fn content_start(&self) -> Position {
        Position::new(self.range.start.line, self.range.start.column + 1)
    }

    /// Byte range between the delimiters of a string literal.
    #[must_use]
    pub fn content_range(&self) -> TextRange {
        TextRange::new(
            self.range.start_byte + 1,
            self.range.end_byte.saturating_sub(1).max(self.range.start_byte + 1),
        )
    }
}

fn strip_delimiters(text: &str) -> Option<&str> {
    let mut chars = text.chars();
    let open = chars.next()?;
    if !matches!(open, '"' | '\'') {
        return Some(text);
    }
    text.get(1..)?.strip_suffix(open)
}

/// Pre-order iterator over descendants of a node.
pub struct Descendants<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A node together with its ancestor chain (root first).
#[derive(Debug, Clone, Copy)]
pub struct NodePath<'t> {
    /// The node being visited.
    pub node: &'t SyntaxNode,
    /// Ancestors from the root down to the direct parent.
    pub ancestors: &'t [&'t SyntaxNode],
}

impl<'t> NodePath<'t> {
    /// Creates a path for a node.
    #[must_use]
    pub fn new(node: &'t SyntaxNode, ancestors: &'t [&'t SyntaxNode]) -> Self {
        Self { node, ancestors }
    }

    /// Direct parent of the node.
    #[must_use]
    pub fn parent(&self) -> Option<&'t SyntaxNode> {
        self.ancestors.last().copied()
    }

    /// Ancestors from the direct parent up to the root.
    pub fn ancestors_up(&self) -> impl Iterator<Item = &'t SyntaxNode> + 't {
        self.ancestors.iter().rev().copied()
    }

    /// Returns true if some ancestor satisfies the predicate.
    pub fn has_ancestor(&self, predicate: impl Fn(&SyntaxNode) -> bool) -> bool {
        self.ancestors.iter().any(|a| predicate(a))
    }

    /// Returns true if the node sits inside a class definition.
    #[must_use]
    pub fn in_class(&self) -> bool {
        self.has_ancestor(|a| a.is(NodeKind::ClassDefinition))
    }
}

/// A parsed formula file.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    /// Full source text.
    pub source: String,
    /// Root node (kind [`NodeKind::Program`]).
    pub root: SyntaxNode,
}

impl SyntaxTree {
    /// Creates a tree from source and root node.
    #[must_use]
    pub fn new(source: impl Into<String>, root: SyntaxNode) -> Self {
        Self {
            source: source.into(),
            root,
        }
    }

    /// Name of the declared formula class.
    ///
    /// Prefers the first class with a superclass, falling back to the first
    /// class definition in the file.
    #[must_use]
    pub fn declared_class_name(&self) -> Option<&str> {
        let classes: Vec<&SyntaxNode> = self
            .root
            .descendants()
            .filter(|n| n.is(NodeKind::ClassDefinition))
            .collect();
        classes
            .iter()
            .find(|c| c.child_by_field("superclass").is_some())
            .or_else(|| classes.first())
            .and_then(|c| c.name())
    }
}

/// Errors reported by a [`SourceParser`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The parser backend could not be set up.
    #[error("parser setup failed: {0}")]
    Setup(String),

    /// The parser produced no tree (cancelled or timed out).
    #[error("parser produced no syntax tree")]
    NoTree,

    /// The source contains a syntax error.
    #[error("syntax error at line {line}, column {column}")]
    Syntax {
        /// Line of the first error (1-indexed).
        line: usize,
        /// Column of the first error (0-indexed).
        column: usize,
    },
}

/// Turns formula source text into a [`SyntaxTree`].
///
/// Implement this to plug a parser backend into the
/// [`Analyzer`](crate::Analyzer).
pub trait SourceParser: Send + Sync {
    /// File extensions handled by this parser (e.g. `&["rb"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Parses a complete source file.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the source cannot be turned into a tree.
    fn parse(&self, source: &str) -> Result<SyntaxTree, ParseError>;
}
