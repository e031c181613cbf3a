//! Conversion from tree-sitter nodes to the engine's syntax tree.

use formula_audit_core::{NodeKind, Position, SourceRange, SyntaxNode};
use tree_sitter::{Node, TreeCursor};

/// Maps a tree-sitter-ruby node to a [`NodeKind`].
pub(crate) fn kind_of(node: &Node<'_>) -> NodeKind {
    if !node.is_named() {
        return NodeKind::Token;
    }
    match node.kind() {
        "program" => NodeKind::Program,
        "class" => NodeKind::ClassDefinition,
        "superclass" => NodeKind::Superclass,
        "method" | "singleton_method" => NodeKind::MethodDefinition,
        "call" => NodeKind::MethodCall,
        "argument_list" => NodeKind::ArgumentList,
        "do_block" | "block" => NodeKind::Block,
        "block_parameters" => NodeKind::BlockParameters,
        "body_statement" | "block_body" | "then" | "else" => NodeKind::Body,
        "if" | "elsif" => NodeKind::If,
        "unless" => NodeKind::Unless,
        "if_modifier" => NodeKind::IfModifier,
        "unless_modifier" => NodeKind::UnlessModifier,
        "unary" => NodeKind::Unary,
        "binary" => NodeKind::Binary,
        "assignment" => NodeKind::Assignment,
        "element_reference" => NodeKind::ElementReference,
        "pair" => NodeKind::Pair,
        "hash" => NodeKind::Hash,
        "array" | "string_array" | "symbol_array" => NodeKind::Array,
        "string" | "bare_string" => NodeKind::String,
        "string_content" | "escape_sequence" => NodeKind::StringContent,
        "interpolation" => NodeKind::Interpolation,
        "simple_symbol" | "delimited_symbol" | "hash_key_symbol" | "bare_symbol" => {
            NodeKind::Symbol
        }
        "integer" => NodeKind::Integer,
        "float" | "rational" | "complex" | "nil" | "true" | "false" | "self" | "character" => {
            NodeKind::OtherLiteral
        }
        "constant" => NodeKind::Constant,
        "scope_resolution" => NodeKind::ScopedConstant,
        "identifier" => NodeKind::Identifier,
        "comment" => NodeKind::Comment,
        "return" => NodeKind::Return,
        "parenthesized_statements" => NodeKind::Parenthesized,
        _ => NodeKind::Other,
    }
}

fn position(point: tree_sitter::Point) -> Position {
    Position::new(point.row + 1, point.column)
}

/// Converts the node under `cursor` and its whole subtree.
pub(crate) fn convert(cursor: &mut TreeCursor<'_>, source: &str) -> SyntaxNode {
    let node = cursor.node();
    let field = cursor.field_name();

    let mut children = Vec::new();
    if cursor.goto_first_child() {
        loop {
            children.push(convert(cursor, source));
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }

    let range = SourceRange {
        start: position(node.start_position()),
        end: position(node.end_position()),
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
    };
    let text = source.get(node.byte_range()).unwrap_or_default();

    let converted = SyntaxNode::new(kind_of(&node), range, text).with_children(children);
    match field {
        Some(field) => converted.with_field(field),
        None => converted,
    }
}

/// Finds the position of the first error or missing node.
pub(crate) fn first_error(cursor: &mut TreeCursor<'_>) -> Option<Position> {
    let node = cursor.node();
    if node.is_error() || node.is_missing() {
        return Some(position(node.start_position()));
    }
    if !node.has_error() {
        return None;
    }
    let mut found = None;
    if cursor.goto_first_child() {
        loop {
            found = first_error(cursor);
            if found.is_some() || !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }
    found.or_else(|| Some(position(node.start_position())))
}
