//! Line-level checks on dependency declarations.
//!
//! # Rationale
//!
//! Many `depends_on :symbol` requirements were retired in favour of plain
//! formula dependencies. Keeping the symbol form either pulls in a
//! requirement that no longer exists or hides which formula is installed.
//!
//! # Detected Patterns
//!
//! - `depends_on :automake` → `depends_on "automake"`
//! - `depends_on :automake => :build` → `depends_on "automake" => :build`
//! - `depends_on automake: :build` → `depends_on "automake" => :build`
//! - `depends_on :tex` (no replacement; the dependency should be dropped)
//!
//! The replacement list lives in [`RuleTables::deprecated_dependencies`]
//! and can be extended from `[tables.deprecated_dependencies]`.
//!
//! # Suppression
//!
//! - `# formula-audit: allow(deprecated-dependency)` comment
//!
//! [`RuleTables::deprecated_dependencies`]: formula_audit_core::RuleTables::deprecated_dependencies

use formula_audit_core::{
    FileContext, Fix, NodeKind, NodePath, OffenseDraft, OffenseOrder, Rule, SyntaxNode, TextRange,
};

use crate::support::dependency;

/// Rule code for deprecated-dependency.
pub const CODE: &str = "FA001";

/// Rule name for deprecated-dependency.
pub const NAME: &str = "deprecated-dependency";

/// Flags `depends_on :symbol` for retired requirement symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeprecatedDependency;

impl DeprecatedDependency {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// The symbol naming the dependency, whether bare or the key of `=> tags`.
fn dependency_symbol(argument: &SyntaxNode) -> Option<&SyntaxNode> {
    match argument.kind {
        NodeKind::Symbol => Some(argument),
        NodeKind::Pair => argument
            .child_by_field("key")
            .filter(|key| key.is(NodeKind::Symbol)),
        _ => None,
    }
}

/// Rewrites the dependency symbol to a string literal.
///
/// A `name: tags` key loses its trailing colon and gains `=>`, since
/// `"name": tags` would still be a symbol key.
fn string_dependency_fix(argument: &SyntaxNode, symbol: &SyntaxNode, replacement: &str) -> Fix {
    let colon = argument
        .is(NodeKind::Pair)
        .then(|| argument.token(":"))
        .flatten()
        .filter(|colon| colon.range.start_byte >= symbol.range.end_byte);
    match colon {
        Some(colon) => Fix::replace(
            TextRange::new(symbol.range.start_byte, colon.range.end_byte),
            format!("\"{replacement}\" =>"),
        ),
        None => Fix::replace_node(symbol, format!("\"{replacement}\"")),
    }
}

impl Rule for DeprecatedDependency {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn family(&self) -> &'static str {
        "lines"
    }

    fn description(&self) -> &'static str {
        "Replaces retired `depends_on :symbol` requirements with formula dependencies"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn order(&self) -> OffenseOrder {
        OffenseOrder::Reverse
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let Some(argument) = dependency(path.node) else {
            return vec![];
        };
        let Some(symbol) = dependency_symbol(argument) else {
            return vec![];
        };
        let Some(name) = symbol.symbol_name() else {
            return vec![];
        };

        match ctx.tables.deprecated_dependency(name) {
            Some(Some(replacement)) => vec![OffenseDraft::at_node(
                path.node,
                format!(":{name} is deprecated. Usage should be \"{replacement}\""),
            )
            .with_fix(string_dependency_fix(argument, symbol, replacement))],
            Some(None) => vec![OffenseDraft::at_node(
                path.node,
                format!(":{name} is deprecated"),
            )],
            None => vec![],
        }
    }
}
