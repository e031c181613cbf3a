//! Rules on `assert` usage in formula test blocks.
//!
//! # Rationale
//!
//! `assert x.include?(y)` and `assert path.exist?` fail with an unhelpful
//! "expected true" message. The dedicated assertions report what was
//! actually compared.
//!
//! # Detected Patterns
//!
//! - `assert File.read("inbox").include?("Sample")` → `assert_match`
//! - `assert File.exist? "default.ini"` → `assert_predicate`
//! - `assert !File.exist? "default.ini"` → `refute_predicate`
//! - `assert (bin/"foo").executable?` → `assert_predicate`

use formula_audit_core::{FileContext, Fix, NodeKind, NodePath, OffenseDraft, Rule, SyntaxNode};

/// Argument of a receiver-less `assert` call.
fn assert_argument(node: &SyntaxNode) -> Option<&SyntaxNode> {
    if node.is_call_to(None, "assert") {
        node.first_argument()
    } else {
        None
    }
}

/// Flags `assert X.include?(Y)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssertInclude;

impl AssertInclude {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for AssertInclude {
    fn name(&self) -> &'static str {
        "assert-include"
    }

    fn code(&self) -> &'static str {
        "FA005"
    }

    fn family(&self) -> &'static str {
        "assert-statements"
    }

    fn description(&self) -> &'static str {
        "Prefers `assert_match` over `assert ...include?`"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        match assert_argument(path.node) {
            Some(argument)
                if argument.is(NodeKind::MethodCall)
                    && argument.method_name() == Some("include?") =>
            {
                vec![OffenseDraft::at_node(
                    argument,
                    "Use `assert_match` instead of `assert ...include?`",
                )]
            }
            _ => vec![],
        }
    }
}

/// Flags `assert X.exist?` and `assert X.executable?`, negated or not.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssertPredicate;

impl AssertPredicate {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Receivers that take the path as an argument rather than being the path.
const PATH_CLASSES: &[&str] = &["File", "Dir", "FileTest"];

impl Rule for AssertPredicate {
    fn name(&self) -> &'static str {
        "assert-predicate"
    }

    fn code(&self) -> &'static str {
        "FA006"
    }

    fn family(&self) -> &'static str {
        "assert-statements"
    }

    fn description(&self) -> &'static str {
        "Prefers `assert_predicate`/`refute_predicate` for file predicates"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let Some(argument) = assert_argument(path.node) else {
            return vec![];
        };

        let (negated, call) = if argument.is(NodeKind::Unary) && argument.token("!").is_some() {
            match argument.child_by_field("operand") {
                Some(operand) => (true, operand),
                None => return vec![],
            }
        } else {
            (false, argument)
        };
        if !call.is(NodeKind::MethodCall) {
            return vec![];
        }
        let Some(predicate) = call
            .method_name()
            .filter(|m| matches!(*m, "exist?" | "executable?"))
        else {
            return vec![];
        };

        let assertion = if negated {
            "refute_predicate"
        } else {
            "assert_predicate"
        };
        let draft = OffenseDraft::at_node(
            argument,
            format!(
                "Use `{assertion} <path_to_file>, :{predicate}` instead of `{}`",
                path.node.text
            ),
        );

        match call.receiver() {
            Some(receiver)
                if !PATH_CLASSES.contains(&receiver.text.as_str())
                    && call.arguments().is_empty() =>
            {
                let replacement = format!("{assertion} {}, :{predicate}", receiver.text);
                vec![draft.with_fix(Fix::replace_node(path.node, replacement))]
            }
            _ => vec![draft],
        }
    }
}
