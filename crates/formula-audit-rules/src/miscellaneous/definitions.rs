//! Checks on formula-level declarations and method definitions.

use formula_audit_core::{FileContext, Fix, NodeKind, NodePath, OffenseDraft, Rule, TextRange};

/// Flags `inreplace ... do |name|` with a long block parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct InreplaceBlockVariable;

impl InreplaceBlockVariable {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for InreplaceBlockVariable {
    fn name(&self) -> &'static str {
        "inreplace-block-variable"
    }

    fn code(&self) -> &'static str {
        "FA014"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Prefers `|s|` as the `inreplace` block variable"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        if !node.is_call_to(None, "inreplace") {
            return vec![];
        }
        let parameter = node
            .block()
            .and_then(|block| block.child_of_kind(NodeKind::BlockParameters))
            .and_then(|params| params.named_children().next());

        match parameter {
            Some(parameter) if parameter.text.chars().count() > 1 => {
                vec![OffenseDraft::at_node(
                    node,
                    format!(
                        "\"inreplace <filenames> do |s|\" is preferred over \"|{}|\".",
                        parameter.text
                    ),
                )]
            }
            _ => vec![],
        }
    }
}

/// Flags `rebuild 0` inside a `bottle` block.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroRebuild;

impl ZeroRebuild {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ZeroRebuild {
    fn name(&self) -> &'static str {
        "zero-rebuild"
    }

    fn code(&self) -> &'static str {
        "FA015"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Removes `rebuild 0` from bottle blocks"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        let is_zero = node.is_call_to(None, "rebuild")
            && node
                .first_argument()
                .is_some_and(|arg| arg.is(NodeKind::Integer) && arg.text == "0");
        if !is_zero || !path.has_ancestor(|a| a.is_call_to(None, "bottle")) {
            return vec![];
        }

        vec![OffenseDraft::at_node(node, "'rebuild 0' should be removed")
            .with_fix(Fix::remove(ctx.removal_range(node)))]
    }
}

/// Flags `fails_with :llvm`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailsWithLlvm;

impl FailsWithLlvm {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for FailsWithLlvm {
    fn name(&self) -> &'static str {
        "fails-with-llvm"
    }

    fn code(&self) -> &'static str {
        "FA017"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Removes the no-op `fails_with :llvm`"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        let is_llvm = node.is_call_to(None, "fails_with")
            && node
                .first_argument()
                .and_then(|arg| arg.symbol_name())
                == Some("llvm");
        if !is_llvm {
            return vec![];
        }

        vec![OffenseDraft::at_node(
            node,
            "'fails_with :llvm' is now a no-op so should be removed",
        )
        .with_fix(Fix::remove(ctx.removal_range(node)))]
    }
}

/// Flags `def test` inside a formula class.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyTestMethod;

impl LegacyTestMethod {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for LegacyTestMethod {
    fn name(&self) -> &'static str {
        "legacy-test-method"
    }

    fn code(&self) -> &'static str {
        "FA018"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Replaces `def test` with a `test do` block"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodDefinition]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        let Some(name) = node.child_by_field("name") else {
            return vec![];
        };
        if name.text != "test" || !path.in_class() || node.child_by_field("parameters").is_some()
        {
            return vec![];
        }

        vec![
            OffenseDraft::at_node(node, "Use new-style test definitions (test do)").with_fix(
                Fix::replace(
                    TextRange::new(node.range.start_byte, name.range.end_byte),
                    "test do",
                ),
            ),
        ]
    }
}

/// Flags `skip_clean :all`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipCleanAll;

impl SkipCleanAll {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for SkipCleanAll {
    fn name(&self) -> &'static str {
        "skip-clean-all"
    }

    fn code(&self) -> &'static str {
        "FA019"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Flags the deprecated `skip_clean :all`"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        let skips_all = node.is_call_to(None, "skip_clean")
            && node
                .arguments()
                .iter()
                .any(|arg| arg.symbol_name() == Some("all"));
        if !skips_all {
            return vec![];
        }

        vec![OffenseDraft::at_node(
            node,
            "`skip_clean :all` is deprecated; brew no longer strips symbols\n        Pass explicit paths to prevent Homebrew from removing empty folders.",
        )]
    }
}

/// Flags methods defined outside any class.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopLevelMethod;

impl TopLevelMethod {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TopLevelMethod {
    fn name(&self) -> &'static str {
        "top-level-method"
    }

    fn code(&self) -> &'static str {
        "FA028"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Requires methods to be defined in the class body"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Program]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        path.node
            .named_children()
            .filter(|child| child.is(NodeKind::MethodDefinition))
            .filter_map(|def| {
                let name = def.name()?;
                Some(OffenseDraft::at_node(
                    def,
                    format!("Define method {name} in the class body, not at the top-level"),
                ))
            })
            .collect()
    }
}
