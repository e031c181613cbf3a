//! Rule trait for defining audit rules.

use crate::context::FileContext;
use crate::syntax::{NodeKind, NodePath};
use crate::types::{OffenseDraft, Severity};

/// Order in which a rule's offenses are reported within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffenseOrder {
    /// Source order (the order nodes are visited).
    #[default]
    Source,
    /// Reverse source order.
    Reverse,
}

/// A per-node audit rule.
///
/// Rules declare the node kinds they are interested in via
/// [`target_kinds`](Rule::target_kinds). The analyzer walks each tree once
/// and calls [`check`](Rule::check) for every node of a registered kind,
/// passing the node together with its ancestor chain.
///
/// # Example
///
/// ```ignore
/// use formula_audit_core::{FileContext, NodeKind, NodePath, OffenseDraft, Rule};
///
/// pub struct NoOsLinuxCheck;
///
/// impl Rule for NoOsLinuxCheck {
///     fn name(&self) -> &'static str { "os-linux-check" }
///     fn code(&self) -> &'static str { "FA016" }
///     fn family(&self) -> &'static str { "miscellaneous" }
///     fn target_kinds(&self) -> &'static [NodeKind] { &[NodeKind::MethodCall] }
///
///     fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
///         if path.node.is_call_to(Some("OS"), "linux?") {
///             vec![OffenseDraft::at_node(path.node, "Don't use OS.linux?")]
///         } else {
///             vec![]
///         }
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "deprecated-dependency").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "FA001").
    fn code(&self) -> &'static str;

    /// Returns the family this rule belongs to (e.g., "lines").
    fn family(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for offenses from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Convention
    }

    /// Whether offenses from this rule carry corrections.
    fn correctable(&self) -> bool {
        false
    }

    /// Order in which this rule's offenses are reported.
    fn order(&self) -> OffenseOrder {
        OffenseOrder::Source
    }

    /// Whether this rule requires a reason when using allow directives.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() >= Severity::Error
    }

    /// Node kinds this rule wants to be called for.
    fn target_kinds(&self) -> &'static [NodeKind];

    /// Checks a single node and returns any offenses found.
    ///
    /// Must be pure with respect to its inputs: the same node in the same
    /// context always yields the same drafts.
    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
