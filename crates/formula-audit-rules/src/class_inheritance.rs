//! Rule enforcing spacing around `<` in formula class declarations.
//!
//! # Detected Patterns
//!
//! - `class Foo<Formula`
//! - `class Foo <Formula`
//! - `class Foo<  Formula`
//!
//! # Suppression
//!
//! - `# formula-audit: allow(class-inheritance-space)` comment

use formula_audit_core::{FileContext, Fix, NodeKind, NodePath, OffenseDraft, Rule, TextRange};

/// Rule code for class-inheritance-space.
pub const CODE: &str = "FA002";

/// Rule name for class-inheritance-space.
pub const NAME: &str = "class-inheritance-space";

/// Requires single spaces around `<` in `class Foo < Parent`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassInheritanceSpace;

impl ClassInheritanceSpace {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ClassInheritanceSpace {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn family(&self) -> &'static str {
        "class-inheritance"
    }

    fn description(&self) -> &'static str {
        "Requires single spaces around `<` in class declarations"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::ClassDefinition]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let class = path.node;
        let (Some(name), Some(superclass)) =
            (class.child_by_field("name"), class.child_by_field("superclass"))
        else {
            return vec![];
        };
        let Some(parent) = superclass.named_children().next() else {
            return vec![];
        };

        let gap = TextRange::new(name.range.end_byte, parent.range.start_byte);
        let text = ctx.slice(gap);
        if text.trim() != "<" || text == " < " {
            return vec![];
        }

        vec![OffenseDraft::at_node(
            parent,
            format!(
                "Use a space in class inheritance: class {} < {}",
                name.text, parent.text
            ),
        )
        .with_fix(Fix::replace(gap, " < "))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_single, correct, inspect};

    #[test]
    fn test_detects_missing_spaces() {
        let offenses = inspect(
            ClassInheritanceSpace::new(),
            r#"
class Foo<Formula
  url 'https://brew.sh/foo-1.0.tgz'
end
"#,
        );
        assert_single(
            &offenses,
            2,
            10,
            "Use a space in class inheritance: class Foo < Formula",
        );
    }

    #[test]
    fn test_detects_one_sided_space() {
        let offenses = inspect(
            ClassInheritanceSpace::new(),
            "class Foo <Formula\nend\n",
        );
        assert_single(
            &offenses,
            1,
            11,
            "Use a space in class inheritance: class Foo < Formula",
        );
    }

    #[test]
    fn test_allows_spaced_inheritance() {
        let offenses = inspect(
            ClassInheritanceSpace::new(),
            "class Foo < Formula\nend\nclass Bar\nend\n",
        );
        assert!(offenses.is_empty());
    }

    #[test]
    fn test_corrects_spacing() {
        let corrected = correct(ClassInheritanceSpace::new(), "class Foo<Formula\nend\n");
        assert_eq!(corrected, "class Foo < Formula\nend\n");
    }
}
