//! Rules on comments left in formula files.
//!
//! # Detected Patterns
//!
//! - Leftover comments from the formula template (`# PLEASE REMOVE`,
//!   `# system "cmake", ".", *std_cmake_args`, ...)
//! - Commented-out `depends_on` lines
//!
//! The template fragments come from [`RuleTables::template_comments`].
//!
//! [`RuleTables::template_comments`]: formula_audit_core::RuleTables::template_comments

use formula_audit_core::{FileContext, NodeKind, NodePath, OffenseDraft, Rule};

/// Flags comments copied verbatim from the formula template.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateComment;

impl TemplateComment {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for TemplateComment {
    fn name(&self) -> &'static str {
        "template-comment"
    }

    fn code(&self) -> &'static str {
        "FA003"
    }

    fn family(&self) -> &'static str {
        "comments"
    }

    fn description(&self) -> &'static str {
        "Flags default comments left over from the formula template"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Comment]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        if ctx.tables.template_fragment(&path.node.text).is_some() {
            vec![OffenseDraft::at_node(
                path.node,
                "Please remove default template comments",
            )]
        } else {
            vec![]
        }
    }
}

/// Flags `# depends_on ...` comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentedDependency;

impl CommentedDependency {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Text following `#<spaces>depends_on<spaces>`, trimmed.
fn commented_dependency(comment: &str) -> Option<&str> {
    comment.match_indices('#').find_map(|(index, _)| {
        let after = comment[index + 1..].trim_start();
        let rest = after.strip_prefix("depends_on")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        Some(rest.trim()).filter(|captured| !captured.is_empty())
    })
}

impl Rule for CommentedDependency {
    fn name(&self) -> &'static str {
        "commented-dependency"
    }

    fn code(&self) -> &'static str {
        "FA004"
    }

    fn family(&self) -> &'static str {
        "comments"
    }

    fn description(&self) -> &'static str {
        "Flags commented-out dependencies"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Comment]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        commented_dependency(&path.node.text)
            .map(|captured| {
                vec![OffenseDraft::at_node(
                    path.node,
                    format!("Commented-out dependency {captured}"),
                )]
            })
            .unwrap_or_default()
    }
}
