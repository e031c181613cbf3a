//! Rules on build option queries and declarations.
//!
//! # Rationale
//!
//! `build.with?` and `build.without?` are exact complements, so negating
//! either one (with `unless` or `!`) only obscures the condition. Option
//! names are referenced without their `--with-`/`--without-` prefixes.
//!
//! # Detected Patterns
//!
//! - `unless build.without? "bar"` → `if build.with? "bar"`
//! - `!build.with? "bar"` → `build.without? "bar"`
//! - `build.without? "--without-bar"` → `build.without? "bar"`
//! - `build.include? "without-bar"` → `build.without? "bar"`
//! - `build.include? "--bar"` → `build.include? "bar"`
//! - `def options` → `option "..."` declarations

use formula_audit_core::{
    FileContext, Fix, NodeKind, NodePath, OffenseDraft, Rule, SyntaxNode, TextRange,
};

use crate::support::{build_query, complement};

/// A `build.with?` / `build.without?` call with its query and complement.
fn option_query(node: &SyntaxNode) -> Option<(&SyntaxNode, &str, &'static str)> {
    let query = build_query(node)?;
    let opposite = complement(query)?;
    Some((node.method_node()?, query, opposite))
}

/// String argument of a `build.<query>` call, for the given queries.
fn query_argument<'a>(
    node: &'a SyntaxNode,
    queries: &[&str],
) -> Option<(&'a str, &'a SyntaxNode, &'a str)> {
    let query = build_query(node).filter(|q| queries.contains(q))?;
    let argument = node.first_argument()?;
    Some((query, argument, argument.string_value()?))
}

/// Flags `unless build.with?` / `unless build.without?`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlessOptionQuery;

impl UnlessOptionQuery {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for UnlessOptionQuery {
    fn name(&self) -> &'static str {
        "unless-option-query"
    }

    fn code(&self) -> &'static str {
        "FA007"
    }

    fn family(&self) -> &'static str {
        "option-declarations"
    }

    fn description(&self) -> &'static str {
        "Prefers `if build.with?` over `unless build.without?` and vice versa"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::UnlessModifier, NodeKind::Unless]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let Some(condition) = path.node.condition() else {
            return vec![];
        };
        let Some((method, _, opposite)) = option_query(condition) else {
            return vec![];
        };

        let prefix = ctx.slice(TextRange::new(condition.range.start_byte, method.range.start_byte));
        let rest = ctx.slice(TextRange::new(method.range.end_byte, condition.range.end_byte));
        let draft = OffenseDraft::at_node(
            condition,
            format!(
                "Use if {prefix}{opposite}{rest} instead of unless {}",
                condition.text
            ),
        );

        match path.node.token("unless") {
            Some(keyword) => {
                let range = TextRange::new(keyword.range.start_byte, method.range.end_byte);
                vec![draft.with_fix(Fix::replace(range, format!("if {prefix}{opposite}")))]
            }
            None => vec![draft],
        }
    }
}

/// Flags `!build.with?` / `!build.without?`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegatedOptionQuery;

impl NegatedOptionQuery {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NegatedOptionQuery {
    fn name(&self) -> &'static str {
        "negated-option-query"
    }

    fn code(&self) -> &'static str {
        "FA008"
    }

    fn family(&self) -> &'static str {
        "option-declarations"
    }

    fn description(&self) -> &'static str {
        "Replaces negated option queries with their complement"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Unary]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let unary = path.node;
        if unary.token("!").is_none() {
            return vec![];
        }
        let Some(operand) = unary.child_by_field("operand") else {
            return vec![];
        };
        let Some((method, query, opposite)) = option_query(operand) else {
            return vec![];
        };

        let receiver = ctx.slice(TextRange::new(operand.range.start_byte, method.range.start_byte));
        vec![OffenseDraft::at_node(
            unary,
            format!("Don't negate 'build.{query}': use 'build.{opposite}'"),
        )
        .with_fix(Fix::replace(
            TextRange::new(unary.range.start_byte, method.range.end_byte),
            format!("{receiver}{opposite}"),
        ))]
    }
}

/// Flags `build.with? "--with-bar"` style duplicated prefixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicatedOptionPrefix;

impl DuplicatedOptionPrefix {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DuplicatedOptionPrefix {
    fn name(&self) -> &'static str {
        "duplicated-option-prefix"
    }

    fn code(&self) -> &'static str {
        "FA009"
    }

    fn family(&self) -> &'static str {
        "option-declarations"
    }

    fn description(&self) -> &'static str {
        "Drops the `with-`/`without-` prefix repeated in option queries"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let Some((query, argument, value)) = query_argument(path.node, &["with?", "without?"])
        else {
            return vec![];
        };
        let polarity = query.trim_end_matches('?');
        let undashed = value.strip_prefix('-').unwrap_or(value);
        let undashed = undashed.strip_prefix('-').unwrap_or(undashed);
        let Some(option) = undashed
            .strip_prefix(polarity)
            .and_then(|s| s.strip_prefix('-'))
        else {
            return vec![];
        };

        vec![OffenseDraft::at_content(
            argument,
            format!(
                "Don't duplicate '{polarity}': Use `build.{query} \"{option}\"` to check for \"--{polarity}-{option}\""
            ),
        )
        .with_fix(Fix::replace(argument.content_range(), option))]
    }
}

/// Flags `build.include? "with-bar"` / `"without-bar"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionIncludeQuery;

impl OptionIncludeQuery {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for OptionIncludeQuery {
    fn name(&self) -> &'static str {
        "option-include-query"
    }

    fn code(&self) -> &'static str {
        "FA010"
    }

    fn family(&self) -> &'static str {
        "option-declarations"
    }

    fn description(&self) -> &'static str {
        "Prefers `build.with?`/`build.without?` over `build.include?`"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let Some((_, argument, value)) = query_argument(path.node, &["include?"]) else {
            return vec![];
        };
        let (polarity, option) = if let Some(option) = value.strip_prefix("without-") {
            ("without", option)
        } else if let Some(option) = value.strip_prefix("with-") {
            ("with", option)
        } else {
            return vec![];
        };
        let Some(receiver) = path.node.receiver() else {
            return vec![];
        };

        vec![OffenseDraft::at_content(
            argument,
            format!("Use build.{polarity}? \"{option}\" instead of build.include? '{value}'"),
        )
        .with_fix(Fix::replace_node(
            path.node,
            format!("{}.{polarity}? \"{option}\"", receiver.text),
        ))]
    }
}

/// Flags `build.include? "--bar"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashedOptionReference;

impl DashedOptionReference {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DashedOptionReference {
    fn name(&self) -> &'static str {
        "dashed-option-reference"
    }

    fn code(&self) -> &'static str {
        "FA011"
    }

    fn family(&self) -> &'static str {
        "option-declarations"
    }

    fn description(&self) -> &'static str {
        "References build options without leading dashes"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let Some((_, argument, value)) = query_argument(path.node, &["include?"]) else {
            return vec![];
        };
        let Some(option) = value.strip_prefix("--") else {
            return vec![];
        };

        vec![
            OffenseDraft::at_content(argument, format!("Reference '{option}' without dashes"))
                .with_fix(Fix::replace(argument.content_range(), option)),
        ]
    }
}

/// Flags the legacy `def options` declaration.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyOptionsMethod;

impl LegacyOptionsMethod {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for LegacyOptionsMethod {
    fn name(&self) -> &'static str {
        "legacy-options-method"
    }

    fn code(&self) -> &'static str {
        "FA012"
    }

    fn family(&self) -> &'static str {
        "option-declarations"
    }

    fn description(&self) -> &'static str {
        "Replaces `def options` with `option` declarations"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodDefinition]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        if path.node.name() == Some("options") && path.in_class() {
            vec![OffenseDraft::at_node(path.node, "Use new-style option definitions")]
        } else {
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_single, correct, inspect};

    fn post_install(statement: &str) -> String {
        format!(
            "class Foo < Formula\n  desc \"foo\"\n  url 'https://brew.sh/foo-1.0.tgz'\n  def post_install\n    {statement}\n  end\nend\n"
        )
    }

    #[test]
    fn test_detects_unless_without() {
        let offenses = inspect(
            UnlessOptionQuery::new(),
            &post_install("return unless build.without? \"bar\""),
        );
        assert_single(
            &offenses,
            5,
            18,
            "Use if build.with? \"bar\" instead of unless build.without? \"bar\"",
        );
    }

    #[test]
    fn test_detects_unless_with() {
        let offenses = inspect(
            UnlessOptionQuery::new(),
            &post_install("return unless build.with? \"bar\""),
        );
        assert_single(
            &offenses,
            5,
            18,
            "Use if build.without? \"bar\" instead of unless build.with? \"bar\"",
        );
    }

    #[test]
    fn test_corrects_unless_block() {
        let corrected = correct(
            UnlessOptionQuery::new(),
            "unless build.without? \"bar\"\n  system \"make\"\nend\n",
        );
        assert_eq!(corrected, "if build.with? \"bar\"\n  system \"make\"\nend\n");
    }

    #[test]
    fn test_allows_unless_other_condition() {
        let offenses = inspect(
            UnlessOptionQuery::new(),
            &post_install("return unless build.head?"),
        );
        assert!(offenses.is_empty());
    }

    #[test]
    fn test_detects_negated_with() {
        let offenses = inspect(
            NegatedOptionQuery::new(),
            &post_install("return if !build.with? \"bar\""),
        );
        assert_single(
            &offenses,
            5,
            14,
            "Don't negate 'build.with?': use 'build.without?'",
        );
    }

    #[test]
    fn test_detects_negated_without() {
        let offenses = inspect(
            NegatedOptionQuery::new(),
            &post_install("return if !build.without? \"bar\""),
        );
        assert_single(
            &offenses,
            5,
            14,
            "Don't negate 'build.without?': use 'build.with?'",
        );
    }

    #[test]
    fn test_corrects_negation() {
        let corrected = correct(
            NegatedOptionQuery::new(),
            "x = !build.with?(\"bar\")\n",
        );
        assert_eq!(corrected, "x = build.without?(\"bar\")\n");
    }

    #[test]
    fn test_detects_duplicated_without() {
        let offenses = inspect(
            DuplicatedOptionPrefix::new(),
            &post_install("return if build.without? \"--without-bar\""),
        );
        assert_single(
            &offenses,
            5,
            30,
            "Don't duplicate 'without': Use `build.without? \"bar\"` to check for \"--without-bar\"",
        );
    }

    #[test]
    fn test_detects_duplicated_with() {
        let offenses = inspect(
            DuplicatedOptionPrefix::new(),
            &post_install("return if build.with? \"--with-bar\""),
        );
        assert_single(
            &offenses,
            5,
            27,
            "Don't duplicate 'with': Use `build.with? \"bar\"` to check for \"--with-bar\"",
        );
    }

    #[test]
    fn test_allows_opposite_prefix() {
        let offenses = inspect(
            DuplicatedOptionPrefix::new(),
            &post_install("return if build.with? \"without-bar\""),
        );
        assert!(offenses.is_empty());
    }

    #[test]
    fn test_corrects_duplicated_prefix() {
        let corrected = correct(
            DuplicatedOptionPrefix::new(),
            "if build.without?(\"without-bar\")\nend\n",
        );
        assert_eq!(corrected, "if build.without?(\"bar\")\nend\n");
    }

    #[test]
    fn test_detects_include_without() {
        let offenses = inspect(
            OptionIncludeQuery::new(),
            &post_install("return if build.include? \"without-bar\""),
        );
        assert_single(
            &offenses,
            5,
            30,
            "Use build.without? \"bar\" instead of build.include? 'without-bar'",
        );
    }

    #[test]
    fn test_corrects_include_with() {
        let corrected = correct(
            OptionIncludeQuery::new(),
            "if build.include? \"with-bar\"\nend\n",
        );
        assert_eq!(corrected, "if build.with? \"bar\"\nend\n");
    }

    #[test]
    fn test_detects_dashed_reference() {
        let offenses = inspect(
            DashedOptionReference::new(),
            &post_install("return if build.include? \"--bar\""),
        );
        assert_single(&offenses, 5, 30, "Reference 'bar' without dashes");
    }

    #[test]
    fn test_corrects_dashed_reference() {
        let corrected = correct(
            DashedOptionReference::new(),
            "if build.include? \"--universal\"\nend\n",
        );
        assert_eq!(corrected, "if build.include? \"universal\"\nend\n");
    }

    #[test]
    fn test_detects_def_options() {
        let offenses = inspect(
            LegacyOptionsMethod::new(),
            r#"
class Foo < Formula
  url 'https://brew.sh/foo-1.0.tgz'
  def options
    [["--bar", "desc"]]
  end
end
"#,
        );
        assert_single(&offenses, 4, 2, "Use new-style option definitions");
    }

    #[test]
    fn test_allows_top_level_options() {
        let offenses = inspect(LegacyOptionsMethod::new(), "def options\nend\n");
        assert!(offenses.is_empty());
    }
}
