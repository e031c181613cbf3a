//! Checks on `depends_on` declarations beyond the deprecated symbols.

use formula_audit_core::{FileContext, Fix, NodeKind, NodePath, OffenseDraft, Rule, SyntaxNode};

use crate::support::{build_query, dependency};

/// Flags `depends_on Requirement.new`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequirementInstance;

impl RequirementInstance {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for RequirementInstance {
    fn name(&self) -> &'static str {
        "requirement-instance"
    }

    fn code(&self) -> &'static str {
        "FA024"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Prefers requirement classes over instances in `depends_on`"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let Some(argument) = dependency(path.node) else {
            return vec![];
        };
        if !argument.is(NodeKind::MethodCall)
            || argument.method_name() != Some("new")
            || !argument.arguments().is_empty()
        {
            return vec![];
        }
        let Some(class) = argument
            .receiver()
            .filter(|r| matches!(r.kind, NodeKind::Constant | NodeKind::ScopedConstant))
        else {
            return vec![];
        };

        vec![OffenseDraft::at_node(
            argument,
            "`depends_on` can take requirement classes instead of instances",
        )
        .with_fix(Fix::replace_node(argument, class.text.as_str()))]
    }
}

/// Flags `depends_on "x" => :lua51` and other language module tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct VendoredLanguageDependency;

impl VendoredLanguageDependency {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for VendoredLanguageDependency {
    fn name(&self) -> &'static str {
        "vendored-language-dependency"
    }

    fn code(&self) -> &'static str {
        "FA034"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Requires language modules to be vendored"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let Some(pair) = dependency(path.node).filter(|a| a.is(NodeKind::Pair)) else {
            return vec![];
        };
        let Some(value) = pair.child_by_field("value") else {
            return vec![];
        };
        let tags: Vec<&SyntaxNode> = match value.kind {
            NodeKind::Symbol => vec![value],
            NodeKind::Array => value.named_children().collect(),
            _ => vec![],
        };

        tags.into_iter()
            .filter_map(|tag| {
                let ecosystem = ctx.tables.vendored_ecosystem(tag.symbol_name()?)?;
                Some(OffenseDraft::at_content(
                    tag,
                    format!(
                        "{ecosystem} modules should be vendored rather than use deprecated {}`",
                        path.node.text
                    ),
                ))
            })
            .collect()
    }
}

/// Flags string options on dependencies (`depends_on "foo" => "with-bar"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyOption;

impl DependencyOption {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DependencyOption {
    fn name(&self) -> &'static str {
        "dependency-option"
    }

    fn code(&self) -> &'static str {
        "FA036"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Forbids passing build options to dependencies"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let Some(pair) = dependency(path.node).filter(|a| a.is(NodeKind::Pair)) else {
            return vec![];
        };
        let (Some(key), Some(value)) = (pair.child_by_field("key"), pair.child_by_field("value"))
        else {
            return vec![];
        };
        let Some(name) = key.string_value() else {
            return vec![];
        };
        let options: Vec<&str> = match value.kind {
            NodeKind::String => value.string_value().into_iter().collect(),
            NodeKind::Array => value
                .named_children()
                .filter_map(SyntaxNode::string_value)
                .collect(),
            _ => vec![],
        };

        options
            .into_iter()
            .filter(|option| !ctx.tables.is_known_dependency_option(option))
            .map(|option| {
                OffenseDraft::at_node(
                    key,
                    format!("Dependency {name} should not use option {option}"),
                )
            })
            .collect()
    }
}

/// Flags `depends_on "foo" if build.with? "foo"` and similar conditionals.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalDependency;

impl ConditionalDependency {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Tag equivalent to a `build.<query> "<option>"` guard on dependency `name`.
fn dependency_tag(
    modifier: NodeKind,
    query: &str,
    option: &str,
    name: &str,
) -> Option<&'static str> {
    let matches_with = option == format!("with-{name}");
    let matches_without = option == format!("without-{name}");
    match (modifier, query) {
        (NodeKind::IfModifier, "with?") if option.ends_with(name) => Some("optional"),
        (NodeKind::IfModifier, "include?") if matches_with => Some("optional"),
        (NodeKind::UnlessModifier, "without?") if option.ends_with(name) => Some("recommended"),
        (NodeKind::UnlessModifier, "include?") if matches_without => Some("recommended"),
        _ => None,
    }
}

impl Rule for ConditionalDependency {
    fn name(&self) -> &'static str {
        "conditional-dependency"
    }

    fn code(&self) -> &'static str {
        "FA039"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Prefers `:optional`/`:recommended` tags over conditional dependencies"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::IfModifier, NodeKind::UnlessModifier]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        let (Some(body), Some(condition)) = (node.child_by_field("body"), node.condition()) else {
            return vec![];
        };
        let Some(argument) = dependency(body) else {
            return vec![];
        };
        if body.arguments().len() != 1 {
            return vec![];
        }
        let Some(name) = argument.literal_value() else {
            return vec![];
        };
        let Some(query) = build_query(condition) else {
            return vec![];
        };
        let Some(option) = condition.first_argument().and_then(SyntaxNode::string_value) else {
            return vec![];
        };
        let Some(tag) = dependency_tag(node.kind, query, option, name) else {
            return vec![];
        };

        let replacement = format!("{} => :{tag}", body.text);
        vec![OffenseDraft::at_node(
            body,
            format!("Replace {} with {replacement}", node.text),
        )
        .with_fix(Fix::replace_node(node, replacement))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_single, correct, inspect};

    #[test]
    fn test_detects_requirement_instance() {
        let offenses = inspect(
            RequirementInstance::new(),
            "class Foo < Formula\n  depends_on FOO::BAR.new\nend\n",
        );
        assert_single(
            &offenses,
            2,
            13,
            "`depends_on` can take requirement classes instead of instances",
        );
    }

    #[test]
    fn test_corrects_requirement_instance() {
        let corrected = correct(RequirementInstance::new(), "depends_on X11Requirement.new\n");
        assert_eq!(corrected, "depends_on X11Requirement\n");
    }

    #[test]
    fn test_allows_instance_with_arguments() {
        let offenses = inspect(
            RequirementInstance::new(),
            "depends_on FooRequirement.new(\"1.0\")\n",
        );
        assert!(offenses.is_empty());
    }

    #[test]
    fn test_detects_lua_module_dependency() {
        let offenses = inspect(
            VendoredLanguageDependency::new(),
            "class Foo < Formula\n  depends_on \"lpeg\" => :lua51\nend\n",
        );
        assert_single(
            &offenses,
            2,
            24,
            "lua modules should be vendored rather than use deprecated depends_on \"lpeg\" => :lua51`",
        );
    }

    #[test]
    fn test_detects_tag_in_array() {
        let offenses = inspect(
            VendoredLanguageDependency::new(),
            "depends_on \"Net::SSLeay\" => [:perl, :build]\n",
        );
        assert_eq!(offenses.len(), 1);
        assert!(offenses[0].message.starts_with("perl modules"));
    }

    #[test]
    fn test_allows_build_tags() {
        let offenses = inspect(
            VendoredLanguageDependency::new(),
            "depends_on \"lua\" => :build\ndepends_on \"python\"\n",
        );
        assert!(offenses.is_empty());
    }

    #[test]
    fn test_detects_dependency_option() {
        let offenses = inspect(
            DependencyOption::new(),
            "class Foo < Formula\n  depends_on \"foo\" => \"with-bar\"\nend\n",
        );
        assert_single(&offenses, 2, 13, "Dependency foo should not use option with-bar");
    }

    #[test]
    fn test_detects_options_in_array() {
        let offenses = inspect(
            DependencyOption::new(),
            "depends_on \"foo\" => [\"with-bar\", :build, \"with-baz\"]\n",
        );
        let messages: Vec<&str> = offenses.iter().map(|o| o.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Dependency foo should not use option with-bar",
                "Dependency foo should not use option with-baz",
            ]
        );
    }

    #[test]
    fn test_detects_optional_dependency() {
        let offenses = inspect(
            ConditionalDependency::new(),
            "class Foo < Formula\n  depends_on \"foo\" if build.with? \"with-foo\"\nend\n",
        );
        assert_single(
            &offenses,
            2,
            2,
            "Replace depends_on \"foo\" if build.with? \"with-foo\" with depends_on \"foo\" => :optional",
        );
    }

    #[test]
    fn test_detects_recommended_dependency() {
        let offenses = inspect(
            ConditionalDependency::new(),
            "class Foo < Formula\n  depends_on :foo unless build.without? \"foo\"\nend\n",
        );
        assert_single(
            &offenses,
            2,
            2,
            "Replace depends_on :foo unless build.without? \"foo\" with depends_on :foo => :recommended",
        );
    }

    #[test]
    fn test_detects_include_without() {
        let offenses = inspect(
            ConditionalDependency::new(),
            "class Foo < Formula\n  depends_on :foo unless build.include? \"without-foo\"\nend\n",
        );
        assert_single(
            &offenses,
            2,
            2,
            "Replace depends_on :foo unless build.include? \"without-foo\" with depends_on :foo => :recommended",
        );
    }

    #[test]
    fn test_include_requires_exact_option() {
        let offenses = inspect(
            ConditionalDependency::new(),
            "depends_on \"foo\" if build.include? \"--with-foo\"\ndepends_on \"foo\" unless build.include? \"no-without-foo\"\n",
        );
        assert!(offenses.is_empty());

        let offenses = inspect(
            ConditionalDependency::new(),
            "depends_on \"foo\" if build.include? \"with-foo\"\n",
        );
        assert_eq!(offenses.len(), 1);
    }

    #[test]
    fn test_allows_unrelated_condition() {
        let offenses = inspect(
            ConditionalDependency::new(),
            "depends_on \"foo\" if build.with? \"bar\"\ndepends_on \"foo\" if MacOS.version > :sierra\n",
        );
        assert!(offenses.is_empty());
    }

    #[test]
    fn test_corrects_conditional_dependency() {
        let corrected = correct(
            ConditionalDependency::new(),
            "depends_on \"foo\" if build.with? \"foo\"\n",
        );
        assert_eq!(corrected, "depends_on \"foo\" => :optional\n");
    }
}
