//! Per-file rule exemptions.
//!
//! Some formulae legitimately do what a rule forbids (Wine still builds
//! universal binaries, cctools ships `install_name_tool`). An exemption
//! removes a rule for every file matching its conditions before the rule
//! ever runs.

use serde::{Deserialize, Serialize};

use crate::context::FileIdentity;
use crate::rule::Rule;
use crate::utils::patterns::{name_matches, path_matches};

/// A single exemption entry.
///
/// All conditions that are set must hold for the exemption to apply. An entry
/// with no conditions exempts every file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExemptionRule {
    /// Rule names, codes or families (glob syntax allowed).
    pub rules: Vec<String>,
    /// Path pattern (substring or glob) the file must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Class name pattern (exact or glob) the formula must declare.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Path pattern the file must *not* match. Files without a path match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unless_path: Option<String>,
    /// Why the exemption exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExemptionRule {
    /// Creates an exemption for the given rule patterns.
    #[must_use]
    pub fn for_rules<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rules: rules.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Restricts the exemption to paths matching `pattern`.
    #[must_use]
    pub fn path(mut self, pattern: impl Into<String>) -> Self {
        self.path = Some(pattern.into());
        self
    }

    /// Restricts the exemption to formulae whose class matches `pattern`.
    #[must_use]
    pub fn class_name(mut self, pattern: impl Into<String>) -> Self {
        self.class_name = Some(pattern.into());
        self
    }

    /// Restricts the exemption to paths *not* matching `pattern`.
    #[must_use]
    pub fn unless_path(mut self, pattern: impl Into<String>) -> Self {
        self.unless_path = Some(pattern.into());
        self
    }

    /// Records why the exemption exists.
    #[must_use]
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns true if this entry names the rule.
    #[must_use]
    pub fn applies_to_rule(&self, rule: &dyn Rule) -> bool {
        self.rules.iter().any(|pattern| {
            name_matches(rule.name(), pattern)
                || name_matches(rule.code(), pattern)
                || name_matches(rule.family(), pattern)
        })
    }

    /// Returns true if the file satisfies every condition of this entry.
    #[must_use]
    pub fn matches_file(&self, identity: &FileIdentity) -> bool {
        let path = identity.path_str();

        if let Some(pattern) = &self.path {
            if !path.as_deref().is_some_and(|p| path_matches(p, pattern)) {
                return false;
            }
        }

        if let Some(pattern) = &self.class_name {
            if !identity
                .class_name
                .as_deref()
                .is_some_and(|c| name_matches(c, pattern))
            {
                return false;
            }
        }

        if let Some(pattern) = &self.unless_path {
            if path.as_deref().is_some_and(|p| path_matches(p, pattern)) {
                return false;
            }
        }

        true
    }
}

/// The set of exemptions consulted by the analyzer.
#[derive(Debug, Clone, Default)]
pub struct ExemptionPolicy {
    entries: Vec<ExemptionRule>,
}

impl ExemptionPolicy {
    /// Creates an empty policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the built-in policy.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new()
            .with(
                ExemptionRule::for_rules(["universal-binary"])
                    .class_name("Wine")
                    .reason("wine builds 32-bit components"),
            )
            .with(
                ExemptionRule::for_rules(["install-name-tool"])
                    .class_name("Cctools")
                    .reason("cctools provides install_name_tool"),
            )
            .with(
                ExemptionRule::for_rules(["npm-install-args"])
                    .class_name("KibanaAT4*")
                    .reason("kibana 4.x predates Language::Node"),
            )
            .with(
                ExemptionRule::for_rules(["os-linux-check"])
                    .unless_path("/homebrew-core/")
                    .reason("only homebrew-core is macOS-only"),
            )
    }

    /// Adds an entry.
    #[must_use]
    pub fn with(mut self, entry: ExemptionRule) -> Self {
        self.entries.push(entry);
        self
    }

    /// Appends several entries.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = ExemptionRule>) {
        self.entries.extend(entries);
    }

    /// Returns true if `rule` is exempt for the given file.
    #[must_use]
    pub fn is_exempt(&self, rule: &dyn Rule, identity: &FileIdentity) -> bool {
        self.entries
            .iter()
            .any(|e| e.applies_to_rule(rule) && e.matches_file(identity))
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &ExemptionRule> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FileContext;
    use crate::syntax::{NodeKind, NodePath};
    use crate::types::OffenseDraft;
    use std::path::PathBuf;

    struct Named(&'static str, &'static str, &'static str);

    impl Rule for Named {
        fn name(&self) -> &'static str {
            self.0
        }
        fn code(&self) -> &'static str {
            self.1
        }
        fn family(&self) -> &'static str {
            self.2
        }
        fn target_kinds(&self) -> &'static [NodeKind] {
            &[]
        }
        fn check(&self, _ctx: &FileContext<'_>, _path: &NodePath<'_>) -> Vec<OffenseDraft> {
            Vec::new()
        }
    }

    fn identity(path: Option<&str>, class: Option<&str>) -> FileIdentity {
        FileIdentity::new(path.map(PathBuf::from), class.map(String::from))
    }

    #[test]
    fn class_exemption_applies_without_path() {
        let policy = ExemptionPolicy::builtin();
        let rule = Named("universal-binary", "FA020", "miscellaneous");
        assert!(policy.is_exempt(&rule, &identity(None, Some("Wine"))));
        assert!(!policy.is_exempt(&rule, &identity(None, Some("Foo"))));
    }

    #[test]
    fn class_glob_exemption() {
        let policy = ExemptionPolicy::builtin();
        let rule = Named("npm-install-args", "FA023", "miscellaneous");
        let file = identity(Some("/t/homebrew-core/Formula/kibana@4.4.rb"), Some("KibanaAT44"));
        assert!(policy.is_exempt(&rule, &file));
    }

    #[test]
    fn unless_path_exempts_files_outside_core() {
        let policy = ExemptionPolicy::builtin();
        let rule = Named("os-linux-check", "FA016", "miscellaneous");
        assert!(policy.is_exempt(&rule, &identity(None, Some("Foo"))));
        assert!(policy.is_exempt(&rule, &identity(Some("/taps/my-tap/foo.rb"), None)));
        assert!(!policy.is_exempt(
            &rule,
            &identity(Some("/taps/homebrew-core/Formula/foo.rb"), None)
        ));
    }

    #[test]
    fn path_condition_requires_a_path() {
        let entry = ExemptionRule::for_rules(["lines"]).path("Formula/legacy/");
        let rule = Named("deprecated-dependency", "FA001", "lines");
        assert!(entry.applies_to_rule(&rule));
        assert!(!entry.matches_file(&identity(None, None)));
        assert!(entry.matches_file(&identity(Some("/x/Formula/legacy/a.rb"), None)));
    }

    #[test]
    fn all_conditions_must_hold() {
        let entry = ExemptionRule::for_rules(["FA0*"])
            .path("Formula/")
            .class_name("Foo");
        assert!(entry.matches_file(&identity(Some("Formula/foo.rb"), Some("Foo"))));
        assert!(!entry.matches_file(&identity(Some("Formula/foo.rb"), Some("Bar"))));
        assert!(!entry.matches_file(&identity(Some("Casks/foo.rb"), Some("Foo"))));
    }

    #[test]
    fn exemptions_deserialize_from_toml() {
        #[derive(serde::Deserialize)]
        struct Doc {
            exemptions: Vec<ExemptionRule>,
        }
        let doc: Doc = toml::from_str(
            r#"
            [[exemptions]]
            rules = ["universal-binary"]
            class_name = "Wine"
            "#,
        )
        .expect("exemptions should parse");
        assert_eq!(doc.exemptions[0].class_name.as_deref(), Some("Wine"));
        assert!(doc.exemptions[0].path.is_none());
    }
}
