//! Checks on queries about the host platform, build options and version.

use formula_audit_core::{FileContext, Fix, NodeKind, NodePath, OffenseDraft, Rule};

/// Flags `OS.linux?` in core formulae.
///
/// Formulae outside the core tap are exempted by the built-in
/// `unless_path` exemption.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsLinuxCheck;

impl OsLinuxCheck {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for OsLinuxCheck {
    fn name(&self) -> &'static str {
        "os-linux-check"
    }

    fn code(&self) -> &'static str {
        "FA016"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Forbids `OS.linux?` in macOS-only core formulae"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        if path.node.is_call_to(Some("OS"), "linux?") {
            vec![OffenseDraft::at_node(
                path.node,
                "Don't use OS.linux?; Homebrew/core only supports macOS",
            )]
        } else {
            vec![]
        }
    }
}

/// Flags `build.universal?` and `ENV.universal_binary`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalBinary;

impl UniversalBinary {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for UniversalBinary {
    fn name(&self) -> &'static str {
        "universal-binary"
    }

    fn code(&self) -> &'static str {
        "FA020"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Flags universal binary support on a 64-bit only platform"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        let expression = if node.is_call_to(Some("build"), "universal?") {
            "build.universal?"
        } else if node.is_call_to(Some("ENV"), "universal_binary") {
            "ENV.universal_binary"
        } else {
            return vec![];
        };

        vec![OffenseDraft::at_node(
            node,
            format!("macOS has been 64-bit only since 10.6 so {expression} is deprecated."),
        )]
    }
}

/// Flags deprecated `ENV` helpers listed in the env-helper table.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeprecatedEnvHelper;

impl DeprecatedEnvHelper {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DeprecatedEnvHelper {
    fn name(&self) -> &'static str {
        "deprecated-env-helper"
    }

    fn code(&self) -> &'static str {
        "FA021"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Replaces deprecated `ENV` helpers with dependencies"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        if !node.is_call_on("ENV") {
            return vec![];
        }
        node.method_name()
            .and_then(|method| ctx.tables.env_helpers.get(method))
            .map(|message| vec![OffenseDraft::at_node(node, message.as_str())])
            .unwrap_or_default()
    }
}

/// Flags `MacOS.<release>?` for legacy release names.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyMacosCheck;

impl LegacyMacosCheck {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for LegacyMacosCheck {
    fn name(&self) -> &'static str {
        "legacy-macos-check"
    }

    fn code(&self) -> &'static str {
        "FA025"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Prefers comparisons to `MacOS.version` over release predicates"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        if !node.is_call_on("MacOS") {
            return vec![];
        }
        let Some(method) = node.method_name() else {
            return vec![];
        };
        match method.strip_suffix('?') {
            Some(release) if ctx.tables.is_legacy_release(release) => {
                vec![OffenseDraft::at_node(
                    node,
                    format!(
                        "\"MacOS.{method}\" is deprecated, use a comparison to MacOS.version instead"
                    ),
                )]
            }
            _ => vec![],
        }
    }
}

/// Flags `ARGV.verbose?`, `ARGV.debug?` and friends.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgvOptions;

impl ArgvOptions {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ArgvOptions {
    fn name(&self) -> &'static str {
        "argv-options"
    }

    fn code(&self) -> &'static str {
        "FA029"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Prefers `build` over `ARGV` for option checks"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        let flagged = node.is_call_on("ARGV")
            && node
                .method_name()
                .is_some_and(|m| ctx.tables.is_argv_option_method(m));
        if flagged {
            vec![OffenseDraft::at_node(
                node,
                "Use build instead of ARGV to check options",
            )]
        } else {
            vec![]
        }
    }
}

/// Flags `ARGV.include? "--HEAD"` / `"--devel"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArgvHead;

impl ArgvHead {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ArgvHead {
    fn name(&self) -> &'static str {
        "argv-head"
    }

    fn code(&self) -> &'static str {
        "FA030"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Prefers `build.head?` over inspecting `ARGV`"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        if !node.is_call_to(Some("ARGV"), "include?") {
            return vec![];
        }
        let Some(argument) = node.first_argument() else {
            return vec![];
        };
        let channel = match argument.string_value() {
            Some("--HEAD") => "head",
            Some("--devel") => "devel",
            _ => return vec![],
        };

        vec![
            OffenseDraft::at_content(argument, format!("Use \"if build.{channel}?\" instead"))
                .with_fix(Fix::replace_node(node, format!("build.{channel}?"))),
        ]
    }
}

/// Flags `version == "HEAD"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionHeadComparison;

impl VersionHeadComparison {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for VersionHeadComparison {
    fn name(&self) -> &'static str {
        "version-head-comparison"
    }

    fn code(&self) -> &'static str {
        "FA037"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Prefers `build.head?` over comparing `version` to \"HEAD\""
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Binary]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        let left = node.child_by_field("left");
        let right = node.child_by_field("right");
        let matches = node.token("==").is_some()
            && left.is_some_and(|l| l.is(NodeKind::Identifier) && l.text == "version")
            && right.and_then(|r| r.string_value()) == Some("HEAD");
        if !matches {
            return vec![];
        }

        vec![OffenseDraft::at_node(
            node,
            "Use 'build.head?' instead of inspecting 'version'",
        )
        .with_fix(Fix::replace_node(node, "build.head?"))]
    }
}

/// Flags the `MACOS_VERSION` constant.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacosVersionConstant;

impl MacosVersionConstant {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for MacosVersionConstant {
    fn name(&self) -> &'static str {
        "macos-version-constant"
    }

    fn code(&self) -> &'static str {
        "FA038"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Replaces `MACOS_VERSION` with `MacOS.version`"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Constant]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        let scoped = path
            .parent()
            .is_some_and(|p| p.is(NodeKind::ScopedConstant));
        if node.text != "MACOS_VERSION" || scoped {
            return vec![];
        }

        vec![
            OffenseDraft::at_node(node, "Use MacOS.version instead of MACOS_VERSION")
                .with_fix(Fix::replace_node(node, "MacOS.version")),
        ]
    }
}
