//! Checks on shell-outs and filesystem helpers.
//!
//! Most of these look at the first argument of `system`, which names the
//! executable to run.

use formula_audit_core::{
    FileContext, Fix, NodeKind, NodePath, OffenseDraft, Rule, SyntaxNode, TextRange,
};

use tracing::debug;

use crate::support::{first_word, system_arguments, system_command};

/// Flags a redundant `FileUtils.` receiver.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileUtilsNamespace;

impl FileUtilsNamespace {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for FileUtilsNamespace {
    fn name(&self) -> &'static str {
        "fileutils-namespace"
    }

    fn code(&self) -> &'static str {
        "FA013"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Drops the redundant `FileUtils.` receiver"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        if !node.is_call_on("FileUtils") {
            return vec![];
        }
        let (Some(receiver), Some(method)) = (node.receiver(), node.method_node()) else {
            return vec![];
        };

        vec![OffenseDraft::at_node(
            node,
            format!("Don't need 'FileUtils.' before {}", method.text),
        )
        .with_fix(Fix::remove(TextRange::new(
            receiver.range.start_byte,
            method.range.start_byte,
        )))]
    }
}

/// Flags `system "install_name_tool", ...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallNameTool;

impl InstallNameTool {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for InstallNameTool {
    fn name(&self) -> &'static str {
        "install-name-tool"
    }

    fn code(&self) -> &'static str {
        "FA022"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Prefers ruby-macho over shelling out to install_name_tool"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        match system_command(path.node) {
            Some((command, "install_name_tool")) => vec![OffenseDraft::at_content(
                command,
                "Use ruby-macho instead of calling \"install_name_tool\"",
            )],
            _ => vec![],
        }
    }
}

/// Flags `system "npm", "install"` without `Language::Node` arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmInstallArgs;

impl NpmInstallArgs {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NpmInstallArgs {
    fn name(&self) -> &'static str {
        "npm-install-args"
    }

    fn code(&self) -> &'static str {
        "FA023"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Requires Language::Node arguments for npm install"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let Some(arguments) = system_arguments(path.node) else {
            return vec![];
        };
        let values: Vec<Option<&str>> = arguments
            .iter()
            .take(2)
            .map(|arg| arg.string_value())
            .collect();
        if values != [Some("npm"), Some("install")] {
            return vec![];
        }
        if arguments
            .iter()
            .any(|arg| arg.text.contains("Language::Node"))
        {
            return vec![];
        }

        vec![OffenseDraft::at_node(
            path.node,
            "Use Language::Node for npm install args",
        )]
    }
}

/// Flags `system "<FileUtils method>", ...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFileUtils;

impl SystemFileUtils {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for SystemFileUtils {
    fn name(&self) -> &'static str {
        "system-fileutils"
    }

    fn code(&self) -> &'static str {
        "FA027"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Prefers Ruby FileUtils methods over shelling out"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let Some((command, value)) = system_command(path.node) else {
            return vec![];
        };
        let method = first_word(value);
        if !ctx.tables.is_fileutils_method(method) {
            return vec![];
        }

        vec![OffenseDraft::at_content(
            command,
            format!(
                "Use the `{method}` Ruby method instead of `{}`",
                path.node.text
            ),
        )]
    }
}

/// Flags compilers hard-coded in `system` calls or `ENV[...]` assignments.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardcodedCompiler;

impl HardcodedCompiler {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// String literal naming a command: first `system` argument or `ENV[...] =` value.
fn command_literal(node: &SyntaxNode) -> Option<&SyntaxNode> {
    match node.kind {
        NodeKind::MethodCall => system_command(node).map(|(command, _)| command),
        NodeKind::Assignment => {
            let target = node.child_by_field("left")?;
            let is_env = target.is(NodeKind::ElementReference)
                && target
                    .child_by_field("object")
                    .is_some_and(|object| object.text == "ENV");
            let value = node.child_by_field("right")?;
            (is_env && value.string_value().is_some()).then_some(value)
        }
        _ => None,
    }
}

impl Rule for HardcodedCompiler {
    fn name(&self) -> &'static str {
        "hardcoded-compiler"
    }

    fn code(&self) -> &'static str {
        "FA032"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Prefers `ENV.cc`/`ENV.cxx` over hard-coded compilers"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall, NodeKind::Assignment]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let Some(literal) = command_literal(path.node) else {
            return vec![];
        };
        let Some(value) = literal.string_value() else {
            return vec![];
        };
        let Some((compiler, accessor)) = ctx.tables.compiler_for(value) else {
            return vec![];
        };

        let draft = OffenseDraft::at_content(
            literal,
            format!("Use \"#{{{accessor}}}\" instead of hard-coding \"{compiler}\""),
        );
        if value.strip_prefix("/usr/bin/").unwrap_or(value) == compiler {
            vec![draft.with_fix(Fix::replace_node(literal, accessor))]
        } else {
            debug!("Not correcting {:?}: carries arguments besides {}", value, compiler);
            vec![draft]
        }
    }
}

/// Flags `system "export", ...` and `system "env", ...`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellEnvMutation;

impl ShellEnvMutation {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ShellEnvMutation {
    fn name(&self) -> &'static str {
        "shell-env-mutation"
    }

    fn code(&self) -> &'static str {
        "FA035"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Prefers `ENV` over shelling out to modify the environment"
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::MethodCall]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let Some((command, value)) = system_command(path.node) else {
            return vec![];
        };
        match first_word(value) {
            word @ ("export" | "env") => vec![OffenseDraft::at_content(
                command,
                format!("Use ENV instead of invoking '{word}' to modify the environment"),
            )],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_single, correct, inspect};

    fn install(statement: &str) -> String {
        format!(
            "class Foo < Formula\n  url 'https://brew.sh/foo-1.0.tgz'\n  def install\n    {statement}\n  end\nend\n"
        )
    }

    #[test]
    fn test_detects_fileutils_receiver() {
        let offenses = inspect(
            FileUtilsNamespace::new(),
            "class Foo < Formula\n  FileUtils.mv \"hello\"\nend\n",
        );
        assert_single(&offenses, 2, 2, "Don't need 'FileUtils.' before mv");
    }

    #[test]
    fn test_corrects_fileutils_receiver() {
        let corrected = correct(FileUtilsNamespace::new(), "FileUtils.rm_rf \"build\"\n");
        assert_eq!(corrected, "rm_rf \"build\"\n");
    }

    #[test]
    fn test_detects_install_name_tool() {
        let offenses = inspect(
            InstallNameTool::new(),
            "class Foo < Formula\n  system \"install_name_tool\", \"-id\"\nend\n",
        );
        assert_single(
            &offenses,
            2,
            10,
            "Use ruby-macho instead of calling \"install_name_tool\"",
        );
    }

    #[test]
    fn test_install_name_tool_exempt_for_cctools() {
        let offenses = inspect(
            InstallNameTool::new(),
            "class Cctools < Formula\n  system \"install_name_tool\", \"-id\"\nend\n",
        );
        assert!(offenses.is_empty());
    }

    #[test]
    fn test_detects_bare_npm_install() {
        let offenses = inspect(
            NpmInstallArgs::new(),
            "class Foo < Formula\n  system \"npm\", \"install\"\nend\n",
        );
        assert_single(&offenses, 2, 2, "Use Language::Node for npm install args");
    }

    #[test]
    fn test_allows_language_node_args() {
        let offenses = inspect(
            NpmInstallArgs::new(),
            "system \"npm\", \"install\", *Language::Node.std_npm_install_args(libexec)\n",
        );
        assert!(offenses.is_empty());
    }

    #[test]
    fn test_npm_install_exempt_for_kibana() {
        let offenses = inspect(
            NpmInstallArgs::new(),
            "class KibanaAT44 < Formula\n  system \"npm\", \"install\"\nend\n",
        );
        assert!(offenses.is_empty());
    }

    #[test]
    fn test_detects_system_mkdir() {
        let offenses = inspect(
            SystemFileUtils::new(),
            "class Foo < Formula\n  system \"mkdir\", \"foo\"\nend\n",
        );
        assert_single(
            &offenses,
            2,
            10,
            "Use the `mkdir` Ruby method instead of `system \"mkdir\", \"foo\"`",
        );
    }

    #[test]
    fn test_allows_system_make() {
        let offenses = inspect(SystemFileUtils::new(), "system \"make\", \"install\"\n");
        assert!(offenses.is_empty());
    }

    #[test]
    fn test_detects_hardcoded_gcc() {
        let offenses = inspect(
            HardcodedCompiler::new(),
            &install("system \"/usr/bin/gcc\", \"foo\""),
        );
        assert_single(
            &offenses,
            4,
            12,
            "Use \"#{ENV.cc}\" instead of hard-coding \"gcc\"",
        );
    }

    #[test]
    fn test_detects_hardcoded_gxx() {
        let offenses = inspect(
            HardcodedCompiler::new(),
            &install("system \"/usr/bin/g++\", \"-o\", \"foo\", \"foo.cc\""),
        );
        assert_single(
            &offenses,
            4,
            12,
            "Use \"#{ENV.cxx}\" instead of hard-coding \"g++\"",
        );
    }

    #[test]
    fn test_detects_compiler_in_env() {
        let offenses = inspect(
            HardcodedCompiler::new(),
            &install("ENV[\"COMPILER_PATH\"] = \"/usr/bin/llvm-g++\""),
        );
        assert_single(
            &offenses,
            4,
            28,
            "Use \"#{ENV.cxx}\" instead of hard-coding \"llvm-g++\"",
        );
    }

    #[test]
    fn test_corrects_hardcoded_compiler() {
        let corrected = correct(
            HardcodedCompiler::new(),
            "system \"gcc\", \"foo.c\"\nENV[\"CC\"] = \"/usr/bin/clang\"\nsystem \"gcc -O2\"\n",
        );
        assert_eq!(
            corrected,
            "system ENV.cc, \"foo.c\"\nENV[\"CC\"] = ENV.cc\nsystem \"gcc -O2\"\n"
        );
    }

    #[test]
    fn test_detects_shell_export() {
        let offenses = inspect(
            ShellEnvMutation::new(),
            "class Foo < Formula\n  system \"export\", \"var=value\"\nend\n",
        );
        assert_single(
            &offenses,
            2,
            10,
            "Use ENV instead of invoking 'export' to modify the environment",
        );
    }
}
