//! The `miscellaneous` rule family.
//!
//! Deprecated APIs, platform checks, shell-outs, path spelling and
//! dependency declarations that do not belong to a narrower family.
//!
//! # Suppression
//!
//! - `# formula-audit: allow(<rule-name>)` comment on the line or the line above
//! - `[[exemptions]]` entries in `formula-audit.toml`

mod definitions;
mod dependencies;
mod environment;
mod paths;
mod system_calls;

pub use definitions::{
    FailsWithLlvm, InreplaceBlockVariable, LegacyTestMethod, SkipCleanAll, TopLevelMethod,
    ZeroRebuild,
};
pub use dependencies::{
    ConditionalDependency, DependencyOption, RequirementInstance, VendoredLanguageDependency,
};
pub use environment::{
    ArgvHead, ArgvOptions, DeprecatedEnvHelper, LegacyMacosCheck, MacosVersionConstant,
    OsLinuxCheck, UniversalBinary, VersionHeadComparison,
};
pub use paths::{ManPathConcat, NonGlobDir, PreferPathShortcut};
pub use system_calls::{
    FileUtilsNamespace, HardcodedCompiler, InstallNameTool, NpmInstallArgs, ShellEnvMutation,
    SystemFileUtils,
};
