//! Rule presets for common configurations.

use formula_audit_core::{
    FileContext, NodeKind, NodePath, OffenseDraft, OffenseOrder, Rule, RuleBox, Severity,
};

use crate::{
    ArgvHead, ArgvOptions, AssertInclude, AssertPredicate, ClassInheritanceSpace,
    CommentedDependency, ConditionalDependency, DashedOptionReference, DependencyOption,
    DeprecatedDependency, DeprecatedEnvHelper, DuplicatedOptionPrefix, FailsWithLlvm,
    FileUtilsNamespace, HardcodedCompiler, InreplaceBlockVariable, InstallNameTool,
    LegacyMacosCheck, LegacyOptionsMethod, LegacyTestMethod, MacosVersionConstant, ManPathConcat,
    NegatedOptionQuery, NonGlobDir, NpmInstallArgs, OptionIncludeQuery, OsLinuxCheck,
    PreferPathShortcut, RequirementInstance, ShellEnvMutation, SkipCleanAll, SystemFileUtils,
    TemplateComment, TopLevelMethod, UniversalBinary, UnlessOptionQuery,
    VendoredLanguageDependency, VersionHeadComparison, ZeroRebuild,
};

/// Preset configurations for formula-audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every rule at its default severity.
    Recommended,
    /// Every rule, style conventions promoted to warnings.
    Strict,
    /// Deprecation rules only, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }

    /// Name used in configuration files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "minimal" => Ok(Self::Minimal),
            other => Err(format!("unknown preset: {other}")),
        }
    }
}

/// Returns the recommended set of rules: the whole catalogue.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    all_rules()
}

/// Returns the strict set of rules.
///
/// Same catalogue as [`recommended_rules`], with every rule whose default
/// severity is `convention` reporting at `warning` instead.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    all_rules()
        .into_iter()
        .map(|rule| -> RuleBox {
            if rule.default_severity() < Severity::Warning {
                Box::new(Promoted {
                    inner: rule,
                    severity: Severity::Warning,
                })
            } else {
                rule
            }
        })
        .collect()
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes rules flagging deprecated or no-op
/// constructs:
/// - `deprecated-dependency` (FA001)
/// - `fails-with-llvm` (FA017)
/// - `skip-clean-all` (FA019)
/// - `universal-binary` (FA020)
/// - `deprecated-env-helper` (FA021)
/// - `legacy-macos-check` (FA025)
/// - `argv-options` (FA029) and `argv-head` (FA030)
/// - `version-head-comparison` (FA037)
/// - `macos-version-constant` (FA038)
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![
        Box::new(DeprecatedDependency::new()),
        Box::new(FailsWithLlvm::new()),
        Box::new(SkipCleanAll::new()),
        Box::new(UniversalBinary::new()),
        Box::new(DeprecatedEnvHelper::new()),
        Box::new(LegacyMacosCheck::new()),
        Box::new(ArgvOptions::new()),
        Box::new(ArgvHead::new()),
        Box::new(VersionHeadComparison::new()),
        Box::new(MacosVersionConstant::new()),
    ]
}

/// Returns all available rules in catalogue order.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(DeprecatedDependency::new()),
        Box::new(ClassInheritanceSpace::new()),
        Box::new(TemplateComment::new()),
        Box::new(CommentedDependency::new()),
        Box::new(AssertInclude::new()),
        Box::new(AssertPredicate::new()),
        Box::new(UnlessOptionQuery::new()),
        Box::new(NegatedOptionQuery::new()),
        Box::new(DuplicatedOptionPrefix::new()),
        Box::new(OptionIncludeQuery::new()),
        Box::new(DashedOptionReference::new()),
        Box::new(LegacyOptionsMethod::new()),
        Box::new(FileUtilsNamespace::new()),
        Box::new(InreplaceBlockVariable::new()),
        Box::new(ZeroRebuild::new()),
        Box::new(OsLinuxCheck::new()),
        Box::new(FailsWithLlvm::new()),
        Box::new(LegacyTestMethod::new()),
        Box::new(SkipCleanAll::new()),
        Box::new(UniversalBinary::new()),
        Box::new(DeprecatedEnvHelper::new()),
        Box::new(InstallNameTool::new()),
        Box::new(NpmInstallArgs::new()),
        Box::new(RequirementInstance::new()),
        Box::new(LegacyMacosCheck::new()),
        Box::new(NonGlobDir::new()),
        Box::new(SystemFileUtils::new()),
        Box::new(TopLevelMethod::new()),
        Box::new(ArgvOptions::new()),
        Box::new(ArgvHead::new()),
        Box::new(ManPathConcat::new()),
        Box::new(HardcodedCompiler::new()),
        Box::new(PreferPathShortcut::new()),
        Box::new(VendoredLanguageDependency::new()),
        Box::new(ShellEnvMutation::new()),
        Box::new(DependencyOption::new()),
        Box::new(VersionHeadComparison::new()),
        Box::new(MacosVersionConstant::new()),
        Box::new(ConditionalDependency::new()),
    ]
}

/// A rule reported at a different default severity.
struct Promoted {
    inner: RuleBox,
    severity: Severity,
}

impl Rule for Promoted {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn code(&self) -> &'static str {
        self.inner.code()
    }

    fn family(&self) -> &'static str {
        self.inner.family()
    }

    fn description(&self) -> &'static str {
        self.inner.description()
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn correctable(&self) -> bool {
        self.inner.correctable()
    }

    fn order(&self) -> OffenseOrder {
        self.inner.order()
    }

    fn requires_allow_reason(&self) -> bool {
        self.inner.requires_allow_reason()
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        self.inner.target_kinds()
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        self.inner.check(ctx, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_preset_rules() {
        assert!(!Preset::Recommended.rules().is_empty());
        assert!(!Preset::Strict.rules().is_empty());
        assert!(!Preset::Minimal.rules().is_empty());
    }

    #[test]
    fn test_catalogue_is_ordered_and_unique() {
        let rules = all_rules();
        assert_eq!(rules.len(), 39);

        let codes: Vec<&str> = rules.iter().map(|r| r.code()).collect();
        let expected: Vec<String> = (1..=39).map(|n| format!("FA{n:03}")).collect();
        assert_eq!(codes, expected);

        let names: HashSet<&str> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names.len(), rules.len());
        assert!(rules.iter().all(|r| !r.description().is_empty()));
        assert!(rules.iter().all(|r| !r.target_kinds().is_empty()));
    }

    #[test]
    fn test_only_deprecated_dependency_reverses() {
        let reversed: Vec<&str> = all_rules()
            .iter()
            .filter(|r| r.order() == OffenseOrder::Reverse)
            .map(|r| r.name())
            .collect();
        assert_eq!(reversed, vec!["deprecated-dependency"]);
    }

    #[test]
    fn test_strict_promotes_conventions() {
        for rule in strict_rules() {
            assert!(rule.default_severity() >= Severity::Warning, "{}", rule.name());
        }
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in [Preset::Recommended, Preset::Strict, Preset::Minimal] {
            assert_eq!(preset.name().parse::<Preset>(), Ok(preset));
        }
        assert!("loud".parse::<Preset>().is_err());
    }
}
