//! Wiring for the common ways of running formula-audit.
//!
//! Resolves configuration files, presets and the failure threshold, builds an
//! [`Analyzer`] with the Ruby front end, and drives autocorrection to a fixed
//! point.

use formula_audit_core::autocorrect::{self, AutocorrectError};
use formula_audit_core::{
    Analyzer, AnalyzerError, AuditResult, Config, ConfigError, Edit, FileReport, Severity,
};
use formula_audit_rules::Preset;
use formula_audit_ruby::RubyParser;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Config file names to search for, in priority order.
pub const CONFIG_CANDIDATES: &[&str] = &["formula-audit.toml", ".formula-audit.toml"];

/// Upper bound on analyze-and-fix rounds in [`correct_source`].
pub const MAX_CORRECTION_PASSES: usize = 10;

/// Errors raised while running an audit.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The requested preset does not exist.
    #[error("unknown preset `{0}`. Valid presets: recommended, strict, minimal")]
    UnknownPreset(String),

    /// The requested failure threshold is not a severity.
    #[error("unknown severity `{0}`. Valid values: convention, warning, error, fatal")]
    UnknownSeverity(String),

    /// A configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The analyzer failed.
    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    /// Corrections could not be applied.
    #[error(transparent)]
    Autocorrect(#[from] AutocorrectError),
}

/// Options for [`run_check`]. Explicit values take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Preset name.
    pub preset: Option<String>,
    /// Config file, relative to the checked root unless absolute.
    pub config_path: Option<PathBuf>,
    /// Failure threshold name.
    pub fail_on: Option<String>,
}

/// Result of [`run_check`].
#[derive(Debug)]
pub struct CheckOutcome {
    /// Offenses across all files.
    pub result: AuditResult,
    /// Effective failure threshold.
    pub fail_on: Severity,
}

impl CheckOutcome {
    /// Returns true if no offense reaches the failure threshold.
    #[must_use]
    pub fn passed(&self) -> bool {
        !self.result.has_offenses_at(self.fail_on)
    }
}

/// Result of [`correct_source`].
#[derive(Debug, Clone)]
pub struct Correction {
    /// Corrected source text.
    pub output: String,
    /// Every edit applied, across all passes.
    pub applied: Vec<Edit>,
    /// Number of analysis passes run.
    pub passes: usize,
    /// Offenses still present in `output`.
    pub remaining: FileReport,
}

impl Correction {
    /// Returns true if any edit was applied.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Loads the configuration for `root`.
///
/// An explicit path must exist. Otherwise the first of
/// [`CONFIG_CANDIDATES`] found in `root` is used, falling back to the
/// default configuration.
///
/// # Errors
///
/// Returns an error if a config file cannot be read or parsed.
pub fn load_config(root: &Path, explicit_path: Option<&Path>) -> Result<Config, RunError> {
    if let Some(path) = explicit_path {
        let full_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        };
        debug!("Loading config from {}", full_path.display());
        return Ok(Config::from_file(&full_path)?);
    }

    for candidate in CONFIG_CANDIDATES {
        let path = root.join(candidate);
        if path.is_file() {
            debug!("Loading config from {}", path.display());
            return Ok(Config::from_file(&path)?);
        }
    }

    Ok(Config::default())
}

/// Resolves the effective preset: explicit name > config > recommended.
///
/// # Errors
///
/// Returns an error for an unknown preset name.
pub fn resolve_preset(explicit: Option<&str>, config: &Config) -> Result<Preset, RunError> {
    let name = explicit
        .or(config.preset.as_deref())
        .unwrap_or("recommended");
    name.parse()
        .map_err(|_| RunError::UnknownPreset(name.to_string()))
}

/// Resolves the effective failure threshold: explicit name > config > convention.
///
/// # Errors
///
/// Returns an error for an unknown severity name.
pub fn resolve_fail_on(explicit: Option<&str>, config: &Config) -> Result<Severity, RunError> {
    match explicit {
        Some(name) => name
            .parse()
            .map_err(|_| RunError::UnknownSeverity(name.to_string())),
        None => config.fail_on_severity().map_err(|_| {
            RunError::UnknownSeverity(config.fail_on.clone().unwrap_or_default())
        }),
    }
}

/// Builds an analyzer over `root` running `preset` with the Ruby front end.
///
/// # Errors
///
/// Returns an error if the analyzer cannot be built.
pub fn build_analyzer(root: &Path, config: Config, preset: Preset) -> Result<Analyzer, RunError> {
    let analyzer = Analyzer::builder()
        .root(root)
        .parser(RubyParser::new())
        .rules(preset.rules())
        .config(config)
        .build()?;
    debug!(
        "Built analyzer with preset {} ({} rules)",
        preset.name(),
        analyzer.rule_count()
    );
    Ok(analyzer)
}

/// Builds an analyzer with the recommended preset and default configuration.
///
/// # Errors
///
/// Returns an error if the current directory cannot be resolved.
pub fn default_analyzer() -> Result<Analyzer, RunError> {
    build_analyzer(Path::new("."), Config::default(), Preset::Recommended)
}

/// Audits one source text with the default analyzer.
///
/// # Errors
///
/// Returns an error if the source fails to parse.
pub fn audit_source(source: &str, path: Option<&Path>) -> Result<FileReport, RunError> {
    Ok(default_analyzer()?.analyze_source(source, path)?)
}

/// Applies every available fix to `source`, re-analyzing until no fix is left.
///
/// Fixes that overlap an accepted fix are retried on the next pass. The loop
/// stops after [`MAX_CORRECTION_PASSES`] rounds.
///
/// # Errors
///
/// Returns an error if the source (or a corrected version of it) fails to
/// parse, or an edit does not fit.
pub fn correct_source(
    analyzer: &Analyzer,
    source: &str,
    path: Option<&Path>,
) -> Result<Correction, RunError> {
    let mut output = source.to_string();
    let mut applied = Vec::new();

    for pass in 1..=MAX_CORRECTION_PASSES {
        let mut report = analyzer.analyze_source(&output, path)?;
        let edits = autocorrect::resolve(&mut report.offenses);
        if edits.is_empty() {
            return Ok(Correction {
                output,
                applied,
                passes: pass,
                remaining: report,
            });
        }
        debug!("Pass {}: applying {} edit(s)", pass, edits.len());
        output = autocorrect::apply(&output, &edits)?;
        applied.extend(edits);
    }

    warn!(
        "Corrections did not settle after {} passes",
        MAX_CORRECTION_PASSES
    );
    let remaining = analyzer.analyze_source(&output, path)?;
    Ok(Correction {
        output,
        applied,
        passes: MAX_CORRECTION_PASSES,
        remaining,
    })
}

/// Audits every formula under `root`.
///
/// # Errors
///
/// Returns an error if configuration is invalid or analysis fails.
pub fn run_check(root: impl AsRef<Path>, options: &CheckOptions) -> Result<CheckOutcome, RunError> {
    let root = root.as_ref();
    let config = load_config(root, options.config_path.as_deref())?;
    let preset = resolve_preset(options.preset.as_deref(), &config)?;
    let fail_on = resolve_fail_on(options.fail_on.as_deref(), &config)?;

    let analyzer = build_analyzer(root, config, preset)?;
    let result = analyzer.analyze()?;
    info!(
        "Checked {} file(s), {} offense(s)",
        result.files_checked,
        result.offenses.len()
    );

    Ok(CheckOutcome { result, fail_on })
}
