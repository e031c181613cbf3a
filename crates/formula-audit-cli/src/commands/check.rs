//! Check command implementation.

use anyhow::{Context, Result};
use formula_audit::rules::all_rules;
use formula_audit::{
    correct_source, resolve_fail_on, resolve_preset, Analyzer, AuditResult, Config, RuleBox,
    RubyParser,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line options of `check`.
#[derive(Debug, Clone, Default)]
pub struct CheckArgs {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Preset override.
    pub preset: Option<String>,
    /// Failure threshold override.
    pub fail_on: Option<String>,
    /// Rewrite files with their corrections.
    pub fix: bool,
}

/// Runs the check command. Returns `false` when the run should fail.
pub fn run(path: &Path, args: &CheckArgs, source: &ConfigSource) -> Result<bool> {
    let config = load_config(source)?;
    let preset = resolve_preset(args.preset.as_deref(), &config)?;
    let fail_on = resolve_fail_on(args.fail_on.as_deref(), &config)?;

    let rules = match &args.rules {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            filter_rules(&names)
        }
        None => preset.rules(),
    };

    let analyzer = Analyzer::builder()
        .root(path)
        .parser(RubyParser::new())
        .rules(rules)
        .excludes(args.exclude.iter().cloned())
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Auditing {:?} with {} rules ({} preset)",
        path,
        analyzer.rule_count(),
        preset.name()
    );

    let mut result = analyzer.analyze().context("Analysis failed")?;

    if args.fix {
        let corrected = fix_files(&analyzer, &result)?;
        if corrected > 0 {
            tracing::info!("Corrected {} offense(s)", corrected);
            result = analyzer.analyze().context("Analysis failed")?;
        }
    }

    super::output::print(&result, args.format)?;

    Ok(!result.has_offenses_at(fail_on))
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

/// Rewrites every file with a correctable offense. Returns the number of
/// edits applied.
fn fix_files(analyzer: &Analyzer, result: &AuditResult) -> Result<usize> {
    let files: BTreeSet<&PathBuf> = result
        .offenses
        .iter()
        .filter(|o| o.is_correctable())
        .filter_map(|o| o.location.file.as_ref())
        .collect();

    let mut applied = 0;
    for file in files {
        let original = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let correction = correct_source(analyzer, &original, Some(file.as_path()))
            .with_context(|| format!("Failed to correct {}", file.display()))?;
        if !correction.changed() {
            continue;
        }
        std::fs::write(file, &correction.output)
            .with_context(|| format!("Failed to write {}", file.display()))?;
        tracing::debug!(
            "{}: {} edit(s) in {} pass(es)",
            file.display(),
            correction.applied.len(),
            correction.passes
        );
        applied += correction.applied.len();
    }
    Ok(applied)
}

/// Selects rules by name or code, keeping catalogue order.
fn filter_rules(names: &[&str]) -> Vec<RuleBox> {
    let catalogue = all_rules();
    for name in names {
        if !catalogue
            .iter()
            .any(|r| r.name() == *name || r.code().eq_ignore_ascii_case(name))
        {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    catalogue
        .into_iter()
        .filter(|r| {
            names
                .iter()
                .any(|n| r.name() == *n || r.code().eq_ignore_ascii_case(n))
        })
        .collect()
}
