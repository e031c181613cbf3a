//! Core analyzer: rule registry, tree dispatcher and file discovery.

use crate::config::Config;
use crate::context::{FileContext, FileIdentity};
use crate::exemption::ExemptionPolicy;
use crate::rule::{OffenseOrder, Rule, RuleBox};
use crate::syntax::{NodeKind, NodePath, SourceParser, SyntaxNode, SyntaxTree};
use crate::tables::RuleTables;
use crate::types::{AuditResult, FileReport, Location, Offense, OffenseDraft, ParseFailure, RuleFailure};
use crate::utils::allowance::check_allow_with_reason;

use rayon::prelude::*;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a formula file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Directory walk error.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Source analysis was requested but no parser was configured.
    #[error("No source parser configured")]
    NoParser,
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
    parser: Option<Box<dyn SourceParser>>,
    exemptions: Option<ExemptionPolicy>,
    tables: Option<RuleTables>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory (or single file) to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer. Registration order is catalogue order.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules to the analyzer.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the parser used for file and source analysis.
    #[must_use]
    pub fn parser<P: SourceParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Replaces the exemption policy (default: [`ExemptionPolicy::builtin`]).
    #[must_use]
    pub fn exemptions(mut self, policy: ExemptionPolicy) -> Self {
        self.exemptions = Some(policy);
        self
    }

    /// Replaces the rule data tables (default: [`RuleTables::default`]).
    #[must_use]
    pub fn tables(mut self, tables: RuleTables) -> Self {
        self.tables = Some(tables);
        self
    }

    /// Adds an exclude pattern (glob or substring).
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an include glob pattern.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved or an
    /// include pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());

        let include_patterns = self
            .include_patterns
            .iter()
            .chain(&config.analyzer.include)
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut exemptions = self.exemptions.unwrap_or_else(ExemptionPolicy::builtin);
        exemptions.extend(config.exemptions.iter().cloned());

        let mut tables = self.tables.unwrap_or_default();
        tables.merge(&config.tables);

        let mut registry: HashMap<NodeKind, Vec<usize>> = HashMap::new();
        for (index, rule) in self.rules.iter().enumerate() {
            for kind in rule.target_kinds() {
                registry.entry(*kind).or_default().push(index);
            }
        }

        for name in config.rules.keys() {
            if !self.rules.iter().any(|r| r.name() == name) {
                debug!("Ignoring configuration for unknown rule: {}", name);
            }
        }

        Ok(Analyzer {
            root,
            rules: self.rules,
            registry,
            exclude_patterns,
            include_patterns,
            fail_on_parse_error: self.fail_on_parse_error || config.analyzer.fail_on_parse_error,
            config,
            parser: self.parser,
            exemptions,
            tables,
        })
    }
}

/// The main analyzer that orchestrates rule execution.
///
/// Use [`Analyzer::builder()`] to construct an instance. The analyzer is
/// immutable once built and can be shared across threads.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    registry: HashMap<NodeKind, Vec<usize>>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<glob::Pattern>,
    config: Config,
    fail_on_parse_error: bool,
    parser: Option<Box<dyn SourceParser>>,
    exemptions: ExemptionPolicy,
    tables: RuleTables,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Iterates over the registered rules in catalogue order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(AsRef::as_ref)
    }

    /// Returns the data tables in effect.
    #[must_use]
    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    /// Returns the exemption policy in effect.
    #[must_use]
    pub fn exemptions(&self) -> &ExemptionPolicy {
        &self.exemptions
    }

    /// Analyzes all discovered files and returns the results.
    ///
    /// Files are analyzed in parallel; the result lists files in path order.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, a file cannot be read, or a
    /// file fails to parse while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<AuditResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let reports = self.analyze_files(&files)?;

        let mut result = AuditResult::new();
        for report in reports {
            match report {
                Ok(report) => result.push_report(report),
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                    result.parse_failures.push(ParseFailure {
                        file: path,
                        message,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Analysis complete: {} offenses in {} files",
            result.offenses.len(),
            result.files_checked
        );

        Ok(result)
    }

    fn analyze_files(
        &self,
        files: &[PathBuf],
    ) -> Result<Vec<Result<FileReport, AnalyzerError>>, AnalyzerError> {
        let work = || {
            files
                .par_iter()
                .map(|path| self.analyze_file(path))
                .collect::<Vec<_>>()
        };

        match self.config.analyzer.parallelism {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                Ok(pool.install(work))
            }
            None => Ok(work()),
        }
    }

    /// Reads, parses and analyzes a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn analyze_file(&self, path: &Path) -> Result<FileReport, AnalyzerError> {
        debug!("Analyzing: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        self.analyze_source(&content, Some(path))
    }

    /// Parses and analyzes source text.
    ///
    /// # Errors
    ///
    /// Returns an error if no parser is configured or the source fails to parse.
    pub fn analyze_source(
        &self,
        source: &str,
        path: Option<&Path>,
    ) -> Result<FileReport, AnalyzerError> {
        let parser = self.parser.as_deref().ok_or(AnalyzerError::NoParser)?;
        let tree = parser.parse(source).map_err(|e| AnalyzerError::Parse {
            path: path.map_or_else(|| PathBuf::from("<source>"), Path::to_path_buf),
            message: e.to_string(),
        })?;
        let identity = FileIdentity::from_tree(path, &tree);
        Ok(self.analyze_tree(&tree, &identity))
    }

    /// Runs every applicable rule over a parsed tree.
    ///
    /// Offenses are grouped by rule in catalogue order. Within a rule they
    /// follow source order, or reverse source order for rules declaring
    /// [`OffenseOrder::Reverse`].
    #[must_use]
    pub fn analyze_tree(&self, tree: &SyntaxTree, identity: &FileIdentity) -> FileReport {
        let ctx = FileContext::new(identity, &tree.source, &self.tables);

        let active: Vec<bool> = self
            .rules
            .iter()
            .map(|rule| self.is_active(rule.as_ref(), identity))
            .collect();

        let mut dispatch = Dispatch {
            analyzer: self,
            ctx: &ctx,
            active,
            buckets: self.rules.iter().map(|_| Vec::new()).collect(),
            failures: Vec::new(),
            ancestors: Vec::new(),
        };
        dispatch.walk(&tree.root);

        let Dispatch {
            active,
            buckets,
            failures,
            ..
        } = dispatch;

        let mut offenses = Vec::new();
        for (index, mut drafts) in buckets.into_iter().enumerate() {
            if !active[index] {
                continue;
            }
            let rule = self.rules[index].as_ref();
            if rule.order() == OffenseOrder::Reverse {
                drafts.reverse();
            }
            offenses.extend(
                drafts
                    .into_iter()
                    .filter_map(|draft| self.finalize(rule, &ctx, draft)),
            );
        }

        FileReport {
            offenses,
            rule_failures: failures,
        }
    }

    fn is_active(&self, rule: &dyn Rule, identity: &FileIdentity) -> bool {
        if !self.config.is_rule_enabled(rule.name()) {
            debug!("Skipping disabled rule: {}", rule.name());
            return false;
        }
        if self.exemptions.is_exempt(rule, identity) {
            debug!(
                "Rule {} exempt for {}",
                rule.name(),
                identity
                    .path_str()
                    .or_else(|| identity.class_name.clone())
                    .unwrap_or_default()
            );
            return false;
        }
        true
    }

    /// Attaches rule metadata to a draft, applying allow directives and
    /// severity overrides.
    fn finalize(&self, rule: &dyn Rule, ctx: &FileContext<'_>, draft: OffenseDraft) -> Option<Offense> {
        let line = draft.position.line;
        let allow = check_allow_with_reason(ctx.source, line, &[rule.name(), rule.code()]);
        if allow.is_allowed() {
            if allow.reason().is_some() || !rule.requires_allow_reason() {
                debug!("Offense from {} allowed at line {}", rule.name(), line);
                return None;
            }
            warn!(
                "Allow directive for {} at line {} needs a reason; offense kept",
                rule.name(),
                line
            );
        }

        let offset = ctx.offset_for(draft.position);
        Some(Offense {
            code: rule.code().to_string(),
            rule: rule.name().to_string(),
            family: rule.family().to_string(),
            severity: self
                .config
                .rule_severity(rule.name())
                .unwrap_or_else(|| rule.default_severity()),
            location: Location::new(
                ctx.identity.path.clone(),
                line,
                ctx.char_column(draft.position),
            )
            .with_span(offset, draft.length),
            message: draft.message,
            source_line: ctx.line_text(line).to_string(),
            fix: draft.fix.filter(|_| rule.correctable()),
            fix_conflict: false,
        })
    }

    /// Discovers all source files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let parser = self.parser.as_deref().ok_or(AnalyzerError::NoParser)?;
        let extensions = parser.extensions();
        let respect_gitignore = self.config.analyzer.respect_gitignore;

        let walker = ignore::WalkBuilder::new(&self.root)
            .git_ignore(respect_gitignore)
            .git_exclude(respect_gitignore)
            .ignore(respect_gitignore)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            let handled = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.contains(&e));
            if !handled {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            if !self.is_included(path) {
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn is_included(&self, path: &Path) -> bool {
        if self.include_patterns.is_empty() {
            return true;
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.include_patterns
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(path))
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.exclude_patterns {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
            }

            // Patterns like "**/vendor/**" also match as "/vendor/" substrings.
            let normalized_pattern = pattern.replace("**", "");
            if !normalized_pattern.is_empty() && path_str.contains(&normalized_pattern) {
                return true;
            }
        }

        false
    }
}

/// State of one pre-order pass over a tree.
struct Dispatch<'a, 't> {
    analyzer: &'a Analyzer,
    ctx: &'a FileContext<'a>,
    active: Vec<bool>,
    buckets: Vec<Vec<OffenseDraft>>,
    failures: Vec<RuleFailure>,
    ancestors: Vec<&'t SyntaxNode>,
}

impl<'t> Dispatch<'_, 't> {
    fn walk(&mut self, node: &'t SyntaxNode) {
        let analyzer = self.analyzer;
        if let Some(indices) = analyzer.registry.get(&node.kind) {
            for &index in indices {
                if !self.active[index] {
                    continue;
                }
                let rule = analyzer.rules[index].as_ref();
                let ctx = self.ctx;
                let path = NodePath::new(node, &self.ancestors);
                match panic::catch_unwind(AssertUnwindSafe(|| rule.check(ctx, &path))) {
                    Ok(drafts) => self.buckets[index].extend(drafts),
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        warn!(
                            "Rule {} failed at line {}: {}; disabled for this file",
                            rule.name(),
                            node.range.start.line,
                            message
                        );
                        self.active[index] = false;
                        self.buckets[index].clear();
                        self.failures.push(RuleFailure {
                            rule: rule.name().to_string(),
                            file: ctx.identity.path.clone(),
                            message,
                        });
                    }
                }
            }
        }

        self.ancestors.push(node);
        for child in &node.children {
            self.walk(child);
        }
        self.ancestors.pop();
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "rule panicked".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::exemption::ExemptionRule;
    use crate::syntax::{Position, SourceRange};
    use crate::types::{Fix, Severity, TextRange};

    /// Builds a program whose top-level nodes are one comment per line.
    fn comment_tree(lines: &[&str]) -> SyntaxTree {
        let mut source = String::new();
        let mut children = Vec::new();
        for (i, text) in lines.iter().enumerate() {
            let start_byte = source.len();
            source.push_str(text);
            source.push('\n');
            children.push(SyntaxNode::new(
                NodeKind::Comment,
                SourceRange {
                    start: Position::new(i + 1, 0),
                    end: Position::new(i + 1, text.len()),
                    start_byte,
                    end_byte: start_byte + text.len(),
                },
                *text,
            ));
        }
        let root = SyntaxNode::new(
            NodeKind::Program,
            SourceRange {
                start: Position::new(1, 0),
                end: Position::new(lines.len() + 1, 0),
                start_byte: 0,
                end_byte: source.len(),
            },
            source.clone(),
        )
        .with_children(children);
        SyntaxTree::new(source, root)
    }

    struct EveryComment {
        name: &'static str,
        order: OffenseOrder,
        panic_on: Option<&'static str>,
        correctable: bool,
    }

    impl EveryComment {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                order: OffenseOrder::Source,
                panic_on: None,
                correctable: false,
            }
        }
    }

    impl Rule for EveryComment {
        fn name(&self) -> &'static str {
            self.name
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn family(&self) -> &'static str {
            "test"
        }
        fn order(&self) -> OffenseOrder {
            self.order
        }
        fn correctable(&self) -> bool {
            self.correctable
        }
        fn target_kinds(&self) -> &'static [NodeKind] {
            &[NodeKind::Comment]
        }
        fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
            if self.panic_on == Some(path.node.text.as_str()) {
                panic!("boom");
            }
            vec![OffenseDraft::at_node(path.node, path.node.text.clone())
                .with_fix(Fix::remove(TextRange::new(0, 1)))]
        }
    }

    fn lines_of(report: &FileReport, rule: &str) -> Vec<usize> {
        report
            .offenses
            .iter()
            .filter(|o| o.rule == rule)
            .map(|o| o.location.line)
            .collect()
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/vendor/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.exemptions().len(), ExemptionPolicy::builtin().len());
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/vendor/**")
            .exclude("Aliases")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/tap/vendor/foo.rb")));
        assert!(analyzer.should_exclude(Path::new("/tap/Aliases/foo.rb")));
        assert!(!analyzer.should_exclude(Path::new("/tap/Formula/foo.rb")));
    }

    #[test]
    fn offenses_grouped_by_rule_in_catalogue_order() {
        let analyzer = Analyzer::builder()
            .rule(EveryComment::new("second"))
            .rule(EveryComment::new("first"))
            .build()
            .expect("analyzer");
        let tree = comment_tree(&["# a", "# b"]);
        let report = analyzer.analyze_tree(&tree, &FileIdentity::default());

        let rules: Vec<&str> = report.offenses.iter().map(|o| o.rule.as_str()).collect();
        assert_eq!(rules, vec!["second", "second", "first", "first"]);
        assert_eq!(report.offenses[0].source_line, "# a");
    }

    #[test]
    fn reverse_order_rule() {
        let mut rule = EveryComment::new("reversed");
        rule.order = OffenseOrder::Reverse;
        let analyzer = Analyzer::builder().rule(rule).build().expect("analyzer");
        let tree = comment_tree(&["# a", "# b", "# c"]);
        let report = analyzer.analyze_tree(&tree, &FileIdentity::default());
        assert_eq!(lines_of(&report, "reversed"), vec![3, 2, 1]);
    }

    #[test]
    fn panicking_rule_is_isolated() {
        let mut faulty = EveryComment::new("faulty");
        faulty.panic_on = Some("# b");
        let analyzer = Analyzer::builder()
            .rule(faulty)
            .rule(EveryComment::new("healthy"))
            .build()
            .expect("analyzer");
        let tree = comment_tree(&["# a", "# b", "# c"]);
        let report = analyzer.analyze_tree(&tree, &FileIdentity::default());

        assert!(lines_of(&report, "faulty").is_empty());
        assert_eq!(lines_of(&report, "healthy"), vec![1, 2, 3]);
        assert_eq!(report.rule_failures.len(), 1);
        assert_eq!(report.rule_failures[0].rule, "faulty");
        assert_eq!(report.rule_failures[0].message, "boom");
    }

    #[test]
    fn exempt_rule_does_not_run() {
        let analyzer = Analyzer::builder()
            .rule(EveryComment::new("exempted"))
            .exemptions(
                ExemptionPolicy::new().with(ExemptionRule::for_rules(["exempted"]).class_name("Foo")),
            )
            .build()
            .expect("analyzer");
        let tree = comment_tree(&["# a"]);

        let foo = FileIdentity::new(None, Some("Foo".to_string()));
        assert!(analyzer.analyze_tree(&tree, &foo).offenses.is_empty());

        let bar = FileIdentity::new(None, Some("Bar".to_string()));
        assert_eq!(analyzer.analyze_tree(&tree, &bar).offenses.len(), 1);
    }

    #[test]
    fn config_disables_and_overrides_severity() {
        let mut config = Config::default();
        config.rules.insert(
            "off".to_string(),
            RuleConfig {
                enabled: Some(false),
                severity: None,
            },
        );
        config.rules.insert(
            "loud".to_string(),
            RuleConfig {
                enabled: None,
                severity: Some(Severity::Error),
            },
        );
        let analyzer = Analyzer::builder()
            .rule(EveryComment::new("off"))
            .rule(EveryComment::new("loud"))
            .config(config)
            .build()
            .expect("analyzer");
        let report = analyzer.analyze_tree(&comment_tree(&["# a"]), &FileIdentity::default());

        assert_eq!(report.offenses.len(), 1);
        assert_eq!(report.offenses[0].rule, "loud");
        assert_eq!(report.offenses[0].severity, Severity::Error);
    }

    #[test]
    fn allow_directive_suppresses_offense() {
        let analyzer = Analyzer::builder()
            .rule(EveryComment::new("noisy"))
            .build()
            .expect("analyzer");
        let tree = comment_tree(&["# formula-audit: allow(noisy)", "# b", "# c"]);
        let report = analyzer.analyze_tree(&tree, &FileIdentity::default());
        assert_eq!(lines_of(&report, "noisy"), vec![3]);
    }

    #[test]
    fn fixes_only_kept_for_correctable_rules() {
        let mut fixing = EveryComment::new("fixing");
        fixing.correctable = true;
        let analyzer = Analyzer::builder()
            .rule(fixing)
            .rule(EveryComment::new("plain"))
            .build()
            .expect("analyzer");
        let report = analyzer.analyze_tree(&comment_tree(&["# a"]), &FileIdentity::default());

        assert!(report.offenses[0].fix.is_some());
        assert!(report.offenses[1].fix.is_none());
    }

    #[test]
    fn analyze_source_without_parser_fails() {
        let analyzer = Analyzer::builder().build().expect("analyzer");
        assert!(matches!(
            analyzer.analyze_source("x", None),
            Err(AnalyzerError::NoParser)
        ));
    }
}
