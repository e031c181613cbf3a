//! Data tables consulted by rules.
//!
//! The catalogue's knowledge about deprecated dependencies, template comments,
//! compilers and so on lives here as plain data rather than inside rule code,
//! so it can be extended from `formula-audit.toml` without recompiling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A directory shortcut available inside formulae, e.g. `#{prefix}/bin` → `#{bin}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathShortcut {
    /// Interpolated variable the path is built from (`prefix`, `share`).
    pub base: String,
    /// Path segment(s) after the base, without leading slash.
    pub path: String,
    /// Shortcut method to use instead.
    pub shortcut: String,
}

impl PathShortcut {
    /// Creates a new shortcut entry.
    #[must_use]
    pub fn new(base: &str, path: &str, shortcut: &str) -> Self {
        Self {
            base: base.to_string(),
            path: path.to_string(),
            shortcut: shortcut.to_string(),
        }
    }
}

/// All rule data tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTables {
    /// Deprecated `depends_on :symbol` requirements and their replacement
    /// (empty string when there is none).
    pub deprecated_dependencies: BTreeMap<String, String>,
    /// Text fragments of comments left over from the formula template.
    pub template_comments: Vec<String>,
    /// Deprecated `ENV.<helper>` methods and the message to report.
    pub env_helpers: BTreeMap<String, String>,
    /// Legacy macOS release names (`MacOS.<release>?`).
    pub legacy_macos_releases: Vec<String>,
    /// `FileUtils` methods that should not be invoked through `system`.
    pub fileutils_methods: Vec<String>,
    /// Compiler executables and the `ENV` accessor to use instead.
    pub compilers: BTreeMap<String, String>,
    /// Path shortcuts, matched longest path first.
    pub path_shortcuts: Vec<PathShortcut>,
    /// Language ecosystems whose modules must be vendored.
    pub vendored_ecosystems: Vec<String>,
    /// String options that dependencies may legitimately use.
    pub dependency_options: Vec<String>,
    /// `ARGV` methods that should be replaced by `build` queries.
    pub argv_option_methods: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> BTreeMap<String, String> {
    items
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

impl Default for RuleTables {
    fn default() -> Self {
        let mut path_shortcuts = vec![PathShortcut::new("share", "man", "man")];
        for n in 1..=8 {
            path_shortcuts.push(PathShortcut::new(
                "prefix",
                &format!("share/man/man{n}"),
                &format!("man{n}"),
            ));
        }
        path_shortcuts.extend([
            PathShortcut::new("prefix", "share/info", "info"),
            PathShortcut::new("prefix", "share/man", "man"),
            PathShortcut::new("prefix", "bin", "bin"),
            PathShortcut::new("prefix", "include", "include"),
            PathShortcut::new("prefix", "libexec", "libexec"),
            PathShortcut::new("prefix", "lib", "lib"),
            PathShortcut::new("prefix", "sbin", "sbin"),
            PathShortcut::new("prefix", "share", "share"),
            PathShortcut::new("prefix", "Frameworks", "frameworks"),
        ]);

        Self {
            deprecated_dependencies: pairs(&[
                ("automake", "automake"),
                ("autoconf", "autoconf"),
                ("libtool", "libtool"),
                ("apr", "apr-util"),
                ("fortran", "gcc"),
                ("gpg", "gnupg"),
                ("hg", "mercurial"),
                ("mysql", "mysql"),
                ("mpi", "open-mpi"),
                ("python3", "python"),
                ("postgresql", "postgresql"),
                ("tex", ""),
                ("clt", ""),
                ("cvs", ""),
            ]),
            template_comments: strings(&[
                "# PLEASE REMOVE",
                "# Documentation:",
                "# if this fails, try separate make/make install steps",
                "# The URL of the archive",
                "## Naming --",
                "# if your formula requires any X11/XQuartz components",
                "# if your formula fails when building in parallel",
                "# Remove unrecognized options if warned by configure",
                "# system \"cmake",
            ]),
            env_helpers: pairs(&[
                ("x11", "Use \"depends_on :x11\" instead of \"ENV.x11\""),
                ("fortran", "Use `depends_on :fortran` instead of `ENV.fortran`"),
            ]),
            legacy_macos_releases: strings(&["leopard", "snow_leopard", "lion", "mountain_lion"]),
            fileutils_methods: strings(&[
                "cd", "chdir", "chmod", "chmod_R", "chown", "chown_R", "cmp", "compare_file",
                "copy", "copy_entry", "copy_file", "cp", "cp_r", "install", "link", "ln", "ln_s",
                "ln_sf", "makedirs", "mkdir", "mkdir_p", "mkpath", "move", "mv", "remove",
                "remove_dir", "remove_entry", "remove_file", "rm", "rm_f", "rm_r", "rm_rf",
                "rmdir", "rmtree", "safe_unlink", "symlink", "touch", "uptodate?", "pwd",
            ]),
            compilers: pairs(&[
                ("gcc", "ENV.cc"),
                ("llvm-gcc", "ENV.cc"),
                ("clang", "ENV.cc"),
                ("g++", "ENV.cxx"),
                ("llvm-g++", "ENV.cxx"),
                ("clang++", "ENV.cxx"),
            ]),
            path_shortcuts,
            vendored_ecosystems: strings(&["lua", "perl", "python", "ruby"]),
            dependency_options: Vec::new(),
            argv_option_methods: strings(&["debug?", "verbose?", "value"]),
        }
    }
}

impl RuleTables {
    /// Looks up a deprecated dependency.
    ///
    /// Returns `None` if the symbol is not deprecated, `Some(None)` if it is
    /// deprecated without replacement.
    #[must_use]
    pub fn deprecated_dependency(&self, symbol: &str) -> Option<Option<&str>> {
        self.deprecated_dependencies
            .get(symbol)
            .map(|r| Some(r.as_str()).filter(|r| !r.is_empty()))
    }

    /// Returns the template fragment contained in a comment, if any.
    #[must_use]
    pub fn template_fragment(&self, comment: &str) -> Option<&str> {
        self.template_comments
            .iter()
            .map(String::as_str)
            .find(|fragment| comment.contains(fragment))
    }

    /// Returns true if `release` is a legacy macOS release name.
    #[must_use]
    pub fn is_legacy_release(&self, release: &str) -> bool {
        self.legacy_macos_releases.iter().any(|r| r == release)
    }

    /// Returns true if `method` is a `FileUtils` method.
    #[must_use]
    pub fn is_fileutils_method(&self, method: &str) -> bool {
        self.fileutils_methods.iter().any(|m| m == method)
    }

    /// Finds the `ENV` accessor for a hard-coded compiler command.
    ///
    /// The command may be prefixed by `/usr/bin/` and must be followed by the
    /// end of the string or whitespace. Returns the compiler name and accessor.
    #[must_use]
    pub fn compiler_for<'a>(&'a self, command: &'a str) -> Option<(&'a str, &'a str)> {
        let command = command.strip_prefix("/usr/bin/").unwrap_or(command);
        let name = command.split(char::is_whitespace).next()?;
        self.compilers
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Finds the longest path shortcut for `rest` (text following `#{base}/`).
    #[must_use]
    pub fn path_shortcut(&self, base: &str, rest: &str) -> Option<&PathShortcut> {
        self.path_shortcuts
            .iter()
            .filter(|s| s.base == base)
            .filter(|s| {
                rest.strip_prefix(s.path.as_str())
                    .is_some_and(|after| after.is_empty() || after.starts_with('/'))
            })
            .max_by_key(|s| s.path.len())
    }

    /// Returns the ecosystem a dependency tag belongs to (`lua51` → `lua`).
    #[must_use]
    pub fn vendored_ecosystem(&self, tag: &str) -> Option<&str> {
        let base = tag.trim_end_matches(|c: char| c.is_ascii_digit());
        self.vendored_ecosystems
            .iter()
            .map(String::as_str)
            .find(|eco| *eco == base)
    }

    /// Returns true if a dependency string option is recognised.
    #[must_use]
    pub fn is_known_dependency_option(&self, option: &str) -> bool {
        self.dependency_options.iter().any(|o| o == option)
    }

    /// Returns true if `ARGV.<method>` should be a `build` query.
    #[must_use]
    pub fn is_argv_option_method(&self, method: &str) -> bool {
        self.argv_option_methods.iter().any(|m| m == method)
    }

    /// Merges user-supplied entries into these tables.
    ///
    /// Map entries override existing keys; list entries are appended unless
    /// already present.
    pub fn merge(&mut self, overrides: &TableOverrides) {
        self.deprecated_dependencies
            .extend(overrides.deprecated_dependencies.clone());
        self.env_helpers.extend(overrides.env_helpers.clone());
        self.compilers.extend(overrides.compilers.clone());
        append_unique(&mut self.template_comments, &overrides.template_comments);
        append_unique(&mut self.legacy_macos_releases, &overrides.legacy_macos_releases);
        append_unique(&mut self.fileutils_methods, &overrides.fileutils_methods);
        append_unique(&mut self.vendored_ecosystems, &overrides.vendored_ecosystems);
        append_unique(&mut self.dependency_options, &overrides.dependency_options);
        append_unique(&mut self.argv_option_methods, &overrides.argv_option_methods);
        for shortcut in &overrides.path_shortcuts {
            if !self.path_shortcuts.contains(shortcut) {
                self.path_shortcuts.push(shortcut.clone());
            }
        }
    }
}

fn append_unique(target: &mut Vec<String>, extra: &[String]) {
    for item in extra {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

/// Additions to [`RuleTables`] read from the `[tables]` config section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOverrides {
    /// See [`RuleTables::deprecated_dependencies`].
    pub deprecated_dependencies: BTreeMap<String, String>,
    /// See [`RuleTables::template_comments`].
    pub template_comments: Vec<String>,
    /// See [`RuleTables::env_helpers`].
    pub env_helpers: BTreeMap<String, String>,
    /// See [`RuleTables::legacy_macos_releases`].
    pub legacy_macos_releases: Vec<String>,
    /// See [`RuleTables::fileutils_methods`].
    pub fileutils_methods: Vec<String>,
    /// See [`RuleTables::compilers`].
    pub compilers: BTreeMap<String, String>,
    /// See [`RuleTables::path_shortcuts`].
    pub path_shortcuts: Vec<PathShortcut>,
    /// See [`RuleTables::vendored_ecosystems`].
    pub vendored_ecosystems: Vec<String>,
    /// See [`RuleTables::dependency_options`].
    pub dependency_options: Vec<String>,
    /// See [`RuleTables::argv_option_methods`].
    pub argv_option_methods: Vec<String>,
}

impl TableOverrides {
    /// Returns true if no overrides are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
