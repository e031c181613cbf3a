//! Pattern matching for exclude lists and exemptions.

/// Returns true if `path` matches `pattern`.
///
/// Patterns containing glob metacharacters are matched as globs; anything
/// else matches as a substring of the path.
///
/// # Examples
///
/// ```
/// use formula_audit_core::utils::path_matches;
///
/// assert!(path_matches("/taps/homebrew-core/Formula/foo.rb", "/homebrew-core/"));
/// assert!(path_matches("Formula/foo.rb", "Formula/*.rb"));
/// assert!(!path_matches("Casks/foo.rb", "Formula/**"));
/// ```
#[must_use]
pub fn path_matches(path: &str, pattern: &str) -> bool {
    if is_glob(pattern) {
        if let Ok(glob) = glob::Pattern::new(pattern) {
            return glob.matches(path);
        }
    }
    path.contains(pattern)
}

/// Returns true if `name` equals `pattern` or matches it as a glob.
///
/// # Examples
///
/// ```
/// use formula_audit_core::utils::name_matches;
///
/// assert!(name_matches("KibanaAT44", "KibanaAT4*"));
/// assert!(name_matches("Wine", "Wine"));
/// assert!(!name_matches("Winetricks", "Wine"));
/// ```
#[must_use]
pub fn name_matches(name: &str, pattern: &str) -> bool {
    if name == pattern {
        return true;
    }
    is_glob(pattern) && glob::Pattern::new(pattern).is_ok_and(|glob| glob.matches(name))
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_match() {
        assert!(path_matches("/x/homebrew-core/Formula/a.rb", "homebrew-core"));
        assert!(!path_matches("/x/homebrew-cask/a.rb", "homebrew-core"));
    }

    #[test]
    fn glob_match() {
        assert!(path_matches("vendor/gems/a.rb", "vendor/**"));
        assert!(!path_matches("Formula/a.rb", "vendor/**"));
    }

    #[test]
    fn invalid_glob_falls_back_to_substring() {
        assert!(path_matches("weird[path", "weird["));
    }

    #[test]
    fn name_glob() {
        assert!(name_matches("lines", "lin*"));
        assert!(!name_matches("class-inheritance", "lin*"));
    }
}
