//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! # formula-audit: allow(deprecated-dependency) reason="needs the old toolchain"
//! depends_on :automake
//! ```
//!
//! A directive applies to its own line (as a trailing comment) and to the
//! line below it. Rules may be named by name or code; `all` allows every rule.

use std::collections::HashSet;

const DIRECTIVE_PREFIX: &str = "formula-audit:";

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names or codes that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

impl AllowDirective {
    fn covers(&self, names: &[&str]) -> bool {
        self.rules.contains("all") || names.iter().any(|n| self.rules.contains(*n))
    }
}

/// Checks source code for allowance comments with reason.
///
/// `names` lists every identifier the rule answers to (typically its name
/// and its code).
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, names: &[&str]) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        if let Some(directive) = parse_allow_directive(lines[check_line - 1]) {
            // A trailing directive on the previous line belongs to that line only.
            let standalone = lines[check_line - 1].trim_start().starts_with('#');
            if check_line != line && !standalone {
                continue;
            }
            if directive.covers(names) {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from a source line.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let hash = line.find('#')?;
    let comment_content = line[hash..].trim_start_matches('#').trim();

    let directive = comment_content.strip_prefix(DIRECTIVE_PREFIX)?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest.strip_prefix("reason=").and_then(|reason_part| {
        let quoted = reason_part.trim().strip_prefix('"')?;
        let end = quoted.find('"')?;
        Some(quoted[..end].to_string())
    });

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("# formula-audit: allow(deprecated-dependency)")
            .expect("directive should parse");
        assert!(directive.rules.contains("deprecated-dependency"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason() {
        let directive =
            parse_allow_directive("  # formula-audit: allow(FA016) reason=\"linux tap\"")
                .expect("directive should parse");
        assert!(directive.rules.contains("FA016"));
        assert_eq!(directive.reason.as_deref(), Some("linux tap"));
    }

    #[test]
    fn test_parse_multiple_rules() {
        let directive = parse_allow_directive("# formula-audit: allow(rule1, rule2, rule3)")
            .expect("directive should parse");
        assert_eq!(directive.rules.len(), 3);
    }

    #[test]
    fn test_plain_comment_is_not_a_directive() {
        assert!(parse_allow_directive("# depends_on \"foo\"").is_none());
        assert!(parse_allow_directive("# formula-audit: allow()").is_none());
    }

    #[test]
    fn test_directive_on_previous_line() {
        let content = "class Foo < Formula\n  # formula-audit: allow(os-linux-check)\n  if OS.linux?\n  end\nend\n";

        assert!(check_allow_with_reason(content, 3, &["os-linux-check", "FA016"]).is_allowed());
        assert!(!check_allow_with_reason(content, 3, &["other-rule"]).is_allowed());
    }

    #[test]
    fn test_trailing_directive_by_code() {
        let content = "  depends_on :automake # formula-audit: allow(FA001) reason=\"legacy\"\n  depends_on :libtool\n";

        let result = check_allow_with_reason(content, 1, &["deprecated-dependency", "FA001"]);
        assert_eq!(result.reason(), Some("legacy"));
        // The trailing directive does not leak onto the next line.
        assert!(!check_allow_with_reason(content, 2, &["deprecated-dependency", "FA001"]).is_allowed());
    }

    #[test]
    fn test_allow_all() {
        let content = "# formula-audit: allow(all)\nENV.x11\n";
        assert!(check_allow_with_reason(content, 2, &["anything"]).is_allowed());
    }
}
