//! Node matchers shared by several rule families.

use formula_audit_core::SyntaxNode;

/// Arguments of a receiver-less `system` call.
pub(crate) fn system_arguments(node: &SyntaxNode) -> Option<Vec<&SyntaxNode>> {
    node.is_call_to(None, "system").then(|| node.arguments())
}

/// Value of the first `system` argument when it is a plain string.
pub(crate) fn system_command(node: &SyntaxNode) -> Option<(&SyntaxNode, &str)> {
    let first = system_arguments(node)?.into_iter().next()?;
    first.string_value().map(|value| (first, value))
}

/// First word of a shell command line.
pub(crate) fn first_word(command: &str) -> &str {
    command.split_whitespace().next().unwrap_or_default()
}

/// Method name of a `build.<query>` call.
pub(crate) fn build_query(node: &SyntaxNode) -> Option<&str> {
    if node.is_call_on("build") {
        node.method_name()
    } else {
        None
    }
}

/// Opposite of a `build.with?` / `build.without?` query.
pub(crate) fn complement(query: &str) -> Option<&'static str> {
    match query {
        "with?" => Some("without?"),
        "without?" => Some("with?"),
        _ => None,
    }
}

/// The single argument of a `depends_on` call.
pub(crate) fn dependency(node: &SyntaxNode) -> Option<&SyntaxNode> {
    if node.is_call_to(None, "depends_on") {
        node.first_argument()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complement_swaps_queries() {
        assert_eq!(complement("with?"), Some("without?"));
        assert_eq!(complement("without?"), Some("with?"));
        assert_eq!(complement("include?"), None);
    }

    #[test]
    fn first_word_of_command() {
        assert_eq!(first_word("mkdir -p foo"), "mkdir");
        assert_eq!(first_word("  export"), "export");
        assert_eq!(first_word(""), "");
    }
}
