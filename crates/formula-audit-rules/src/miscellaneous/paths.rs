//! Checks on how install paths are spelled.

use formula_audit_core::{
    FileContext, Fix, NodeKind, NodePath, OffenseDraft, Position, Rule, TextRange,
};

/// Characters that make a `Dir[]` argument a glob.
const GLOB_CHARS: &[char] = &['*', '{', '}', ','];

/// Flags `Dir["path"]` without glob characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonGlobDir;

impl NonGlobDir {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NonGlobDir {
    fn name(&self) -> &'static str {
        "non-glob-dir"
    }

    fn code(&self) -> &'static str {
        "FA026"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Flags `Dir[]` around paths that are not globs"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::ElementReference]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        if node.child_by_field("object").map(|o| o.text.as_str()) != Some("Dir") {
            return vec![];
        }
        let indices: Vec<_> = node
            .named_children()
            .filter(|c| c.field != Some("object"))
            .collect();
        let [argument] = indices.as_slice() else {
            return vec![];
        };
        let Some(value) = argument.string_value() else {
            return vec![];
        };
        if value.contains(GLOB_CHARS) {
            return vec![];
        }

        vec![OffenseDraft::at_content(
            argument,
            format!("Dir([\"{value}\"]) is unnecessary; just use \"{value}\""),
        )
        .with_fix(Fix::replace_node(node, argument.text.as_str()))]
    }
}

/// Flags `man+"man8"` concatenations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManPathConcat;

impl ManPathConcat {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Returns true for `man1` through `man8`.
fn is_man_section(value: &str) -> bool {
    value
        .strip_prefix("man")
        .is_some_and(|n| n.len() == 1 && matches!(n.as_bytes()[0], b'1'..=b'8'))
}

impl Rule for ManPathConcat {
    fn name(&self) -> &'static str {
        "man-path-concat"
    }

    fn code(&self) -> &'static str {
        "FA031"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Prefers `manN` over `man+\"manN\"`"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::Binary]
    }

    fn check(&self, _ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let node = path.node;
        let is_man = node
            .child_by_field("left")
            .is_some_and(|l| l.is(NodeKind::Identifier) && l.text == "man");
        if !is_man || node.token("+").is_none() {
            return vec![];
        }
        let Some(right) = node.child_by_field("right") else {
            return vec![];
        };
        let Some(section) = right.string_value().filter(|v| is_man_section(v)) else {
            return vec![];
        };

        vec![OffenseDraft::at_content(
            right,
            format!("\"{}\" should be \"{section}\"", node.text),
        )
        .with_fix(Fix::replace_node(node, section))]
    }
}

/// Flags `"#{prefix}/share/man"`-style paths that have a shortcut.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferPathShortcut;

impl PreferPathShortcut {
    /// Creates a new rule instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for PreferPathShortcut {
    fn name(&self) -> &'static str {
        "path-shortcut"
    }

    fn code(&self) -> &'static str {
        "FA033"
    }

    fn family(&self) -> &'static str {
        "miscellaneous"
    }

    fn description(&self) -> &'static str {
        "Prefers path shortcuts such as `man8` over spelled-out prefixes"
    }

    fn correctable(&self) -> bool {
        true
    }

    fn target_kinds(&self) -> &'static [NodeKind] {
        &[NodeKind::String]
    }

    fn check(&self, ctx: &FileContext<'_>, path: &NodePath<'_>) -> Vec<OffenseDraft> {
        let segments: Vec<_> = path.node.named_children().collect();
        let mut drafts = Vec::new();

        for pair in segments.windows(2) {
            let [interpolation, content] = pair else {
                continue;
            };
            if !interpolation.is(NodeKind::Interpolation) || !content.is(NodeKind::StringContent) {
                continue;
            }
            let mut inner = interpolation.named_children();
            let (Some(base), None) = (inner.next(), inner.next()) else {
                continue;
            };
            if !base.is(NodeKind::Identifier) {
                continue;
            }
            let Some(rest) = content.text.strip_prefix('/') else {
                continue;
            };
            let Some(shortcut) = ctx.tables.path_shortcut(&base.text, rest) else {
                continue;
            };

            let start = content.start();
            let fix_end = content.range.start_byte + 1 + shortcut.path.len();
            drafts.push(
                OffenseDraft::at(
                    Position::new(start.line, start.column + 1),
                    shortcut.path.len(),
                    format!(
                        "\"#{{{}}}/{}\" should be \"#{{{}}}\"",
                        base.text, shortcut.path, shortcut.shortcut
                    ),
                )
                .with_fix(Fix::replace(
                    TextRange::new(interpolation.range.start_byte, fix_end),
                    format!("#{{{}}}", shortcut.shortcut),
                )),
            );
        }
        drafts
    }
}
