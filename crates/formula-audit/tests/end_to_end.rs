//! Full-pipeline tests: Ruby front end, recommended preset, exemptions and
//! autocorrection together.

use formula_audit::{
    audit_source, correct_source, default_analyzer, run_check, CheckOptions, Offense, Severity,
};
use std::path::Path;

const DEPRECATED: &str = r#"class Foo < Formula
  depends_on :hg
  depends_on :tex
  bottle do
    rebuild 0
  end
end
"#;

fn codes(offenses: &[Offense]) -> Vec<&str> {
    offenses.iter().map(|o| o.code.as_str()).collect()
}

fn render(offenses: &[Offense]) -> String {
    offenses
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn reports_in_catalogue_order() {
    let report = audit_source(DEPRECATED, None).unwrap();

    insta::assert_snapshot!(render(&report.offenses), @r#"
    <source>:3:2: convention [FA001] :tex is deprecated
    <source>:2:2: convention [FA001] :hg is deprecated. Usage should be "mercurial"
    <source>:5:4: convention [FA015] 'rebuild 0' should be removed
    "#);
}

#[test]
fn offenses_carry_source_line() {
    let report = audit_source(DEPRECATED, Some(Path::new("Formula/foo.rb"))).unwrap();
    let first = &report.offenses[0];
    assert_eq!(first.source_line, "  depends_on :tex");
    assert_eq!(first.location.file_display(), "Formula/foo.rb");
    assert!(first.fix.is_none());
    assert!(report.offenses[1].fix.is_some());
}

#[test]
fn autocorrect_converges() {
    let analyzer = default_analyzer().unwrap();
    let correction = correct_source(&analyzer, DEPRECATED, None).unwrap();

    assert_eq!(
        correction.output,
        "class Foo < Formula\n  depends_on \"mercurial\"\n  depends_on :tex\n  bottle do\n  end\nend\n"
    );
    assert_eq!(codes(&correction.remaining.offenses), vec!["FA001"]);

    let again = correct_source(&analyzer, &correction.output, None).unwrap();
    assert_eq!(again.output, correction.output);
    assert!(!again.changed());
}

#[test]
fn class_exemption_applies_to_named_formula() {
    let wine = "class Wine < Formula\n  if build.universal?\n    ENV.universal_binary\n  end\nend\n";
    let report = audit_source(wine, None).unwrap();
    assert!(!codes(&report.offenses).contains(&"FA020"));

    let other = wine.replace("class Wine", "class Foo");
    let report = audit_source(&other, None).unwrap();
    assert!(codes(&report.offenses).contains(&"FA020"));
}

#[test]
fn path_exemption_limits_rule_to_core_tap() {
    let source = "class Foo < Formula\n  url 'https://brew.sh/foo-1.0.tgz'\n  bottle do\n    if OS.linux?\n      nil\n    end\n  end\nend\n";

    let core = audit_source(
        source,
        Some(Path::new("/taps/homebrew-core/Formula/foo.rb")),
    )
    .unwrap();
    assert!(codes(&core.offenses).contains(&"FA016"));

    let tap = audit_source(source, Some(Path::new("/taps/homebrew-extra/foo.rb"))).unwrap();
    assert!(!codes(&tap.offenses).contains(&"FA016"));
}

#[test]
fn allow_directive_suppresses_next_line() {
    let source = "class Foo < Formula\n  # formula-audit: allow(deprecated-dependency)\n  depends_on :hg\n  depends_on :gpg\nend\n";
    let report = audit_source(source, None).unwrap();

    let lines: Vec<usize> = report.offenses.iter().map(|o| o.location.line).collect();
    assert_eq!(lines, vec![4]);
}

#[test]
fn overlapping_fixes_settle_over_passes() {
    let analyzer = default_analyzer().unwrap();
    let source = "class Foo < Formula\n  depends_on :hg if build.with? \"hg\"\nend\n";

    let correction = correct_source(&analyzer, source, None).unwrap();
    assert_eq!(
        correction.output,
        "class Foo < Formula\n  depends_on \"mercurial\" => :optional\nend\n"
    );
    let rules: Vec<&str> = correction.applied.iter().map(|e| e.rule.as_str()).collect();
    assert_eq!(rules, vec!["conditional-dependency", "deprecated-dependency"]);
    assert_eq!(correction.passes, 3);
    assert!(correction.remaining.offenses.is_empty());
}

#[test]
fn run_check_walks_formula_directory() {
    let dir = tempfile::tempdir().unwrap();
    let formula_dir = dir.path().join("Formula");
    std::fs::create_dir(&formula_dir).unwrap();
    std::fs::write(formula_dir.join("foo.rb"), DEPRECATED).unwrap();
    std::fs::write(
        formula_dir.join("bar.rb"),
        "class Bar < Formula\n  depends_on \"mercurial\"\nend\n",
    )
    .unwrap();

    let outcome = run_check(dir.path(), &CheckOptions::default()).unwrap();
    assert_eq!(outcome.result.files_checked, 2);
    assert_eq!(outcome.fail_on, Severity::Convention);
    assert_eq!(outcome.result.offenses.len(), 3);
    assert!(!outcome.passed());
}

#[test]
fn run_check_honours_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("foo.rb"), DEPRECATED).unwrap();
    std::fs::write(
        dir.path().join("formula-audit.toml"),
        "fail_on = \"warning\"\n\n[rules.zero-rebuild]\nenabled = false\n",
    )
    .unwrap();

    let outcome = run_check(dir.path(), &CheckOptions::default()).unwrap();
    assert_eq!(outcome.fail_on, Severity::Warning);
    assert_eq!(codes(&outcome.result.offenses), vec!["FA001", "FA001"]);
    assert!(outcome.passed());

    let strict = CheckOptions {
        preset: Some("strict".to_string()),
        ..CheckOptions::default()
    };
    let outcome = run_check(dir.path(), &strict).unwrap();
    assert!(!outcome.passed());
}

const CLEAN: &str = r##"class Foo < Formula
  desc "Example tool"
  homepage "https://brew.sh/foo"
  url "https://brew.sh/foo-1.0.tgz"

  option "with-bar", "Build with bar support"

  depends_on "pkg-config" => :build
  depends_on "bar" => :optional

  def install
    args = ["--prefix=#{prefix}"]
    args << "--with-bar" if build.with? "bar"
    system "./configure", *args
    system "make", "install"
    man1.install "foo.1"
  end

  test do
    assert_match "1.0", shell_output("#{bin}/foo --version")
  end
end
"##;

#[test]
fn clean_formula_has_no_offenses() {
    let analyzer = default_analyzer().unwrap();
    let path = Path::new("/taps/homebrew-core/Formula/foo.rb");
    let report = analyzer.analyze_source(CLEAN, Some(path)).unwrap();

    assert!(report.offenses.is_empty(), "{:#?}", report.offenses);
    assert!(report.rule_failures.is_empty());
}

#[test]
fn analysis_is_deterministic() {
    let analyzer = default_analyzer().unwrap();
    let source = format!("{DEPRECATED}depends_on \"foo\" if build.with? \"foo\"\n");
    let path = Some(Path::new("Formula/foo.rb"));

    let first = analyzer.analyze_source(&source, path).unwrap();
    let second = analyzer.analyze_source(&source, path).unwrap();
    assert!(!first.offenses.is_empty());
    assert_eq!(first, second);
}

#[test]
fn columns_count_characters() {
    let ascii = "class Foo < Formula\n  x = \"e\" if build.universal?\nend\n";
    let accented = ascii.replace("\"e\"", "\"\u{e9}\"");

    let ascii = audit_source(ascii, None).unwrap();
    let accented = audit_source(&accented, None).unwrap();
    assert_eq!(codes(&accented.offenses), vec!["FA020"]);
    assert_eq!(accented.offenses[0].location.column, 13);
    assert_eq!(
        accented.offenses[0].location.column,
        ascii.offenses[0].location.column
    );
}
